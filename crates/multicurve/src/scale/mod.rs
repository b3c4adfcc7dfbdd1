//! Axis and color scale collaborators.
//!
//! Scales are shared between marks and own their domains. A mark only
//! registers or removes its own contribution, keyed by a [`ContributorId`],
//! and listens for change notifications.
//!
//! - [`AxisScale`] maps data values to pixels and back.
//! - [`ColorScale`] maps a curve's color value to a [`Color`].
//! - [`ContinuousScale`] and [`GradientColorScale`] are self-contained
//!   implementations for hosts that do not bring their own.

mod continuous;
mod gradient;

pub use continuous::{ContinuousScale, ScaleType};
pub use gradient::GradientColorScale;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use multicurve_core::alloc::HashMap;
use parking_lot::Mutex;

use crate::color::Color;
use crate::model::ModelId;

/// Change notifications emitted by a scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScaleEvent {
    DomainChanged,
    /// Pixel range for axis scales, color stops for color scales.
    RangeChanged,
}

pub type SubscriptionId = u64;

pub type ScaleListener = Arc<dyn Fn(ScaleEvent) + Send + Sync>;

/// Which of a model's scales a contribution belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisKind {
    X,
    Y,
    Color,
}

impl AxisKind {
    pub fn suffix(self) -> &'static str {
        match self {
            AxisKind::X => "x",
            AxisKind::Y => "y",
            AxisKind::Color => "color",
        }
    }
}

/// Identifies one model's contribution to a shared scale domain.
///
/// Displays as `<model_id>_x`, `<model_id>_y` or `<model_id>_color`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContributorId {
    pub model: ModelId,
    pub axis: AxisKind,
}

impl ContributorId {
    pub fn new(model: ModelId, axis: AxisKind) -> Self {
        Self { model, axis }
    }
}

impl fmt::Display for ContributorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.model, self.axis.suffix())
    }
}

/// Maps data values to pixel coordinates along one axis.
pub trait AxisScale: Send + Sync {
    fn scale(&self, value: f64) -> f64;

    fn invert(&self, pixel: f64) -> f64;

    /// Constant added to scaled positions (band-style scales center their values).
    fn offset(&self) -> f64 {
        0.0
    }

    /// Register or replace this contributor's values, one sequence per curve.
    fn compute_and_set_domain(&self, values: &[Vec<f64>], contributor: &ContributorId);

    /// Remove this contributor from the aggregate domain.
    fn del_domain(&self, contributor: &ContributorId);

    fn subscribe(&self, listener: ScaleListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// Maps a curve's scalar color value to a display color.
pub trait ColorScale: Send + Sync {
    fn scale(&self, value: f64) -> Color;

    fn compute_and_set_domain(&self, values: &[Vec<f64>], contributor: &ContributorId);

    fn del_domain(&self, contributor: &ContributorId);

    fn subscribe(&self, listener: ScaleListener) -> SubscriptionId;

    fn unsubscribe(&self, id: SubscriptionId);
}

/// The scales a curve model is bound to.
#[derive(Clone)]
pub struct MarkScales {
    pub x: Arc<dyn AxisScale>,
    pub y: Arc<dyn AxisScale>,
    pub color: Option<Arc<dyn ColorScale>>,
}

impl MarkScales {
    pub fn new(x: Arc<dyn AxisScale>, y: Arc<dyn AxisScale>) -> Self {
        Self { x, y, color: None }
    }

    pub fn with_color(mut self, color: Arc<dyn ColorScale>) -> Self {
        self.color = Some(color);
        self
    }
}

impl fmt::Debug for MarkScales {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkScales")
            .field("color", &self.color.is_some())
            .finish_non_exhaustive()
    }
}

/// Listener registry for scale implementations.
///
/// Listeners are called outside the registry lock, so a listener may
/// subscribe or unsubscribe without deadlocking.
#[derive(Default)]
pub struct ListenerSet {
    next_id: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, ScaleListener)>>,
}

impl ListenerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, listener: ScaleListener) -> SubscriptionId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.lock().push((id, listener));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.lock().retain(|(existing, _)| *existing != id);
    }

    pub fn notify(&self, event: ScaleEvent) {
        let snapshot: Vec<ScaleListener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-contributor extents that together form a scale's domain.
#[derive(Debug, Default)]
pub(crate) struct DomainContributions {
    extents: HashMap<String, (f64, f64)>,
}

impl DomainContributions {
    /// Store the finite extent of `values`. Contributors with no finite value
    /// are dropped.
    pub(crate) fn set(&mut self, contributor: &ContributorId, values: &[Vec<f64>]) {
        let extent = values
            .iter()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
                None => Some((v, v)),
            });
        let key = contributor.to_string();
        match extent {
            Some(extent) => {
                self.extents.insert(key, extent);
            }
            None => {
                self.extents.remove(&key);
            }
        }
    }

    pub(crate) fn remove(&mut self, contributor: &ContributorId) {
        self.extents.remove(&contributor.to_string());
    }

    pub(crate) fn contains(&self, contributor: &ContributorId) -> bool {
        self.extents.contains_key(&contributor.to_string())
    }

    /// Union of all extents, `None` when nothing is registered.
    pub(crate) fn extent(&self) -> Option<(f64, f64)> {
        self.extents
            .values()
            .copied()
            .reduce(|(lo, hi), (l, h)| (lo.min(l), hi.max(h)))
    }
}
