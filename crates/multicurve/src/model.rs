//! The curve data model.
//!
//! [`CurveModel`] owns the raw arrays and the normalized [`CurveRecord`]s
//! derived from them, and keeps its contributions to the shared scale
//! domains current. It knows nothing about rendering or pointer input.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use multicurve_core::profiling::profile_function;
use serde::{Deserialize, Serialize};

use crate::notify::{Field, ReactionSet, reactions_for};
use crate::record::{CurveRecord, PointRecord};
use crate::scale::{AxisKind, ContributorId, MarkScales};
use crate::series::{Column, RawSeries, XValues};

/// Identifier of a model, used to key its scale contributions.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId(Arc<str>);

impl ModelId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ModelId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Per-scale switch: when set, the model withdraws its contribution instead
/// of widening the domain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreserveDomain {
    #[serde(default)]
    pub x: bool,
    #[serde(default)]
    pub y: bool,
    #[serde(default)]
    pub color: bool,
}

/// Notifications emitted by the model, drained with [`CurveModel::take_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelEvent {
    DataUpdated,
    LabelsUpdated,
}

/// Set for the duration of a normalization pass.
///
/// Clones share the same flag so scale listeners can check it without
/// borrowing the model.
#[derive(Debug, Clone, Default)]
pub struct DirtyFlag(Arc<AtomicBool>);

impl DirtyFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, dirty: bool) {
        self.0.store(dirty, Ordering::Release);
    }
}

/// Number of curves for the given input shape.
///
/// A single x sequence pairs with every y sequence; otherwise x and y are
/// paired index for index and the shorter side wins.
pub fn curve_count(x: &XValues, y_len: usize) -> usize {
    match x.series_count() {
        1 => y_len,
        n => n.min(y_len),
    }
}

/// Curve names: the given labels truncated or padded with `C1`, `C2`, …
pub fn curve_labels(labels: &[String], count: usize) -> Vec<String> {
    (0..count)
        .map(|i| labels.get(i).cloned().unwrap_or_else(|| format!("C{}", i + 1)))
        .collect()
}

fn value_at(column: Option<&Column>, index: usize) -> f64 {
    column.and_then(|c| c.get(index)).copied().unwrap_or(f64::NAN)
}

/// Build the curve records for `data`. Pure and deterministic.
pub fn build_records(data: &RawSeries, labels: &[String]) -> Vec<CurveRecord> {
    if data.x.is_empty() || data.y.is_empty() {
        return Vec::new();
    }

    let count = curve_count(&data.x, data.y.len());
    let last = data.y.len() - 1;
    let broadcast = data.x.series_count() == 1 && data.y.len() > 1;
    let names = curve_labels(labels, count);

    names
        .into_iter()
        .enumerate()
        .map(|(i, name)| {
            let y = &data.y[i];
            let next = data.y.get((i + 1).min(last));
            let x = if broadcast { data.x.series(0) } else { data.x.series(i) };
            let len = match (broadcast, x) {
                (true, _) => y.len(),
                (false, Some(x)) => x.len().min(y.len()),
                (false, None) => 0,
            };

            let values = (0..len)
                .map(|j| PointRecord {
                    x: value_at(x, j),
                    y: y[j],
                    y0: value_at(next, j),
                    sub_index: j,
                })
                .collect();

            CurveRecord {
                name,
                values,
                color: data.curve_color(i),
                index: i,
            }
        })
        .collect()
}

/// Owns the raw arrays and the curve records normalized from them.
#[derive(Debug)]
pub struct CurveModel {
    id: ModelId,
    data: RawSeries,
    labels: Vec<String>,
    preserve_domain: PreserveDomain,
    scales: MarkScales,
    records: Vec<CurveRecord>,
    dirty: DirtyFlag,
    events: Vec<ModelEvent>,
}

impl CurveModel {
    /// Create a model and run the first normalization pass.
    pub fn new(id: impl Into<ModelId>, data: RawSeries, scales: MarkScales) -> Self {
        let mut model = Self {
            id: id.into(),
            data,
            labels: Vec::new(),
            preserve_domain: PreserveDomain::default(),
            scales,
            records: Vec::new(),
            dirty: DirtyFlag::default(),
            events: Vec::new(),
        };
        model.normalize();
        model
    }

    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.set_labels(labels);
        self
    }

    pub fn with_preserve_domain(mut self, preserve: PreserveDomain) -> Self {
        self.set_preserve_domain(preserve);
        self
    }

    pub fn id(&self) -> &ModelId {
        &self.id
    }

    pub fn data(&self) -> &RawSeries {
        &self.data
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn preserve_domain(&self) -> PreserveDomain {
        self.preserve_domain
    }

    pub fn scales(&self) -> &MarkScales {
        &self.scales
    }

    pub fn records(&self) -> &[CurveRecord] {
        &self.records
    }

    pub fn curve_count(&self) -> usize {
        self.records.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.is_set()
    }

    /// A handle to the dirty flag for scale listeners.
    pub fn dirty_flag(&self) -> DirtyFlag {
        self.dirty.clone()
    }

    pub fn contributor(&self, axis: AxisKind) -> ContributorId {
        ContributorId::new(self.id.clone(), axis)
    }

    pub fn set_data(&mut self, data: RawSeries) {
        self.data = data;
        self.react(reactions_for(Field::X) | reactions_for(Field::Y) | reactions_for(Field::Color));
    }

    pub fn set_x(&mut self, x: XValues) {
        self.data.x = x;
        self.react(reactions_for(Field::X));
    }

    pub fn set_y(&mut self, y: Vec<Column>) {
        self.data.y = y;
        self.react(reactions_for(Field::Y));
    }

    pub fn set_color(&mut self, color: Column) {
        self.data.color = color;
        self.react(reactions_for(Field::Color));
    }

    pub fn set_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
        self.react(reactions_for(Field::Labels));
    }

    pub fn set_preserve_domain(&mut self, preserve: PreserveDomain) {
        self.preserve_domain = preserve;
        self.react(reactions_for(Field::PreserveDomain));
    }

    pub(crate) fn stage_data(&mut self, data: RawSeries) {
        self.data = data;
    }

    pub(crate) fn stage_labels(&mut self, labels: Vec<String>) {
        self.labels = labels;
    }

    pub(crate) fn stage_preserve_domain(&mut self, preserve: PreserveDomain) {
        self.preserve_domain = preserve;
    }

    /// Run the model-side reactions of a change batch in declared order.
    pub(crate) fn react(&mut self, reactions: ReactionSet) {
        let reactions = reactions.collapsed();
        if reactions.contains(ReactionSet::NORMALIZE) {
            self.normalize();
        }
        if reactions.contains(ReactionSet::UPDATE_LABELS) {
            self.update_labels();
        }
        if reactions.contains(ReactionSet::UPDATE_DOMAINS) {
            self.update_domains();
        }
    }

    /// Rebuild the curve records from the raw arrays and refresh the scale
    /// domains, then emit [`ModelEvent::DataUpdated`].
    ///
    /// The dirty flag stays set until the domains are refreshed, so scale
    /// listeners can ignore the notifications this pass triggers.
    pub fn normalize(&mut self) {
        profile_function!();

        self.dirty.set(true);
        self.records = build_records(&self.data, &self.labels);
        self.update_domains();
        self.dirty.set(false);

        tracing::debug!(model = %self.id, curves = self.records.len(), "normalized curve data");
        self.events.push(ModelEvent::DataUpdated);
    }

    /// Curve names for the current labels and curve count.
    pub fn get_labels(&self) -> Vec<String> {
        let count = if self.data.x.is_empty() || self.data.y.is_empty() {
            0
        } else {
            curve_count(&self.data.x, self.data.y.len())
        };
        curve_labels(&self.labels, count)
    }

    /// Rename existing records without renormalizing, then emit
    /// [`ModelEvent::LabelsUpdated`].
    pub fn update_labels(&mut self) {
        let names = self.get_labels();
        for (record, name) in self.records.iter_mut().zip(names) {
            record.name = name;
        }
        self.events.push(ModelEvent::LabelsUpdated);
    }

    /// Push this model's extents to its scales, or withdraw them where
    /// [`PreserveDomain`] is set.
    pub fn update_domains(&self) {
        let x_contributor = self.contributor(AxisKind::X);
        if self.preserve_domain.x {
            self.scales.x.del_domain(&x_contributor);
        } else {
            let xs = self.per_curve(|p| p.x);
            self.scales.x.compute_and_set_domain(&xs, &x_contributor);
        }

        let y_contributor = self.contributor(AxisKind::Y);
        if self.preserve_domain.y {
            self.scales.y.del_domain(&y_contributor);
        } else {
            let ys = self.per_curve(|p| p.y);
            self.scales.y.compute_and_set_domain(&ys, &y_contributor);
        }

        if let Some(color_scale) = &self.scales.color {
            let color_contributor = self.contributor(AxisKind::Color);
            if self.preserve_domain.color {
                color_scale.del_domain(&color_contributor);
            } else {
                let colors: Vec<f64> = self
                    .records
                    .iter()
                    .map(|r| r.color.unwrap_or(f64::NAN))
                    .collect();
                color_scale.compute_and_set_domain(&[colors], &color_contributor);
            }
        }
    }

    fn per_curve(&self, f: impl Fn(&PointRecord) -> f64) -> Vec<Vec<f64>> {
        self.records
            .iter()
            .map(|r| r.values.iter().map(&f).collect())
            .collect()
    }

    pub fn take_events(&mut self) -> Vec<ModelEvent> {
        std::mem::take(&mut self.events)
    }
}
