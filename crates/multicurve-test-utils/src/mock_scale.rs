//! Mock scales that record domain calls.

use std::sync::Arc;

use multicurve::Color;
use multicurve::scale::{
    AxisScale, ColorScale, ContributorId, ListenerSet, ScaleEvent, ScaleListener, SubscriptionId,
};
use parking_lot::Mutex;

/// A domain call received by a mock scale.
#[derive(Debug, Clone, PartialEq)]
pub enum ScaleCall {
    ComputeAndSetDomain {
        contributor: String,
        values: Vec<Vec<f64>>,
    },
    DelDomain {
        contributor: String,
    },
}

#[derive(Default)]
struct Recorder {
    calls: Mutex<Vec<ScaleCall>>,
    listeners: ListenerSet,
}

impl Recorder {
    fn compute(&self, values: &[Vec<f64>], contributor: &ContributorId) {
        self.calls.lock().push(ScaleCall::ComputeAndSetDomain {
            contributor: contributor.to_string(),
            values: values.to_vec(),
        });
    }

    fn delete(&self, contributor: &ContributorId) {
        self.calls.lock().push(ScaleCall::DelDomain {
            contributor: contributor.to_string(),
        });
    }
}

/// Axis scale mapping `v` to `v * factor + origin`.
///
/// Domain calls are recorded but do not change the mapping and do not emit
/// notifications; use [`emit`](Self::emit) to simulate a domain change.
#[derive(Clone)]
pub struct MockAxisScale {
    factor: f64,
    origin: f64,
    offset: Arc<Mutex<f64>>,
    recorder: Arc<Recorder>,
}

impl MockAxisScale {
    pub fn new(factor: f64, origin: f64) -> Self {
        Self {
            factor,
            origin,
            offset: Arc::new(Mutex::new(0.0)),
            recorder: Arc::new(Recorder::default()),
        }
    }

    pub fn set_offset(&self, offset: f64) {
        *self.offset.lock() = offset;
    }

    pub fn emit(&self, event: ScaleEvent) {
        self.recorder.listeners.notify(event);
    }

    pub fn calls(&self) -> Vec<ScaleCall> {
        self.recorder.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.recorder.calls.lock().clear();
    }

    pub fn count_compute_and_set_domain(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ScaleCall::ComputeAndSetDomain { .. }))
            .count()
    }

    pub fn count_del_domain(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, ScaleCall::DelDomain { .. }))
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.recorder.listeners.len()
    }
}

impl AxisScale for MockAxisScale {
    fn scale(&self, value: f64) -> f64 {
        value * self.factor + self.origin
    }

    fn invert(&self, pixel: f64) -> f64 {
        (pixel - self.origin) / self.factor
    }

    fn offset(&self) -> f64 {
        *self.offset.lock()
    }

    fn compute_and_set_domain(&self, values: &[Vec<f64>], contributor: &ContributorId) {
        self.recorder.compute(values, contributor);
    }

    fn del_domain(&self, contributor: &ContributorId) {
        self.recorder.delete(contributor);
    }

    fn subscribe(&self, listener: ScaleListener) -> SubscriptionId {
        self.recorder.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.recorder.listeners.unsubscribe(id);
    }
}

/// Color scale mapping `v` to a gray of intensity `v` (clamped to `[0, 1]`).
#[derive(Clone, Default)]
pub struct MockColorScale {
    recorder: Arc<Recorder>,
}

impl MockColorScale {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: ScaleEvent) {
        self.recorder.listeners.notify(event);
    }

    pub fn calls(&self) -> Vec<ScaleCall> {
        self.recorder.calls.lock().clone()
    }
}

impl ColorScale for MockColorScale {
    fn scale(&self, value: f64) -> Color {
        let v = value.clamp(0.0, 1.0) as f32;
        Color::rgb(v, v, v)
    }

    fn compute_and_set_domain(&self, values: &[Vec<f64>], contributor: &ContributorId) {
        self.recorder.compute(values, contributor);
    }

    fn del_domain(&self, contributor: &ContributorId) {
        self.recorder.delete(contributor);
    }

    fn subscribe(&self, listener: ScaleListener) -> SubscriptionId {
        self.recorder.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.recorder.listeners.unsubscribe(id);
    }
}
