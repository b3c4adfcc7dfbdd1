use parking_lot::RwLock;

use super::{
    AxisScale, ContributorId, DomainContributions, ListenerSet, ScaleEvent, ScaleListener,
    SubscriptionId,
};

/// Scale type for axis transformation.
///
/// Determines how data values are mapped to pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ScaleType {
    /// Linear scale (default).
    #[default]
    Linear,

    /// Logarithmic scale.
    ///
    /// Data must be > 0; non-positive values map to NaN and the point is
    /// treated as undefined.
    Logarithmic {
        /// Log base (typically 10 or e)
        base: f64,
    },

    /// Symmetric logarithmic scale.
    ///
    /// Uses linear scaling near zero and log scaling for larger magnitudes.
    Symlog {
        /// Threshold below which linear scaling is used
        lin_threshold: f64,
    },
}

impl ScaleType {
    /// Create a base-10 logarithmic scale.
    pub fn log10() -> Self {
        Self::Logarithmic { base: 10.0 }
    }

    /// Create a symmetric log scale with the given threshold.
    pub fn symlog(threshold: f64) -> Self {
        Self::Symlog {
            lin_threshold: threshold,
        }
    }

    fn forward(&self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Logarithmic { base } => {
                if value > 0.0 {
                    value.log(*base)
                } else {
                    f64::NAN
                }
            }
            Self::Symlog { lin_threshold } => {
                let thresh = *lin_threshold;
                if value.abs() < thresh {
                    value / thresh
                } else {
                    value.signum() * (1.0 + (value.abs() / thresh).ln())
                }
            }
        }
    }

    fn inverse(&self, value: f64) -> f64 {
        match self {
            Self::Linear => value,
            Self::Logarithmic { base } => base.powf(value),
            Self::Symlog { lin_threshold } => {
                let thresh = *lin_threshold;
                if value.abs() < 1.0 {
                    value * thresh
                } else {
                    value.signum() * thresh * (value.abs() - 1.0).exp()
                }
            }
        }
    }

    /// Transform a data value to normalized coordinates, `[min, max]` → `[0, 1]`.
    pub fn normalize(&self, value: f64, min: f64, max: f64) -> f64 {
        if (max - min).abs() < f64::EPSILON {
            return 0.5;
        }
        let (lo, hi) = (self.forward(min), self.forward(max));
        if !lo.is_finite() || !hi.is_finite() {
            // Domain invalid for this transform; fall back to linear.
            return (value - min) / (max - min);
        }
        (self.forward(value) - lo) / (hi - lo)
    }

    /// Inverse of [`normalize`](Self::normalize).
    pub fn denormalize(&self, normalized: f64, min: f64, max: f64) -> f64 {
        let (lo, hi) = (self.forward(min), self.forward(max));
        if (max - min).abs() < f64::EPSILON || !lo.is_finite() || !hi.is_finite() {
            return min + normalized * (max - min);
        }
        self.inverse(lo + normalized * (hi - lo))
    }
}

#[derive(Debug)]
struct ScaleState {
    contributions: DomainContributions,
    fixed: Option<(f64, f64)>,
    range: (f64, f64),
    offset: f64,
}

impl ScaleState {
    fn domain(&self) -> (f64, f64) {
        self.fixed
            .or_else(|| self.contributions.extent())
            .unwrap_or((0.0, 1.0))
    }
}

/// A continuous axis scale whose domain is the union of every contributor's
/// extent, unless pinned with [`set_domain`](Self::set_domain).
pub struct ContinuousScale {
    scale_type: ScaleType,
    state: RwLock<ScaleState>,
    listeners: ListenerSet,
}

impl ContinuousScale {
    pub fn new(scale_type: ScaleType, range: (f64, f64)) -> Self {
        Self {
            scale_type,
            state: RwLock::new(ScaleState {
                contributions: DomainContributions::default(),
                fixed: None,
                range,
                offset: 0.0,
            }),
            listeners: ListenerSet::new(),
        }
    }

    /// Linear scale over the given pixel range. Use a reversed range for
    /// screen-space y axes.
    pub fn linear(range: (f64, f64)) -> Self {
        Self::new(ScaleType::Linear, range)
    }

    pub fn scale_type(&self) -> ScaleType {
        self.scale_type
    }

    pub fn domain(&self) -> (f64, f64) {
        self.state.read().domain()
    }

    pub fn range(&self) -> (f64, f64) {
        self.state.read().range
    }

    pub fn has_contribution(&self, contributor: &ContributorId) -> bool {
        self.state.read().contributions.contains(contributor)
    }

    /// Pin the domain, or release it back to the contributions with `None`.
    pub fn set_domain(&self, domain: Option<(f64, f64)>) {
        self.update_domain(|state| state.fixed = domain);
    }

    pub fn set_range(&self, range: (f64, f64)) {
        let changed = {
            let mut state = self.state.write();
            let changed = state.range != range;
            state.range = range;
            changed
        };
        if changed {
            self.listeners.notify(ScaleEvent::RangeChanged);
        }
    }

    /// Shift every pixel position. Listeners see a range change.
    pub fn set_offset(&self, offset: f64) {
        let changed = {
            let mut state = self.state.write();
            let changed = state.offset != offset;
            state.offset = offset;
            changed
        };
        if changed {
            self.listeners.notify(ScaleEvent::RangeChanged);
        }
    }

    fn update_domain(&self, f: impl FnOnce(&mut ScaleState)) {
        let changed = {
            let mut state = self.state.write();
            let before = state.domain();
            f(&mut state);
            state.domain() != before
        };
        if changed {
            tracing::trace!(domain = ?self.domain(), "scale domain changed");
            self.listeners.notify(ScaleEvent::DomainChanged);
        }
    }
}

impl AxisScale for ContinuousScale {
    fn scale(&self, value: f64) -> f64 {
        let state = self.state.read();
        let (min, max) = state.domain();
        let (r0, r1) = state.range;
        r0 + self.scale_type.normalize(value, min, max) * (r1 - r0)
    }

    fn invert(&self, pixel: f64) -> f64 {
        let state = self.state.read();
        let (min, max) = state.domain();
        let (r0, r1) = state.range;
        let t = if (r1 - r0).abs() < f64::EPSILON {
            0.0
        } else {
            (pixel - r0) / (r1 - r0)
        };
        self.scale_type.denormalize(t, min, max)
    }

    fn offset(&self) -> f64 {
        self.state.read().offset
    }

    fn compute_and_set_domain(&self, values: &[Vec<f64>], contributor: &ContributorId) {
        self.update_domain(|state| state.contributions.set(contributor, values));
    }

    fn del_domain(&self, contributor: &ContributorId) {
        self.update_domain(|state| state.contributions.remove(contributor));
    }

    fn subscribe(&self, listener: ScaleListener) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.unsubscribe(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ModelId;
    use crate::scale::AxisKind;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn x_of(model: &str) -> ContributorId {
        ContributorId::new(ModelId::new(model), AxisKind::X)
    }

    #[test]
    fn test_linear_round_trip() {
        let scale = ContinuousScale::linear((0.0, 100.0));
        scale.compute_and_set_domain(&[vec![0.0, 10.0]], &x_of("a"));
        assert_eq!(scale.scale(5.0), 50.0);
        assert_eq!(scale.invert(25.0), 2.5);
    }

    #[test]
    fn test_reversed_range() {
        let scale = ContinuousScale::linear((200.0, 0.0));
        scale.compute_and_set_domain(&[vec![0.0, 100.0]], &x_of("a"));
        assert_eq!(scale.scale(0.0), 200.0);
        assert_eq!(scale.scale(100.0), 0.0);
    }

    #[test]
    fn test_log_round_trip() {
        let scale = ContinuousScale::new(ScaleType::log10(), (0.0, 2.0));
        scale.compute_and_set_domain(&[vec![1.0, 100.0]], &x_of("a"));
        assert!((scale.scale(10.0) - 1.0).abs() < 1e-12);
        assert!((scale.invert(1.0) - 10.0).abs() < 1e-9);
        assert!(scale.scale(-1.0).is_nan());
    }

    #[test]
    fn test_symlog_round_trip() {
        let kind = ScaleType::symlog(1.0);
        for v in [-50.0, -0.5, 0.0, 0.25, 7.0] {
            let t = kind.normalize(v, -100.0, 100.0);
            assert!((kind.denormalize(t, -100.0, 100.0) - v).abs() < 1e-9);
        }
    }

    #[test]
    fn test_domain_union_and_delete() {
        let scale = ContinuousScale::linear((0.0, 1.0));
        scale.compute_and_set_domain(&[vec![0.0, 5.0]], &x_of("a"));
        scale.compute_and_set_domain(&[vec![3.0, 20.0]], &x_of("b"));
        assert_eq!(scale.domain(), (0.0, 20.0));

        scale.del_domain(&x_of("b"));
        assert_eq!(scale.domain(), (0.0, 5.0));
        assert!(!scale.has_contribution(&x_of("b")));
    }

    #[test]
    fn test_notifies_only_on_change() {
        let scale = ContinuousScale::linear((0.0, 1.0));
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        scale.subscribe(Arc::new(move |event: ScaleEvent| {
            if event == ScaleEvent::DomainChanged {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        }));

        scale.compute_and_set_domain(&[vec![0.0, 5.0]], &x_of("a"));
        scale.compute_and_set_domain(&[vec![5.0, 0.0]], &x_of("a"));
        scale.set_domain(Some((0.0, 5.0)));
        scale.set_domain(Some((0.0, 6.0)));

        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_range_changed_event() {
        let scale = ContinuousScale::linear((0.0, 1.0));
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        scale.subscribe(Arc::new(move |event: ScaleEvent| sink.lock().push(event)));

        scale.set_range((0.0, 1.0));
        scale.set_range((0.0, 50.0));

        assert_eq!(*seen.lock(), vec![ScaleEvent::RangeChanged]);
    }

    #[test]
    fn test_offset_change_notifies() {
        let scale = ContinuousScale::linear((0.0, 10.0));
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        scale.subscribe(Arc::new(move |event: ScaleEvent| sink.lock().push(event)));

        scale.set_offset(0.0);
        scale.set_offset(2.5);
        scale.set_offset(2.5);

        assert_eq!(scale.offset(), 2.5);
        assert_eq!(*seen.lock(), vec![ScaleEvent::RangeChanged]);
    }
}
