use parking_lot::RwLock;

use super::{
    ColorScale, ContributorId, DomainContributions, ListenerSet, ScaleEvent, ScaleListener,
    SubscriptionId,
};
use crate::color::Color;

#[derive(Debug)]
struct GradientState {
    stops: Vec<Color>,
    contributions: DomainContributions,
}

/// A color scale interpolating linearly between evenly spaced stops.
pub struct GradientColorScale {
    state: RwLock<GradientState>,
    listeners: ListenerSet,
}

impl GradientColorScale {
    pub fn new(stops: Vec<Color>) -> Self {
        Self {
            state: RwLock::new(GradientState {
                stops,
                contributions: DomainContributions::default(),
            }),
            listeners: ListenerSet::new(),
        }
    }

    pub fn domain(&self) -> Option<(f64, f64)> {
        self.state.read().contributions.extent()
    }

    /// Replace the color stops. Emits [`ScaleEvent::RangeChanged`].
    pub fn set_stops(&self, stops: Vec<Color>) {
        self.state.write().stops = stops;
        self.listeners.notify(ScaleEvent::RangeChanged);
    }

    fn update_domain(&self, f: impl FnOnce(&mut DomainContributions)) {
        let changed = {
            let mut state = self.state.write();
            let before = state.contributions.extent();
            f(&mut state.contributions);
            state.contributions.extent() != before
        };
        if changed {
            self.listeners.notify(ScaleEvent::DomainChanged);
        }
    }
}

impl ColorScale for GradientColorScale {
    fn scale(&self, value: f64) -> Color {
        let state = self.state.read();
        let (first, last) = match (state.stops.first(), state.stops.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Color::TRANSPARENT,
        };
        if !value.is_finite() {
            return Color::TRANSPARENT;
        }
        let Some((min, max)) = state.contributions.extent() else {
            return first;
        };
        if (max - min).abs() < f64::EPSILON || state.stops.len() == 1 {
            return first;
        }

        let t = ((value - min) / (max - min)).clamp(0.0, 1.0);
        let segments = (state.stops.len() - 1) as f64;
        let position = t * segments;
        let lower = position.floor() as usize;
        if lower >= state.stops.len() - 1 {
            return last;
        }
        state.stops[lower].lerp(state.stops[lower + 1], (position - lower as f64) as f32)
    }

    fn compute_and_set_domain(&self, values: &[Vec<f64>], contributor: &ContributorId) {
        self.update_domain(|contributions| contributions.set(contributor, values));
    }

    fn del_domain(&self, contributor: &ContributorId) {
        self.update_domain(|contributions| contributions.remove(contributor));
    }

    fn subscribe(&self, listener: ScaleListener) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners.unsubscribe(id);
    }
}
