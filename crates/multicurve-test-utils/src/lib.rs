//! Test utilities for multicurve.
//!
//! - [`MockAxisScale`] / [`MockColorScale`] - scales with a fixed linear
//!   mapping that record every domain call and let tests fire notifications.
//! - [`RecordingRenderer`] - a renderer that records every command.
//!
//! Mocks use `parking_lot::Mutex` so recording methods can take `&self`, and
//! handles are cheap to clone so a test can keep one after handing the
//! original to a mark.
//!
//! ```rust
//! use multicurve::model::ModelId;
//! use multicurve::scale::{AxisKind, AxisScale, ContributorId};
//! use multicurve_test_utils::MockAxisScale;
//!
//! let scale = MockAxisScale::new(10.0, 0.0);
//! let id = ContributorId::new(ModelId::new("m"), AxisKind::X);
//! scale.compute_and_set_domain(&[vec![1.0, 2.0]], &id);
//!
//! assert_eq!(scale.count_compute_and_set_domain(), 1);
//! assert_eq!(scale.scale(2.0), 20.0);
//! ```

mod mock_scale;
mod recording_renderer;

pub use mock_scale::{MockAxisScale, MockColorScale, ScaleCall};
pub use recording_renderer::RecordingRenderer;
