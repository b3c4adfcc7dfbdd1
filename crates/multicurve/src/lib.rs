//! Multicurve
//!
//! An interactive multi-curve chart mark. The crate has two halves:
//!
//! - [`model::CurveModel`] turns raw `x`/`y`/`color` arrays into ordered
//!   [`record::CurveRecord`]s and keeps the axis scales' domains in sync.
//! - [`mark::CurveMark`] reads those records through the [`scale::AxisScale`]
//!   collaborators, builds a [`scene::Scene`] for an external
//!   [`render::MarkRenderer`], and turns pointer gestures into selection,
//!   hover and drag edits that flow back into the model.
//!
//! ```no_run
//! use std::sync::Arc;
//! use multicurve::prelude::*;
//!
//! let x = Arc::new(ContinuousScale::linear((0.0, 400.0)));
//! let y = Arc::new(ContinuousScale::linear((300.0, 0.0)));
//! let scales = MarkScales::new(x, y);
//! let data = RawSeries::new(
//!     XValues::shared(vec![1.0, 2.0, 3.0]),
//!     vec![vec![10.0, 20.0, 30.0], vec![40.0, 50.0, 60.0]],
//! );
//! let model = CurveModel::new("gantt", data, scales);
//! # let _ = model;
//! ```

mod attribute;
pub mod color;
pub mod config;
pub mod drag;
pub mod error;
pub mod input;
pub mod interaction;
pub mod mark;
pub mod model;
pub mod notify;
pub mod record;
pub mod render;
pub mod scale;
pub mod scene;
pub mod selection;
pub mod series;
pub mod style;

pub use color::Color;
pub use error::{MarkError, MarkResult};

pub mod prelude {
    pub use crate::color::Color;
    pub use crate::config::MarkConfig;
    pub use crate::error::{MarkError, MarkResult};
    pub use crate::input::{HandleStatus, Modifiers};
    pub use crate::interaction::{EventName, InteractionMode, PointerEvent};
    pub use crate::mark::CurveMark;
    pub use crate::model::{CurveModel, ModelEvent, PreserveDomain};
    pub use crate::notify::{Change, HostMessage, StateDelta};
    pub use crate::record::{CurveRecord, PointRecord};
    pub use crate::render::{Animation, MarkRenderer, RenderCommand};
    pub use crate::scale::{
        AxisScale, ColorScale, ContinuousScale, GradientColorScale, MarkScales, ScaleType,
    };
    pub use crate::scene::{PlotArea, Scene};
    pub use crate::selection::Selection;
    pub use crate::series::{Column, RawSeries, XValues};
    pub use crate::style::{FillMode, Interpolation, LabelsVisibility, LineStyle, MarkerShape};
}
