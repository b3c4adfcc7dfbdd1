//! Change propagation between the host, the model and the view.
//!
//! Every settable attribute is a [`Field`]. [`reactions_for`] maps a field
//! to the work it triggers; a batch of changes runs the union of its
//! reactions once each, in the order [`ReactionSet`] declares them.
//! Outgoing traffic is a list of [`HostMessage`]s plus a [`StateDelta`] of
//! the attributes the mark itself wrote.

use serde::Serialize;

use crate::color::Color;
use crate::error::{MarkError, MarkResult};
use crate::interaction::InteractionMode;
use crate::model::PreserveDomain;
use crate::selection::Selection;
use crate::series::{self, Column, XValues};
use crate::style::{EmphasisStyle, FillMode, Interpolation, LabelsVisibility, LineStyle, MarkerShape};

/// Attributes the host can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    X,
    Y,
    Color,
    Labels,
    PreserveDomain,
    Colors,
    FillColors,
    StrokeWidth,
    Opacities,
    FillOpacities,
    Fill,
    LineStyle,
    Marker,
    MarkerSize,
    Interpolation,
    ClosePath,
    LabelsVisibility,
    CurvesSubset,
    Selected,
    Hovered,
    SelectedStyle,
    UnselectedStyle,
    HoveredStyle,
    UnhoveredStyle,
    Interactions,
    EnableMove,
    RestrictX,
    RestrictY,
    UpdateOnMove,
    DragColor,
}

bitflags::bitflags! {
    /// Work triggered by a change. Flags run in declaration order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ReactionSet: u16 {
        /// Rebuild curve records (also refreshes labels and domains).
        const NORMALIZE = 1 << 0;
        const UPDATE_LABELS = 1 << 1;
        const UPDATE_DOMAINS = 1 << 2;
        const PROCESS_INTERACTIONS = 1 << 3;
        /// Reconcile rendered curves with the records (animated).
        const DRAW = 1 << 4;
        /// Recompute pixel positions without reconciling.
        const RELAYOUT = 1 << 5;
        const UPDATE_STYLE = 1 << 6;
        const UPDATE_VISIBILITY = 1 << 7;
        const UPDATE_LABEL_TEXT = 1 << 8;
        const UPDATE_PADDING = 1 << 9;
    }
}

impl ReactionSet {
    /// Reactions performed by the model rather than the view.
    pub const MODEL: Self = Self::NORMALIZE
        .union(Self::UPDATE_LABELS)
        .union(Self::UPDATE_DOMAINS);

    /// Drop reactions already covered by a broader one in the same set.
    pub fn collapsed(self) -> Self {
        let mut set = self;
        if set.contains(Self::NORMALIZE) {
            set.remove(Self::UPDATE_LABELS | Self::UPDATE_DOMAINS);
        }
        if set.contains(Self::DRAW) {
            set.remove(
                Self::RELAYOUT | Self::UPDATE_STYLE | Self::UPDATE_VISIBILITY | Self::UPDATE_LABEL_TEXT,
            );
        }
        set
    }

    pub fn view(self) -> Self {
        self.difference(Self::MODEL)
    }
}

/// The reactions one field triggers.
pub fn reactions_for(field: Field) -> ReactionSet {
    match field {
        Field::X | Field::Y | Field::Color => ReactionSet::NORMALIZE,
        Field::Labels => ReactionSet::UPDATE_LABELS,
        Field::PreserveDomain => ReactionSet::UPDATE_DOMAINS,
        Field::Colors
        | Field::FillColors
        | Field::Opacities
        | Field::FillOpacities
        | Field::LineStyle
        | Field::Selected
        | Field::Hovered
        | Field::SelectedStyle
        | Field::UnselectedStyle
        | Field::HoveredStyle
        | Field::UnhoveredStyle => ReactionSet::UPDATE_STYLE,
        Field::StrokeWidth | Field::Marker | Field::MarkerSize => {
            ReactionSet::UPDATE_STYLE | ReactionSet::UPDATE_PADDING
        }
        Field::Fill => ReactionSet::RELAYOUT | ReactionSet::UPDATE_STYLE,
        Field::Interpolation | Field::ClosePath => ReactionSet::RELAYOUT,
        Field::LabelsVisibility | Field::CurvesSubset => ReactionSet::UPDATE_VISIBILITY,
        Field::Interactions => ReactionSet::PROCESS_INTERACTIONS,
        // Read on demand by the drag state machine.
        Field::EnableMove
        | Field::RestrictX
        | Field::RestrictY
        | Field::UpdateOnMove
        | Field::DragColor => ReactionSet::empty(),
    }
}

/// A new value for one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    X(XValues),
    Y(Vec<Column>),
    Color(Column),
    Labels(Vec<String>),
    PreserveDomain(PreserveDomain),
    Colors(Vec<Color>),
    FillColors(Vec<Color>),
    StrokeWidth(f64),
    Opacities(Vec<f64>),
    FillOpacities(Vec<f64>),
    Fill(FillMode),
    LineStyle(LineStyle),
    Marker(Option<MarkerShape>),
    MarkerSize(f64),
    Interpolation(Interpolation),
    ClosePath(bool),
    LabelsVisibility(LabelsVisibility),
    CurvesSubset(Vec<usize>),
    Selected(Selection),
    Hovered(Option<usize>),
    SelectedStyle(EmphasisStyle),
    UnselectedStyle(EmphasisStyle),
    HoveredStyle(EmphasisStyle),
    UnhoveredStyle(EmphasisStyle),
    Interactions(InteractionMode),
    EnableMove(bool),
    RestrictX(bool),
    RestrictY(bool),
    UpdateOnMove(bool),
    DragColor(Option<Color>),
}

impl Change {
    pub fn field(&self) -> Field {
        match self {
            Change::X(_) => Field::X,
            Change::Y(_) => Field::Y,
            Change::Color(_) => Field::Color,
            Change::Labels(_) => Field::Labels,
            Change::PreserveDomain(_) => Field::PreserveDomain,
            Change::Colors(_) => Field::Colors,
            Change::FillColors(_) => Field::FillColors,
            Change::StrokeWidth(_) => Field::StrokeWidth,
            Change::Opacities(_) => Field::Opacities,
            Change::FillOpacities(_) => Field::FillOpacities,
            Change::Fill(_) => Field::Fill,
            Change::LineStyle(_) => Field::LineStyle,
            Change::Marker(_) => Field::Marker,
            Change::MarkerSize(_) => Field::MarkerSize,
            Change::Interpolation(_) => Field::Interpolation,
            Change::ClosePath(_) => Field::ClosePath,
            Change::LabelsVisibility(_) => Field::LabelsVisibility,
            Change::CurvesSubset(_) => Field::CurvesSubset,
            Change::Selected(_) => Field::Selected,
            Change::Hovered(_) => Field::Hovered,
            Change::SelectedStyle(_) => Field::SelectedStyle,
            Change::UnselectedStyle(_) => Field::UnselectedStyle,
            Change::HoveredStyle(_) => Field::HoveredStyle,
            Change::UnhoveredStyle(_) => Field::UnhoveredStyle,
            Change::Interactions(_) => Field::Interactions,
            Change::EnableMove(_) => Field::EnableMove,
            Change::RestrictX(_) => Field::RestrictX,
            Change::RestrictY(_) => Field::RestrictY,
            Change::UpdateOnMove(_) => Field::UpdateOnMove,
            Change::DragColor(_) => Field::DragColor,
        }
    }

    /// Decode an attribute update sent by the host as `name` + JSON value.
    pub fn decode(name: &str, value: serde_json::Value) -> MarkResult<Change> {
        use serde_json::from_value;

        let change = match name {
            "x" => Change::X(series::decode_x(value)?),
            "y" => Change::Y(series::decode_y(value)?),
            "color" => Change::Color(series::decode_column(value)?),
            "labels" => Change::Labels(from_value(value)?),
            "preserve_domain" => Change::PreserveDomain(from_value(value)?),
            "colors" => Change::Colors(from_value(value)?),
            "fill_colors" => Change::FillColors(from_value(value)?),
            "stroke_width" => Change::StrokeWidth(from_value(value)?),
            "opacities" => Change::Opacities(from_value(value)?),
            "fill_opacities" => Change::FillOpacities(from_value(value)?),
            "fill" => Change::Fill(from_value(value)?),
            "line_style" => Change::LineStyle(from_value(value)?),
            "marker" => Change::Marker(from_value(value)?),
            "marker_size" => Change::MarkerSize(from_value(value)?),
            "interpolation" => Change::Interpolation(from_value(value)?),
            "close_path" => Change::ClosePath(from_value(value)?),
            "labels_visibility" => Change::LabelsVisibility(from_value(value)?),
            "curves_subset" => Change::CurvesSubset(from_value(value)?),
            "selected" => Change::Selected(from_value(value)?),
            "hovered_point" => Change::Hovered(from_value(value)?),
            "selected_style" => Change::SelectedStyle(from_value(value)?),
            "unselected_style" => Change::UnselectedStyle(from_value(value)?),
            "hovered_style" => Change::HoveredStyle(from_value(value)?),
            "unhovered_style" => Change::UnhoveredStyle(from_value(value)?),
            "interactions" => Change::Interactions(from_value(value)?),
            "enable_move" => Change::EnableMove(from_value(value)?),
            "restrict_x" => Change::RestrictX(from_value(value)?),
            "restrict_y" => Change::RestrictY(from_value(value)?),
            "update_on_move" => Change::UpdateOnMove(from_value(value)?),
            "drag_color" => Change::DragColor(from_value(value)?),
            other => return Err(MarkError::unknown("attribute", other)),
        };
        Ok(change)
    }
}

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
}

/// Messages sent from the mark to the host.
///
/// Serializes as `{"event": "<name>", ...}`. `index` is the point's position
/// within its curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostMessage {
    DragStart {
        point: DataPoint,
        index: usize,
        curve: usize,
    },
    Drag {
        origin: DataPoint,
        point: DataPoint,
        index: usize,
        curve: usize,
    },
    DragEnd {
        point: DataPoint,
        index: usize,
        curve: usize,
    },
    Hover {
        curve: Option<usize>,
    },
    ElementClick {
        curve: Option<usize>,
    },
    LegendClick {
        curve: Option<usize>,
    },
    BackgroundClick,
}

impl HostMessage {
    pub fn to_json(&self) -> MarkResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Attributes written by the mark that the host has not seen yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateDelta {
    pub x: Option<XValues>,
    pub y: Option<Vec<Column>>,
    pub selected: Option<Selection>,
    pub hovered: Option<Option<usize>>,
}

impl StateDelta {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none() && self.selected.is_none() && self.hovered.is_none()
    }

    /// Encode as a JSON object holding only the changed attributes.
    pub fn to_json(&self) -> MarkResult<serde_json::Value> {
        let mut object = serde_json::Map::new();
        if let Some(x) = &self.x {
            object.insert("x".into(), series::encode_x(x)?);
        }
        if let Some(y) = &self.y {
            object.insert("y".into(), series::encode_columns(y)?);
        }
        if let Some(selected) = &self.selected {
            object.insert("selected".into(), serde_json::to_value(selected)?);
        }
        if let Some(hovered) = &self.hovered {
            object.insert("hovered_point".into(), serde_json::to_value(hovered)?);
        }
        Ok(serde_json::Value::Object(object))
    }
}
