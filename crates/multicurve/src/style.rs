//! Visual attributes of curves and their per-curve resolution.
//!
//! Every style is derived from the current configuration, color scale,
//! selection and hover state; nothing is patched incrementally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::attribute::attribute_enum;
use crate::color::{CATEGORY10, Color};
use crate::config::MarkConfig;
use crate::record::CurveRecord;
use crate::scale::ColorScale;
use crate::selection::Selection;

attribute_enum! {
    /// Area fill under or around a curve.
    #[derive(Default)]
    pub enum FillMode as "fill" {
        #[default]
        None => "none",
        /// Area between the curve and the top of the plot.
        Top => "top",
        /// Area between the curve and the bottom of the plot.
        Bottom => "bottom",
        /// Area between the curve and the next curve (`y0`).
        Between => "between",
        /// The curve path itself is filled.
        Inside => "inside",
    }
}

impl FillMode {
    /// Whether the mode draws a separate area with a baseline.
    pub fn has_area(self) -> bool {
        matches!(self, FillMode::Top | FillMode::Bottom | FillMode::Between)
    }
}

attribute_enum! {
    #[derive(Default)]
    pub enum LineStyle as "line_style" {
        #[default]
        Solid => "solid",
        Dashed => "dashed",
        Dotted => "dotted",
        DashDotted => "dash_dotted",
    }
}

impl LineStyle {
    pub fn dash(self) -> DashPattern {
        match self {
            LineStyle::Solid => DashPattern::SOLID,
            LineStyle::Dashed => DashPattern::new(vec![10.0, 10.0]),
            LineStyle::Dotted => DashPattern::new(vec![2.0, 10.0]),
            LineStyle::DashDotted => DashPattern::new(vec![10.0, 5.0, 2.0, 5.0]),
        }
    }
}

/// Alternating on/off segment lengths in pixels. Empty means solid.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashPattern {
    pub segments: Vec<f64>,
}

impl DashPattern {
    pub const SOLID: Self = Self {
        segments: Vec::new(),
    };

    pub fn new(segments: Vec<f64>) -> Self {
        Self { segments }
    }

    pub fn is_solid(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for DashPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_solid() {
            return f.write_str("none");
        }
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

attribute_enum! {
    pub enum MarkerShape as "marker" {
        Circle => "circle",
        Cross => "cross",
        Diamond => "diamond",
        Square => "square",
        TriangleDown => "triangle-down",
        TriangleUp => "triangle-up",
        Arrow => "arrow",
        Rectangle => "rectangle",
        Ellipse => "ellipse",
    }
}

attribute_enum! {
    /// Path interpolation handed to the renderer.
    #[derive(Default)]
    pub enum Interpolation as "interpolation" {
        #[default]
        Linear => "linear",
        Basis => "basis",
        Cardinal => "cardinal",
        Monotone => "monotone",
    }
}

attribute_enum! {
    /// Where curve names are shown.
    #[derive(Default)]
    pub enum LabelsVisibility as "labels_visibility" {
        #[default]
        None => "none",
        /// Next to the last defined point of each curve.
        Label => "label",
        Legend => "legend",
    }
}

/// Overrides applied to emphasized or de-emphasized curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmphasisStyle {
    pub opacity: Option<f64>,
    pub fill_opacity: Option<f64>,
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
    pub stroke_width: Option<f64>,
}

impl EmphasisStyle {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(&self, style: &mut ResolvedStyle) {
        if let Some(opacity) = self.opacity {
            style.opacity = opacity;
        }
        if let Some(fill_opacity) = self.fill_opacity {
            style.fill_opacity = fill_opacity;
        }
        if let Some(stroke) = self.stroke {
            style.stroke = stroke;
        }
        if let Some(fill) = self.fill {
            style.fill_color = fill;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width;
        }
    }
}

/// Fully resolved style of one curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub stroke: Color,
    pub stroke_width: f64,
    /// Fill color used for the area or, with [`FillMode::Inside`], the path.
    pub fill_color: Color,
    pub fill: FillMode,
    pub opacity: f64,
    pub fill_opacity: f64,
    pub dash: DashPattern,
    pub marker: Option<MarkerShape>,
    pub marker_size: f64,
}

impl ResolvedStyle {
    /// Fill applied to the line path itself.
    pub fn path_fill(&self) -> Option<Color> {
        (self.fill == FillMode::Inside).then_some(self.fill_color)
    }

    /// Fill applied to the separate area element.
    pub fn area_fill(&self) -> Option<Color> {
        self.fill.has_area().then_some(self.fill_color)
    }
}

/// The color a curve is drawn with: the color scale's mapping when the curve
/// has a color value and a color scale is bound, the palette otherwise.
pub fn element_color(config: &MarkConfig, curve: &CurveRecord, scale: Option<&dyn ColorScale>) -> Color {
    if let (Some(scale), Some(value)) = (scale, curve.color) {
        return scale.scale(value);
    }
    let palette: &[Color] = if config.colors.is_empty() {
        &CATEGORY10
    } else {
        &config.colors
    };
    palette[curve.index % palette.len()]
}

/// Fill color: `fill_colors` by curve position, or the element color when
/// the list is empty or too short.
pub fn fill_color(config: &MarkConfig, curve: &CurveRecord, element: Color) -> Color {
    config.fill_colors.get(curve.index).copied().unwrap_or(element)
}

/// Resolve the style of one curve from the current state.
pub fn resolve_style(
    config: &MarkConfig,
    curve: &CurveRecord,
    color_scale: Option<&dyn ColorScale>,
    selection: &Selection,
    hovered: Option<usize>,
) -> ResolvedStyle {
    let element = element_color(config, curve, color_scale);
    let mut style = ResolvedStyle {
        stroke: element,
        stroke_width: config.stroke_width,
        fill_color: fill_color(config, curve, element),
        fill: config.fill,
        opacity: config.opacities.get(curve.index).copied().unwrap_or(1.0),
        fill_opacity: config.fill_opacities.get(curve.index).copied().unwrap_or(1.0),
        dash: config.line_style.dash(),
        marker: config.marker,
        marker_size: config.marker_size,
    };

    if let Some(indices) = selection.indices() {
        if indices.contains(&(curve.index as u32)) {
            config.selected_style.apply(&mut style);
        } else {
            config.unselected_style.apply(&mut style);
        }
    }

    if let Some(hovered) = hovered {
        if hovered == curve.index {
            config.hovered_style.apply(&mut style);
        } else {
            config.unhovered_style.apply(&mut style);
        }
    }

    style
}
