//! View configuration of a curve mark.

use serde::{Deserialize, Serialize};

use crate::color::{CATEGORY10, Color};
use crate::error::MarkResult;
use crate::interaction::InteractionMode;
use crate::style::{EmphasisStyle, FillMode, Interpolation, LabelsVisibility, LineStyle, MarkerShape};

/// Default marker area in square pixels.
pub const DEFAULT_MARKER_SIZE: f64 = 64.0;

/// View attributes of a [`CurveMark`](crate::mark::CurveMark).
///
/// Per-curve arrays (`colors`, `fill_colors`, `opacities`, `fill_opacities`)
/// are indexed by curve position; `colors` wraps around, the others fall back
/// to a default when shorter than the curve count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkConfig {
    pub colors: Vec<Color>,
    pub fill_colors: Vec<Color>,
    pub stroke_width: f64,
    pub opacities: Vec<f64>,
    pub fill_opacities: Vec<f64>,
    pub fill: FillMode,
    pub line_style: LineStyle,
    pub marker: Option<MarkerShape>,
    /// Marker area in square pixels.
    pub marker_size: f64,
    /// Reference marker size; a dragged marker grows to five times this.
    pub default_size: f64,
    pub interpolation: Interpolation,
    pub close_path: bool,
    pub labels_visibility: LabelsVisibility,
    /// Curves to show. Empty shows every curve.
    pub curves_subset: Vec<usize>,

    pub enable_move: bool,
    /// Restrict drag motion to the X direction.
    pub restrict_x: bool,
    /// Restrict drag motion to the Y direction.
    pub restrict_y: bool,
    /// Write drag edits on every move instead of only at the end.
    pub update_on_move: bool,
    pub drag_color: Option<Color>,

    pub selected_style: EmphasisStyle,
    pub unselected_style: EmphasisStyle,
    pub hovered_style: EmphasisStyle,
    pub unhovered_style: EmphasisStyle,

    pub interactions: InteractionMode,
}

impl Default for MarkConfig {
    fn default() -> Self {
        Self {
            colors: CATEGORY10.to_vec(),
            fill_colors: CATEGORY10.to_vec(),
            stroke_width: 2.0,
            opacities: Vec::new(),
            fill_opacities: Vec::new(),
            fill: FillMode::None,
            line_style: LineStyle::Solid,
            marker: None,
            marker_size: DEFAULT_MARKER_SIZE,
            default_size: DEFAULT_MARKER_SIZE,
            interpolation: Interpolation::Linear,
            close_path: false,
            labels_visibility: LabelsVisibility::None,
            curves_subset: Vec::new(),
            enable_move: false,
            restrict_x: false,
            restrict_y: false,
            update_on_move: false,
            drag_color: None,
            selected_style: EmphasisStyle::default(),
            unselected_style: EmphasisStyle::default(),
            hovered_style: EmphasisStyle::default(),
            unhovered_style: EmphasisStyle::default(),
            interactions: InteractionMode::None,
        }
    }
}

impl MarkConfig {
    pub fn from_json(json: &str) -> MarkResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Marker size while a point is being dragged.
    pub fn drag_size(&self) -> f64 {
        5.0 * self.default_size
    }

    /// Padding the plot must reserve so strokes and markers are not clipped.
    pub fn view_padding(&self) -> f64 {
        let stroke = self.stroke_width / 2.0;
        match self.marker {
            Some(_) => (self.marker_size.sqrt() / 2.0 + 1.0).max(stroke),
            None => stroke,
        }
    }

    /// Whether curve `index` is shown under `curves_subset`.
    pub fn is_curve_visible(&self, index: usize) -> bool {
        self.curves_subset.is_empty() || self.curves_subset.contains(&index)
    }

    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_fill_colors(mut self, fill_colors: Vec<Color>) -> Self {
        self.fill_colors = fill_colors;
        self
    }

    pub fn with_stroke_width(mut self, width: f64) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_opacities(mut self, opacities: Vec<f64>) -> Self {
        self.opacities = opacities;
        self
    }

    pub fn with_fill_opacities(mut self, fill_opacities: Vec<f64>) -> Self {
        self.fill_opacities = fill_opacities;
        self
    }

    pub fn with_fill(mut self, fill: FillMode) -> Self {
        self.fill = fill;
        self
    }

    pub fn with_line_style(mut self, line_style: LineStyle) -> Self {
        self.line_style = line_style;
        self
    }

    pub fn with_marker(mut self, marker: MarkerShape) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn with_marker_size(mut self, size: f64) -> Self {
        self.marker_size = size;
        self
    }

    pub fn with_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    pub fn with_close_path(mut self, close_path: bool) -> Self {
        self.close_path = close_path;
        self
    }

    pub fn with_labels_visibility(mut self, visibility: LabelsVisibility) -> Self {
        self.labels_visibility = visibility;
        self
    }

    pub fn with_curves_subset(mut self, subset: Vec<usize>) -> Self {
        self.curves_subset = subset;
        self
    }

    pub fn with_enable_move(mut self, enable: bool) -> Self {
        self.enable_move = enable;
        self
    }

    pub fn with_restrict_x(mut self, restrict: bool) -> Self {
        self.restrict_x = restrict;
        self
    }

    pub fn with_restrict_y(mut self, restrict: bool) -> Self {
        self.restrict_y = restrict;
        self
    }

    pub fn with_update_on_move(mut self, update: bool) -> Self {
        self.update_on_move = update;
        self
    }

    pub fn with_drag_color(mut self, color: Color) -> Self {
        self.drag_color = Some(color);
        self
    }

    pub fn with_selected_style(mut self, style: EmphasisStyle) -> Self {
        self.selected_style = style;
        self
    }

    pub fn with_unselected_style(mut self, style: EmphasisStyle) -> Self {
        self.unselected_style = style;
        self
    }

    pub fn with_hovered_style(mut self, style: EmphasisStyle) -> Self {
        self.hovered_style = style;
        self
    }

    pub fn with_unhovered_style(mut self, style: EmphasisStyle) -> Self {
        self.unhovered_style = style;
        self
    }

    pub fn with_interactions(mut self, mode: InteractionMode) -> Self {
        self.interactions = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MarkConfig::default();
        assert_eq!(config.stroke_width, 2.0);
        assert_eq!(config.colors.len(), 10);
        assert_eq!(config.fill_colors, CATEGORY10.to_vec());
        assert_eq!(config.drag_size(), 320.0);
        assert_eq!(config.interactions, InteractionMode::None);
    }

    #[test]
    fn test_view_padding() {
        let config = MarkConfig::default();
        assert_eq!(config.view_padding(), 1.0);

        let marked = config.with_marker(MarkerShape::Circle);
        // sqrt(64) / 2 + 1
        assert_eq!(marked.view_padding(), 5.0);

        let wide = marked.with_stroke_width(20.0);
        assert_eq!(wide.view_padding(), 10.0);
    }

    #[test]
    fn test_curves_subset() {
        let config = MarkConfig::default();
        assert!(config.is_curve_visible(7));
        let subset = config.with_curves_subset(vec![0, 2]);
        assert!(subset.is_curve_visible(2));
        assert!(!subset.is_curve_visible(1));
    }

    #[test]
    fn test_from_json_partial() {
        let config = MarkConfig::from_json(
            r##"{"fill":"between","marker":"diamond","drag_color":"#ff0000","interactions":"select"}"##,
        )
        .unwrap();
        assert_eq!(config.fill, FillMode::Between);
        assert_eq!(config.marker, Some(MarkerShape::Diamond));
        assert_eq!(config.drag_color, Some(Color::RED));
        assert_eq!(config.interactions, InteractionMode::Select);
        assert_eq!(config.stroke_width, 2.0);
    }

    #[test]
    fn test_from_json_unknown_value() {
        assert!(MarkConfig::from_json(r#"{"line_style":"wavy"}"#).is_err());
    }
}
