//! Render-ready geometry derived from the curve records.
//!
//! The [`Scene`] is what a [`MarkRenderer`](crate::render::MarkRenderer)
//! reads. Curves are keyed by their index so renderers can match existing
//! elements across normalization passes.

use multicurve_core::math::{DVec2, dvec2, is_finite_point};
use multicurve_core::profiling::profile_function;

use crate::color::Color;
use crate::config::MarkConfig;
use crate::model::CurveModel;
use crate::record::CurveRecord;
use crate::selection::Selection;
use crate::style::{DashPattern, FillMode, Interpolation, LabelsVisibility, MarkerShape, ResolvedStyle, resolve_style};

/// Size of the plot area the mark draws into, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlotArea {
    pub width: f64,
    pub height: f64,
}

impl PlotArea {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub position: DVec2,
    /// Both the data and the scaled position are finite.
    pub defined: bool,
    pub sub_index: usize,
}

/// Geometry and style of one curve.
#[derive(Debug, Clone, PartialEq)]
pub struct CurveGeometry {
    pub index: usize,
    pub name: String,
    pub points: Vec<PixelPoint>,
    /// Area baseline per point when the fill mode draws an area. NaN entries
    /// leave a gap.
    pub baseline: Option<Vec<f64>>,
    pub style: ResolvedStyle,
    pub visible: bool,
    pub label_visible: bool,
    /// Where the curve label sits: the last defined point.
    pub label_anchor: Option<DVec2>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub index: usize,
    pub name: String,
    pub stroke: Color,
    pub fill: Option<Color>,
    pub opacity: f64,
    pub dash: DashPattern,
    pub marker: Option<MarkerShape>,
    pub visible: bool,
}

/// Borrowed state a scene is derived from.
pub struct SceneInputs<'a> {
    pub model: &'a CurveModel,
    pub config: &'a MarkConfig,
    pub selection: &'a Selection,
    pub hovered: Option<usize>,
    pub plot_area: PlotArea,
}

impl SceneInputs<'_> {
    fn style(&self, record: &CurveRecord) -> ResolvedStyle {
        resolve_style(
            self.config,
            record,
            self.model.scales().color.as_deref(),
            self.selection,
            self.hovered,
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    pub plot_area: PlotArea,
    pub curves: Vec<CurveGeometry>,
    pub legend: Vec<LegendEntry>,
    pub legend_visible: bool,
    pub interpolation: Interpolation,
    pub close_path: bool,
    pub padding: f64,
    /// Pixel positions of the first curve, read by point selectors.
    pub x_pixels: Vec<f64>,
    pub pixel_coords: Vec<DVec2>,
}

impl Scene {
    pub fn curve(&self, index: usize) -> Option<&CurveGeometry> {
        self.curves.get(index)
    }

    /// Match curves to records by index: existing curves are kept, missing
    /// ones created and extra ones dropped. Returns the live keys.
    pub fn reconcile(&mut self, inputs: &SceneInputs<'_>) -> Vec<usize> {
        let records = inputs.model.records();
        self.curves.truncate(records.len());
        for record in &records[self.curves.len()..] {
            self.curves.push(CurveGeometry {
                index: record.index,
                name: record.name.clone(),
                points: Vec::new(),
                baseline: None,
                style: inputs.style(record),
                visible: true,
                label_visible: false,
                label_anchor: None,
            });
        }
        self.legend.truncate(records.len());
        self.curves.iter().map(|c| c.index).collect()
    }

    /// Recompute pixel positions, area baselines and label anchors.
    pub fn layout(&mut self, inputs: &SceneInputs<'_>) {
        profile_function!();

        let scales = inputs.model.scales();
        let (x, y) = (scales.x.as_ref(), scales.y.as_ref());
        let (x_offset, y_offset) = (x.offset(), y.offset());
        let fill = inputs.config.fill;

        self.plot_area = inputs.plot_area;
        self.interpolation = inputs.config.interpolation;
        self.close_path = inputs.config.close_path;

        for (curve, record) in self.curves.iter_mut().zip(inputs.model.records()) {
            curve.points = record
                .values
                .iter()
                .map(|p| {
                    let position = dvec2(x.scale(p.x) + x_offset, y.scale(p.y) + y_offset);
                    PixelPoint {
                        position,
                        defined: p.is_defined() && is_finite_point(position),
                        sub_index: p.sub_index,
                    }
                })
                .collect();

            curve.baseline = match fill {
                FillMode::Bottom => Some(vec![inputs.plot_area.height; record.values.len()]),
                FillMode::Top => Some(vec![0.0; record.values.len()]),
                FillMode::Between => Some(
                    record
                        .values
                        .iter()
                        .map(|p| y.scale(p.y0) + y_offset)
                        .collect(),
                ),
                FillMode::None | FillMode::Inside => None,
            };

            curve.label_anchor = curve
                .points
                .iter()
                .rev()
                .find(|p| p.defined)
                .map(|p| p.position);
        }

        let first = self.curves.first().map(|c| c.points.as_slice()).unwrap_or_default();
        self.pixel_coords = first.iter().map(|p| p.position).collect();
        self.x_pixels = self.pixel_coords.iter().map(|p| p.x).collect();
    }

    /// Re-derive every curve style and the legend from current state.
    pub fn restyle(&mut self, inputs: &SceneInputs<'_>) {
        profile_function!();

        for (curve, record) in self.curves.iter_mut().zip(inputs.model.records()) {
            curve.style = inputs.style(record);
        }
        self.legend = self
            .curves
            .iter()
            .map(|curve| LegendEntry {
                index: curve.index,
                name: curve.name.clone(),
                stroke: curve.style.stroke,
                fill: curve.style.area_fill().or(curve.style.path_fill()),
                opacity: curve.style.opacity,
                dash: curve.style.dash.clone(),
                marker: curve.style.marker,
                visible: inputs.config.is_curve_visible(curve.index),
            })
            .collect();
    }

    /// Apply `curves_subset` and `labels_visibility`.
    pub fn update_visibility(&mut self, config: &MarkConfig) {
        let show_labels = config.labels_visibility == LabelsVisibility::Label;
        for curve in &mut self.curves {
            curve.visible = config.is_curve_visible(curve.index);
            curve.label_visible = show_labels && curve.visible;
        }
        for entry in &mut self.legend {
            entry.visible = config.is_curve_visible(entry.index);
        }
        self.legend_visible = config.labels_visibility == LabelsVisibility::Legend;
    }

    /// Copy record names onto curves and legend entries.
    pub fn rename(&mut self, records: &[CurveRecord]) {
        for (curve, record) in self.curves.iter_mut().zip(records) {
            curve.name.clone_from(&record.name);
        }
        for (entry, record) in self.legend.iter_mut().zip(records) {
            entry.name.clone_from(&record.name);
        }
    }

    pub fn move_point(&mut self, curve: usize, sub_index: usize, pixel: DVec2) {
        if let Some(point) = self
            .curves
            .get_mut(curve)
            .and_then(|c| c.points.get_mut(sub_index))
        {
            point.position = pixel;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CurveModel;
    use crate::scale::{ContinuousScale, MarkScales};
    use crate::series::{RawSeries, XValues};
    use std::sync::Arc;

    fn model() -> CurveModel {
        let x = Arc::new(ContinuousScale::linear((0.0, 100.0)));
        let y = Arc::new(ContinuousScale::linear((100.0, 0.0)));
        let data = RawSeries::new(
            XValues::shared(vec![0.0, 5.0, 10.0]),
            vec![vec![0.0, 5.0, f64::NAN], vec![10.0, 10.0, 10.0]],
        );
        CurveModel::new("scene", data, MarkScales::new(x, y))
    }

    fn build(model: &CurveModel, config: &MarkConfig) -> Scene {
        let selection = Selection::none();
        let inputs = SceneInputs {
            model,
            config,
            selection: &selection,
            hovered: None,
            plot_area: PlotArea::new(100.0, 100.0),
        };
        let mut scene = Scene::default();
        scene.reconcile(&inputs);
        scene.layout(&inputs);
        scene.restyle(&inputs);
        scene.update_visibility(config);
        scene
    }

    #[test]
    fn test_positions_and_defined() {
        let model = model();
        let scene = build(&model, &MarkConfig::default());

        let first = &scene.curves[0];
        assert_eq!(first.points[1].position, dvec2(50.0, 50.0));
        assert!(first.points[1].defined);
        assert!(!first.points[2].defined);
        assert_eq!(first.label_anchor, Some(dvec2(50.0, 50.0)));
        assert_eq!(scene.x_pixels, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_area_baselines() {
        let model = model();
        let bottom = build(&model, &MarkConfig::default().with_fill(FillMode::Bottom));
        assert_eq!(bottom.curves[0].baseline, Some(vec![100.0; 3]));

        let top = build(&model, &MarkConfig::default().with_fill(FillMode::Top));
        assert_eq!(top.curves[0].baseline, Some(vec![0.0; 3]));

        let between = build(&model, &MarkConfig::default().with_fill(FillMode::Between));
        // y0 of curve 0 is curve 1's value (10 -> pixel 0)
        assert_eq!(between.curves[0].baseline, Some(vec![0.0; 3]));

        let inside = build(&model, &MarkConfig::default().with_fill(FillMode::Inside));
        assert_eq!(inside.curves[0].baseline, None);
    }

    #[test]
    fn test_visibility() {
        let model = model();
        let config = MarkConfig::default()
            .with_curves_subset(vec![1])
            .with_labels_visibility(LabelsVisibility::Label);
        let scene = build(&model, &config);

        assert!(!scene.curves[0].visible);
        assert!(!scene.curves[0].label_visible);
        assert!(scene.curves[1].label_visible);
        assert!(!scene.legend_visible);
        assert!(!scene.legend[0].visible);
    }

    #[test]
    fn test_legend_entries() {
        let model = model();
        let config = MarkConfig::default().with_labels_visibility(LabelsVisibility::Legend);
        let scene = build(&model, &config);

        assert!(scene.legend_visible);
        assert_eq!(scene.legend.len(), 2);
        assert_eq!(scene.legend[1].name, "C2");
        assert_eq!(scene.legend[0].fill, None);
    }
}
