//! Headless walkthrough of the curve mark.
//!
//! This example shows:
//! - Binding a model to shared continuous and gradient scales
//! - Attaching a mark once its plot area is known
//! - Selecting curves and dragging a point
//! - Reading host messages and the state delta as JSON
//!
//! Run with `RUST_LOG=multicurve=debug` to see the controller's logging.

use std::sync::Arc;

use multicurve::prelude::*;
use multicurve_core::math::dvec2;

/// Logs every command instead of drawing.
struct LogRenderer;

impl MarkRenderer for LogRenderer {
    fn render(&mut self, scene: &Scene, command: &RenderCommand) {
        tracing::info!(curves = scene.curves.len(), ?command, "render");
    }
}

fn main() -> MarkResult<()> {
    multicurve_core::logging::init();
    #[cfg(feature = "profiling")]
    multicurve_core::profiling::init_profiling(multicurve_core::profiling::DEFAULT_PROFILER_ADDR);

    let x = Arc::new(ContinuousScale::linear((0.0, 400.0)));
    let y = Arc::new(ContinuousScale::linear((300.0, 0.0)));
    let color = Arc::new(GradientColorScale::new(vec![Color::BLUE, Color::RED]));
    let scales = MarkScales::new(x, y).with_color(color);

    let data = RawSeries::from_json(
        r#"{
            "x": [1, 2, 3, 4],
            "y": [[10, 20, 30, 25], [40, 50, null, 45], [5, 5, 5, 5]],
            "color": [0.0, 0.5, 1.0]
        }"#,
    )?;
    let model = CurveModel::new("tasks", data, scales)
        .with_labels(vec!["Design".into(), "Build".into()]);

    let config = MarkConfig::from_json(
        r#"{"interactions": "select", "enable_move": true, "restrict_x": true, "marker": "circle"}"#,
    )?;
    let mut mark = pollster::block_on(CurveMark::attach(
        model,
        config,
        LogRenderer,
        std::future::ready(PlotArea::new(400.0, 300.0)),
    ));

    mark.click(Some(1), Modifiers::empty());
    mark.click(Some(2), Modifiers::CTRL);

    let start = mark
        .model()
        .records()
        .first()
        .and_then(|curve| curve.point(1))
        .map(|p| (p.x, p.y));
    tracing::info!(?start, "dragging the second point of the first curve");

    mark.drag_start(0, 1)?;
    mark.drag_move(dvec2(150.0, 120.0));
    mark.drag_end();
    multicurve_core::profiling::new_frame();

    for message in mark.take_messages() {
        println!("{}", message.to_json()?);
    }
    println!("{}", mark.take_state_delta().to_json()?);
    Ok(())
}
