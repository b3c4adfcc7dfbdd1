//! Controller tests: hover, reactions to attribute changes and scale
//! notifications, and listener lifetime.

use std::sync::Arc;

use multicurve::prelude::*;
use multicurve::scale::ScaleEvent;
use multicurve::style::EmphasisStyle;
use multicurve_test_utils::{MockAxisScale, MockColorScale, RecordingRenderer};

// ============================================================================
// Fixture
// ============================================================================

struct Fixture {
    mark: CurveMark<RecordingRenderer>,
    renderer: RecordingRenderer,
    x: MockAxisScale,
    color: MockColorScale,
}

fn data() -> RawSeries {
    RawSeries::new(
        XValues::shared(vec![1.0, 2.0, 3.0]),
        vec![vec![10.0, 20.0, 30.0], vec![40.0, 50.0, 60.0], vec![5.0, 5.0, 5.0]],
    )
}

fn fixture(config: MarkConfig) -> Fixture {
    let x = MockAxisScale::new(10.0, 0.0);
    let color = MockColorScale::new();
    let scales = MarkScales::new(Arc::new(x.clone()), Arc::new(MockAxisScale::new(-1.0, 100.0)))
        .with_color(Arc::new(color.clone()));
    let model = CurveModel::new("mark", data(), scales);
    let renderer = RecordingRenderer::new();
    let mark = pollster::block_on(CurveMark::attach(
        model,
        config,
        renderer.clone(),
        std::future::ready(PlotArea::new(200.0, 100.0)),
    ));
    Fixture {
        mark,
        renderer,
        x,
        color,
    }
}

fn immediate_positions(renderer: &RecordingRenderer) -> usize {
    renderer.count(|c| {
        *c == RenderCommand::Positions {
            animation: Animation::Immediate,
        }
    })
}

// ============================================================================
// Attach
// ============================================================================

#[test]
fn test_attach_draws_without_animation() {
    let f = fixture(MarkConfig::default());

    let commands = f.renderer.commands();
    assert_eq!(commands.first(), Some(&RenderCommand::Padding(1.0)));
    assert!(commands.contains(&RenderCommand::Reconcile {
        keys: vec![0, 1, 2],
        animation: Animation::Immediate
    }));
    assert_eq!(f.mark.scene().curves.len(), 3);
    assert_eq!(
        f.mark.scene().curve(1).map(|c| c.points[2].position.x),
        Some(30.0)
    );
}

#[test]
fn test_attach_waits_for_parent() {
    let renderer = RecordingRenderer::new();
    let scales = MarkScales::new(
        Arc::new(MockAxisScale::new(1.0, 0.0)),
        Arc::new(MockAxisScale::new(1.0, 0.0)),
    );
    let model = CurveModel::new("late", data(), scales);
    let parent = async { PlotArea::new(640.0, 480.0) };

    let mark = pollster::block_on(CurveMark::attach(
        model,
        MarkConfig::default(),
        renderer.clone(),
        parent,
    ));

    assert_eq!(mark.scene().plot_area, PlotArea::new(640.0, 480.0));
}

// ============================================================================
// Hover
// ============================================================================

#[test]
fn test_hover_enter_and_leave() {
    let mut f = fixture(MarkConfig::default().with_unhovered_style(EmphasisStyle {
        opacity: Some(0.2),
        ..Default::default()
    }));

    f.mark.pointer_enter(1);
    assert_eq!(f.mark.hovered(), Some(1));
    assert_eq!(f.mark.scene().curve(0).map(|c| c.style.opacity), Some(0.2));
    assert_eq!(f.mark.scene().curve(1).map(|c| c.style.opacity), Some(1.0));

    f.mark.pointer_leave();
    assert_eq!(f.mark.hovered(), None);
    assert_eq!(f.mark.scene().curve(0).map(|c| c.style.opacity), Some(1.0));

    assert_eq!(
        f.mark.take_messages(),
        vec![HostMessage::Hover { curve: Some(1) }]
    );
    assert_eq!(f.mark.take_state_delta().hovered, Some(None));
}

#[test]
fn test_hover_is_independent_of_selection() {
    let mut f = fixture(MarkConfig::default().with_interactions(InteractionMode::Select));

    f.mark.click(Some(2), Modifiers::empty());
    f.mark.pointer_enter(0);
    f.mark.pointer_leave();

    assert_eq!(f.mark.selection(), &Selection::of([2]));
}

#[test]
fn test_legend_events() {
    let mut f = fixture(MarkConfig::default());

    f.mark
        .dispatch(PointerEvent::on_curve(EventName::LegendMouseOver, 2));
    assert_eq!(f.mark.hovered(), Some(2));
    f.mark.dispatch(PointerEvent::new(EventName::LegendMouseOut));
    assert_eq!(f.mark.hovered(), None);

    let status = f
        .mark
        .dispatch(PointerEvent::on_curve(EventName::LegendClicked, 2));
    assert!(!status.is_handled());
    assert_eq!(
        f.mark.take_messages(),
        vec![HostMessage::LegendClick { curve: Some(2) }]
    );
}

// ============================================================================
// Attribute reactions
// ============================================================================

#[test]
fn test_batched_data_change_draws_once() {
    let mut f = fixture(MarkConfig::default());
    f.renderer.clear();

    f.mark.set_many([
        Change::X(XValues::shared(vec![0.0, 1.0])),
        Change::Y(vec![Arc::new(vec![1.0, 2.0])]),
    ]);

    assert_eq!(f.renderer.count_reconciles(), 1);
    assert_eq!(f.mark.scene().curves.len(), 1);
    assert!(f.renderer.commands().contains(&RenderCommand::Reconcile {
        keys: vec![0],
        animation: Animation::Animated
    }));
}

#[test]
fn test_style_change_does_not_relayout() {
    let mut f = fixture(MarkConfig::default());
    f.renderer.clear();

    f.mark.set(Change::Colors(vec![Color::RED]));

    assert_eq!(f.renderer.count_styles(), 1);
    assert_eq!(f.renderer.count_positions(), 0);
    assert_eq!(
        f.mark.scene().curve(2).map(|c| c.style.stroke),
        Some(Color::RED)
    );
}

#[test]
fn test_view_padding_published_on_change() {
    let mut f = fixture(MarkConfig::default());
    f.renderer.clear();

    f.mark.set(Change::Marker(Some(MarkerShape::Circle)));
    f.mark.set(Change::MarkerSize(64.0));
    f.mark.set(Change::StrokeWidth(20.0));

    let padding: Vec<_> = f
        .renderer
        .commands()
        .into_iter()
        .filter(|c| matches!(c, RenderCommand::Padding(_)))
        .collect();
    assert_eq!(
        padding,
        vec![RenderCommand::Padding(5.0), RenderCommand::Padding(10.0)]
    );
}

#[test]
fn test_labels_change_renames_without_reconcile() {
    let mut f = fixture(MarkConfig::default().with_labels_visibility(LabelsVisibility::Legend));
    f.renderer.clear();

    f.mark.set(Change::Labels(vec!["Build".into()]));

    assert_eq!(f.renderer.count_reconciles(), 0);
    assert!(f.renderer.commands().contains(&RenderCommand::Labels));
    assert_eq!(f.mark.scene().legend[0].name, "Build");
    assert_eq!(f.mark.scene().curve(1).map(|c| c.name.as_str()), Some("C2"));
    assert!(f.mark.scene().legend_visible);
}

#[test]
fn test_curves_subset_visibility() {
    let mut f = fixture(MarkConfig::default());

    f.mark.set(Change::CurvesSubset(vec![0, 2]));

    let visible: Vec<bool> = f.mark.scene().curves.iter().map(|c| c.visible).collect();
    assert_eq!(visible, vec![true, false, true]);
}

#[test]
fn test_host_updates() {
    let mut f = fixture(MarkConfig::default());

    f.mark
        .set_from_host("y", serde_json::json!([[1, 2, 3]]))
        .unwrap();
    assert_eq!(f.mark.model().curve_count(), 1);

    f.mark
        .set_from_host("hovered_point", serde_json::json!(0))
        .unwrap();
    assert_eq!(f.mark.hovered(), Some(0));

    assert!(matches!(
        f.mark.set_from_host("brush_x", serde_json::json!(true)),
        Err(MarkError::UnknownAttributeValue { .. })
    ));
    assert!(matches!(
        f.mark.set_from_host("fill", serde_json::json!("sideways")),
        Err(MarkError::Decode(_))
    ));
}

#[test]
fn test_resize_relayouts() {
    let mut f = fixture(MarkConfig::default().with_fill(FillMode::Bottom));
    f.renderer.clear();

    f.mark.resize(PlotArea::new(200.0, 300.0));
    f.mark.resize(PlotArea::new(200.0, 300.0));

    assert_eq!(immediate_positions(&f.renderer), 1);
    let baseline = f.mark.scene().curve(0).and_then(|c| c.baseline.clone());
    assert_eq!(baseline, Some(vec![300.0; 3]));
}

// ============================================================================
// Scale notifications
// ============================================================================

#[test]
fn test_scale_change_relayouts_immediately() {
    let mut f = fixture(MarkConfig::default());
    f.renderer.clear();

    f.x.emit(ScaleEvent::DomainChanged);
    assert_eq!(f.renderer.commands(), vec![]);
    f.mark.poll();

    assert_eq!(immediate_positions(&f.renderer), 1);
    assert_eq!(f.renderer.count_reconciles(), 0);
}

#[test]
fn test_color_scale_change_restyles() {
    let mut f = fixture(MarkConfig::default());
    f.renderer.clear();

    f.color.emit(ScaleEvent::RangeChanged);
    f.mark.poll();

    assert_eq!(f.renderer.commands(), vec![RenderCommand::Styles]);
}

#[test]
fn test_normalize_suppresses_scale_relayout() {
    let x = Arc::new(ContinuousScale::linear((0.0, 100.0)));
    let y = Arc::new(ContinuousScale::linear((100.0, 0.0)));
    let model = CurveModel::new("live", data(), MarkScales::new(x.clone(), y.clone()));
    let renderer = RecordingRenderer::new();
    let mut mark = pollster::block_on(CurveMark::attach(
        model,
        MarkConfig::default(),
        renderer.clone(),
        std::future::ready(PlotArea::new(100.0, 100.0)),
    ));
    renderer.clear();

    mark.set(Change::Y(vec![Arc::new(vec![0.0, 500.0, 1000.0])]));
    assert_eq!(y.domain(), (0.0, 1000.0));
    assert_eq!(immediate_positions(&renderer), 0);

    // withdrawing a contribution happens outside normalization
    mark.set(Change::PreserveDomain(PreserveDomain {
        y: true,
        ..Default::default()
    }));
    assert_eq!(y.domain(), (0.0, 1.0));
    assert_eq!(immediate_positions(&renderer), 1);
    assert_eq!(renderer.count_reconciles(), 1);
}

#[test]
fn test_offset_change_relayouts() {
    let x = Arc::new(ContinuousScale::linear((0.0, 100.0)));
    let y = Arc::new(ContinuousScale::linear((100.0, 0.0)));
    let model = CurveModel::new("shifted", data(), MarkScales::new(x.clone(), y));
    let renderer = RecordingRenderer::new();
    let mut mark = pollster::block_on(CurveMark::attach(
        model,
        MarkConfig::default(),
        renderer.clone(),
        std::future::ready(PlotArea::new(100.0, 100.0)),
    ));
    assert_eq!(mark.scene().x_pixels, vec![0.0, 50.0, 100.0]);
    renderer.clear();

    x.set_offset(10.0);
    mark.poll();

    assert_eq!(immediate_positions(&renderer), 1);
    assert_eq!(mark.scene().x_pixels, vec![10.0, 60.0, 110.0]);
}

#[test]
fn test_drop_unsubscribes() {
    let f = fixture(MarkConfig::default());
    assert_eq!(f.x.listener_count(), 1);

    let x = f.x.clone();
    drop(f);

    assert_eq!(x.listener_count(), 0);
}
