//! Drag protocol tests: message ordering, restriction flags and
//! copy-on-write writes into the raw arrays.

use std::sync::Arc;

use multicurve::notify::DataPoint;
use multicurve::prelude::*;
use multicurve_core::math::dvec2;
use multicurve_test_utils::{MockAxisScale, RecordingRenderer};

// ============================================================================
// Fixture
// ============================================================================

struct Fixture {
    mark: CurveMark<RecordingRenderer>,
    renderer: RecordingRenderer,
}

/// Two broadcast curves; x maps to `10x` pixels, y to `500 - 10y`.
fn fixture(config: MarkConfig) -> Fixture {
    let x = MockAxisScale::new(10.0, 0.0);
    let y = MockAxisScale::new(-10.0, 500.0);
    let scales = MarkScales::new(Arc::new(x), Arc::new(y));
    let data = RawSeries::new(
        XValues::shared(vec![1.0, 2.0, 3.0]),
        vec![vec![10.0, 20.0, 30.0], vec![40.0, 50.0, 60.0]],
    );
    let model = CurveModel::new("gantt", data, scales);
    let renderer = RecordingRenderer::new();
    let mark = pollster::block_on(CurveMark::attach(
        model,
        config,
        renderer.clone(),
        std::future::ready(PlotArea::new(400.0, 500.0)),
    ));
    Fixture { mark, renderer }
}

fn movable() -> MarkConfig {
    MarkConfig::default().with_enable_move(true)
}

fn point(x: f64, y: f64) -> DataPoint {
    DataPoint { x, y }
}

fn y_column(mark: &CurveMark<RecordingRenderer>, curve: usize) -> Vec<f64> {
    mark.model().data().y[curve].as_ref().clone()
}

fn x_column(mark: &CurveMark<RecordingRenderer>) -> Vec<f64> {
    mark.model().data().x.series(0).map(|c| c.as_ref().clone()).unwrap_or_default()
}

// ============================================================================
// Protocol
// ============================================================================

#[test]
fn test_messages_in_gesture_order() {
    let mut f = fixture(movable());

    assert!(f.mark.drag_start(1, 1).unwrap().is_consumed());
    f.mark.drag_move(dvec2(25.0, 50.0));
    f.mark.drag_move(dvec2(30.0, 100.0));
    f.mark.drag_end();

    assert_eq!(
        f.mark.take_messages(),
        vec![
            HostMessage::DragStart {
                point: point(2.0, 50.0),
                index: 1,
                curve: 1
            },
            HostMessage::Drag {
                origin: point(2.0, 50.0),
                point: point(2.5, 45.0),
                index: 1,
                curve: 1
            },
            HostMessage::Drag {
                origin: point(2.0, 50.0),
                point: point(3.0, 40.0),
                index: 1,
                curve: 1
            },
            HostMessage::DragEnd {
                point: point(3.0, 40.0),
                index: 1,
                curve: 1
            },
        ]
    );
    assert!(!f.mark.is_dragging());
}

#[test]
fn test_end_commits_without_live_update() {
    let mut f = fixture(movable());

    f.mark.drag_start(1, 1).unwrap();
    f.mark.drag_move(dvec2(30.0, 100.0));
    assert_eq!(y_column(&f.mark, 1), vec![40.0, 50.0, 60.0]);

    f.mark.drag_end();
    assert_eq!(y_column(&f.mark, 1), vec![40.0, 40.0, 60.0]);
    assert_eq!(x_column(&f.mark), vec![1.0, 3.0, 3.0]);

    // shared x moves the point for every curve
    assert_eq!(f.mark.model().records()[0].values[1].x, 3.0);
    assert_eq!(f.mark.model().records()[1].values[1].y, 40.0);
}

#[test]
fn test_live_update_writes_on_move() {
    let mut f = fixture(movable().with_update_on_move(true));

    f.mark.drag_start(0, 2).unwrap();
    f.mark.drag_move(dvec2(30.0, 250.0));

    assert_eq!(y_column(&f.mark, 0), vec![10.0, 20.0, 25.0]);
    f.mark.drag_end();
    assert_eq!(y_column(&f.mark, 0), vec![10.0, 20.0, 25.0]);
}

#[test]
fn test_write_is_copy_on_write() {
    let mut f = fixture(movable());
    let before_edited = Arc::clone(&f.mark.model().data().y[1]);
    let before_other = Arc::clone(&f.mark.model().data().y[0]);

    f.mark.drag_start(1, 0).unwrap();
    f.mark.drag_move(dvec2(10.0, 0.0));
    f.mark.drag_end();

    let after = &f.mark.model().data().y;
    assert_eq!(*before_edited, vec![40.0, 50.0, 60.0]);
    assert_eq!(*after[1], vec![50.0, 50.0, 60.0]);
    assert!(!Arc::ptr_eq(&before_edited, &after[1]));
    assert!(Arc::ptr_eq(&before_other, &after[0]));
}

#[test]
fn test_state_delta_after_drag() {
    let mut f = fixture(movable());

    f.mark.drag_start(1, 1).unwrap();
    f.mark.drag_move(dvec2(30.0, 100.0));
    f.mark.drag_end();

    let delta = f.mark.take_state_delta();
    assert!(delta.x.is_some());
    assert_eq!(delta.y.as_ref().map(|y| y[1][1]), Some(40.0));
    assert!(f.mark.take_state_delta().is_empty());
}

// ============================================================================
// Restrictions
// ============================================================================

#[test]
fn test_restrict_x_moves_horizontally_only() {
    let mut f = fixture(movable().with_restrict_x(true));

    f.mark.drag_start(1, 1).unwrap();
    f.mark.drag_move(dvec2(30.0, 100.0));
    f.mark.drag_end();

    assert_eq!(x_column(&f.mark), vec![1.0, 3.0, 3.0]);
    assert_eq!(y_column(&f.mark, 1), vec![40.0, 50.0, 60.0]);
    let delta = f.mark.take_state_delta();
    assert!(delta.x.is_some());
    assert!(delta.y.is_none());
}

#[test]
fn test_restrict_y_moves_vertically_only() {
    let mut f = fixture(movable().with_restrict_y(true));

    f.mark.drag_start(1, 1).unwrap();
    f.mark.drag_move(dvec2(30.0, 100.0));
    f.mark.drag_end();

    assert_eq!(x_column(&f.mark), vec![1.0, 2.0, 3.0]);
    assert_eq!(y_column(&f.mark, 1), vec![40.0, 40.0, 60.0]);
}

#[test]
fn test_both_restrictions_freeze_the_point() {
    let mut f = fixture(
        movable()
            .with_restrict_x(true)
            .with_restrict_y(true)
            .with_update_on_move(true),
    );

    f.mark.drag_start(1, 1).unwrap();
    assert!(!f.mark.drag_move(dvec2(30.0, 100.0)).is_consumed());
    f.mark.drag_end();

    assert_eq!(
        f.mark.take_messages(),
        vec![
            HostMessage::DragStart {
                point: point(2.0, 50.0),
                index: 1,
                curve: 1
            },
            HostMessage::DragEnd {
                point: point(2.0, 50.0),
                index: 1,
                curve: 1
            },
        ]
    );
    assert_eq!(y_column(&f.mark, 1), vec![40.0, 50.0, 60.0]);
}

#[test]
fn test_restrictions_are_read_on_every_move() {
    let mut f = fixture(movable().with_update_on_move(true));

    f.mark.drag_start(1, 1).unwrap();
    f.mark.set(Change::RestrictX(true));
    f.mark.drag_move(dvec2(30.0, 100.0));

    assert_eq!(y_column(&f.mark, 1), vec![40.0, 50.0, 60.0]);
    assert_eq!(x_column(&f.mark), vec![1.0, 3.0, 3.0]);

    f.mark.set(Change::RestrictX(false));
    f.mark.drag_move(dvec2(30.0, 200.0));
    assert_eq!(y_column(&f.mark, 1), vec![40.0, 30.0, 60.0]);
    f.mark.drag_end();
}

// ============================================================================
// Gating and errors
// ============================================================================

#[test]
fn test_drag_requires_enable_move() {
    let mut f = fixture(MarkConfig::default());

    let status = f.mark.drag_start(0, 0).unwrap();

    assert!(!status.is_handled());
    assert!(!f.mark.is_dragging());
    assert!(f.mark.take_messages().is_empty());
    assert!(!f.mark.drag_end().is_handled());
}

#[test]
fn test_drag_start_out_of_range() {
    let mut f = fixture(movable());

    assert_eq!(
        f.mark.drag_start(5, 0),
        Err(MarkError::CurveOutOfRange { curve: 5, curves: 2 })
    );
    assert_eq!(
        f.mark.drag_start(0, 9),
        Err(MarkError::PointOutOfRange {
            curve: 0,
            point: 9,
            points: 3
        })
    );
    assert!(!f.mark.is_dragging());
}

#[test]
fn test_mode_change_mid_drag_completes_gesture() {
    let mut f = fixture(movable());

    f.mark.drag_start(1, 1).unwrap();
    f.mark.set_many([
        Change::Interactions(InteractionMode::Select),
        Change::EnableMove(false),
    ]);
    f.mark.drag_move(dvec2(30.0, 100.0));
    f.mark.drag_end();

    assert_eq!(y_column(&f.mark, 1), vec![40.0, 40.0, 60.0]);
    assert!(matches!(
        f.mark.take_messages().last(),
        Some(HostMessage::DragEnd { .. })
    ));
}

#[test]
fn test_drag_emphasis_commands() {
    let mut f = fixture(movable().with_drag_color(Color::RED));
    f.renderer.clear();

    f.mark.drag_start(1, 1).unwrap();
    f.mark.drag_move(dvec2(30.0, 100.0));
    f.mark.drag_end();

    let commands = f.renderer.commands();
    assert_eq!(
        commands.first(),
        Some(&RenderCommand::DragEmphasis {
            curve: 1,
            sub_index: 1,
            size: 320.0,
            color: Some(Color::RED)
        })
    );
    assert!(commands.contains(&RenderCommand::PointMoved {
        curve: 1,
        sub_index: 1,
        pixel: dvec2(30.0, 100.0)
    }));
    assert!(commands.contains(&RenderCommand::DragReleased {
        curve: 1,
        sub_index: 1
    }));
}

// ============================================================================
// Live scales
// ============================================================================

/// One curve on continuous scales whose domains follow the data.
fn live_mark(x: &Arc<ContinuousScale>, y: &Arc<ContinuousScale>) -> CurveMark<RecordingRenderer> {
    let data = RawSeries::new(
        XValues::shared(vec![0.0, 5.0, 10.0]),
        vec![vec![0.0, 50.0, 100.0]],
    );
    let model = CurveModel::new("live", data, MarkScales::new(x.clone(), y.clone()));
    pollster::block_on(CurveMark::attach(
        model,
        movable(),
        RecordingRenderer::new(),
        std::future::ready(PlotArea::new(100.0, 100.0)),
    ))
}

#[test]
fn test_drag_end_reports_the_committed_point() {
    let x = Arc::new(ContinuousScale::linear((0.0, 100.0)));
    let y = Arc::new(ContinuousScale::linear((100.0, 0.0)));
    let mut mark = live_mark(&x, &y);

    mark.drag_start(0, 2).unwrap();
    mark.drag_move(dvec2(150.0, 0.0));
    mark.drag_end();

    assert_eq!(x_column(&mark), vec![0.0, 5.0, 15.0]);
    // the commit widened the domain after the point was computed
    assert_eq!(x.domain(), (0.0, 15.0));
    assert_eq!(
        mark.take_messages().last(),
        Some(&HostMessage::DragEnd {
            point: point(15.0, 100.0),
            index: 2,
            curve: 0
        })
    );
}

#[test]
fn test_drag_without_movement_keeps_value_under_offset() {
    let x = Arc::new(ContinuousScale::linear((0.0, 100.0)));
    let y = Arc::new(ContinuousScale::linear((100.0, 0.0)));
    x.set_offset(5.0);
    let mut mark = live_mark(&x, &y);

    mark.drag_start(0, 2).unwrap();
    mark.drag_end();

    assert_eq!(x_column(&mark), vec![0.0, 5.0, 10.0]);
    assert_eq!(
        mark.take_messages().last(),
        Some(&HostMessage::DragEnd {
            point: point(10.0, 100.0),
            index: 2,
            curve: 0
        })
    );
}
