//! The interaction controller.
//!
//! [`CurveMark`] owns selection, hover and the transient drag session. It
//! reads curve records from its [`CurveModel`], keeps a [`Scene`] current for
//! its renderer, and writes drag edits back into the model's raw arrays.
//!
//! Everything runs to completion on the caller's thread. Scale notifications
//! are queued by listeners and applied on the next [`CurveMark::poll`] (or at
//! the end of any mutating call).

use std::future::Future;
use std::sync::Arc;

use multicurve_core::math::DVec2;
use multicurve_core::profiling::profile_function;
use parking_lot::Mutex;

use crate::config::MarkConfig;
use crate::drag::{self, DragSession};
use crate::error::{MarkError, MarkResult};
use crate::input::{HandleStatus, Modifiers};
use crate::interaction::{EventName, Handler, HandlerSet, PointerEvent};
use crate::model::{CurveModel, ModelEvent};
use crate::notify::{Change, DataPoint, Field, HostMessage, ReactionSet, StateDelta, reactions_for};
use crate::render::{Animation, MarkRenderer, RenderCommand};
use crate::scale::{AxisScale, ColorScale, ScaleEvent, SubscriptionId};
use crate::scene::{PlotArea, Scene, SceneInputs};
use crate::selection::{self, Selection};

enum Subscription {
    Axis(Arc<dyn AxisScale>, SubscriptionId),
    Color(Arc<dyn ColorScale>, SubscriptionId),
}

/// Interactive multi-curve mark.
pub struct CurveMark<R: MarkRenderer> {
    model: CurveModel,
    config: MarkConfig,
    renderer: R,
    scene: Scene,
    plot_area: PlotArea,
    selection: Selection,
    hovered: Option<usize>,
    handlers: HandlerSet,
    drag: Option<DragSession>,
    padding: Option<f64>,
    messages: Vec<HostMessage>,
    delta: StateDelta,
    pending: Arc<Mutex<ReactionSet>>,
    subscriptions: Vec<Subscription>,
}

macro_rules! scene_inputs {
    ($mark:expr) => {
        SceneInputs {
            model: &$mark.model,
            config: &$mark.config,
            selection: &$mark.selection,
            hovered: $mark.hovered,
            plot_area: $mark.plot_area,
        }
    };
}

impl<R: MarkRenderer> CurveMark<R> {
    /// Attach a mark once its parent plot area is available.
    ///
    /// Binds the interaction handlers, subscribes to the model's scales,
    /// publishes the view padding and draws without animation.
    pub async fn attach<F>(model: CurveModel, config: MarkConfig, renderer: R, parent: F) -> Self
    where
        F: Future<Output = PlotArea>,
    {
        let plot_area = parent.await;

        let mut mark = Self {
            model,
            config,
            renderer,
            scene: Scene::default(),
            plot_area,
            selection: Selection::none(),
            hovered: None,
            handlers: HandlerSet::default(),
            drag: None,
            padding: None,
            messages: Vec::new(),
            delta: StateDelta::default(),
            pending: Arc::new(Mutex::new(ReactionSet::empty())),
            subscriptions: Vec::new(),
        };

        // The initial normalization is covered by the draw below.
        mark.model.take_events();

        mark.process_interactions();
        mark.create_listeners();
        mark.compute_view_padding();
        mark.draw(Animation::Immediate);

        tracing::debug!(
            model = %mark.model.id(),
            curves = mark.model.curve_count(),
            "curve mark attached"
        );
        mark
    }

    pub fn model(&self) -> &CurveModel {
        &self.model
    }

    pub fn config(&self) -> &MarkConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn drag_session(&self) -> Option<&DragSession> {
        self.drag.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Messages for the host, oldest first.
    pub fn take_messages(&mut self) -> Vec<HostMessage> {
        std::mem::take(&mut self.messages)
    }

    /// Attributes written by the mark since the last call.
    pub fn take_state_delta(&mut self) -> StateDelta {
        std::mem::take(&mut self.delta)
    }

    /// Apply one attribute change.
    pub fn set(&mut self, change: Change) {
        self.set_many([change]);
    }

    /// Apply a batch of changes, then run each triggered reaction once.
    pub fn set_many(&mut self, changes: impl IntoIterator<Item = Change>) {
        profile_function!();

        let mut reactions = ReactionSet::empty();
        for change in changes {
            reactions |= reactions_for(change.field());
            self.stage(change);
        }

        self.model.react(reactions & ReactionSet::MODEL);
        self.run_view_reactions(reactions.view(), Animation::Animated);
        self.poll();
    }

    /// Decode and apply an attribute update from the host.
    pub fn set_from_host(&mut self, name: &str, value: serde_json::Value) -> MarkResult<()> {
        match Change::decode(name, value) {
            Ok(change) => {
                self.set(change);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(attribute = name, error = %err, "ignoring host update");
                Err(err)
            }
        }
    }

    fn stage(&mut self, change: Change) {
        match change {
            Change::X(x) => {
                let mut data = self.model.data().clone();
                data.x = x;
                self.model.stage_data(data);
            }
            Change::Y(y) => {
                let mut data = self.model.data().clone();
                data.y = y;
                self.model.stage_data(data);
            }
            Change::Color(color) => {
                let mut data = self.model.data().clone();
                data.color = color;
                self.model.stage_data(data);
            }
            Change::Labels(labels) => self.model.stage_labels(labels),
            Change::PreserveDomain(preserve) => self.model.stage_preserve_domain(preserve),
            Change::Colors(colors) => self.config.colors = colors,
            Change::FillColors(colors) => self.config.fill_colors = colors,
            Change::StrokeWidth(width) => self.config.stroke_width = width,
            Change::Opacities(opacities) => self.config.opacities = opacities,
            Change::FillOpacities(opacities) => self.config.fill_opacities = opacities,
            Change::Fill(fill) => self.config.fill = fill,
            Change::LineStyle(style) => self.config.line_style = style,
            Change::Marker(marker) => self.config.marker = marker,
            Change::MarkerSize(size) => self.config.marker_size = size,
            Change::Interpolation(interpolation) => self.config.interpolation = interpolation,
            Change::ClosePath(close) => self.config.close_path = close,
            Change::LabelsVisibility(visibility) => self.config.labels_visibility = visibility,
            Change::CurvesSubset(subset) => self.config.curves_subset = subset,
            Change::Selected(selection) => self.selection = selection,
            Change::Hovered(hovered) => self.hovered = hovered,
            Change::SelectedStyle(style) => self.config.selected_style = style,
            Change::UnselectedStyle(style) => self.config.unselected_style = style,
            Change::HoveredStyle(style) => self.config.hovered_style = style,
            Change::UnhoveredStyle(style) => self.config.unhovered_style = style,
            Change::Interactions(mode) => self.config.interactions = mode,
            Change::EnableMove(enable) => self.config.enable_move = enable,
            Change::RestrictX(restrict) => self.config.restrict_x = restrict,
            Change::RestrictY(restrict) => self.config.restrict_y = restrict,
            Change::UpdateOnMove(update) => self.config.update_on_move = update,
            Change::DragColor(color) => self.config.drag_color = color,
        }
    }

    /// Run view reactions plus whatever the model's pending events imply.
    fn run_view_reactions(&mut self, reactions: ReactionSet, animation: Animation) {
        let mut reactions = reactions;
        for event in self.model.take_events() {
            match event {
                ModelEvent::DataUpdated => reactions |= ReactionSet::DRAW,
                ModelEvent::LabelsUpdated => reactions |= ReactionSet::UPDATE_LABEL_TEXT,
            }
        }

        let reactions = reactions.collapsed();
        if reactions.contains(ReactionSet::PROCESS_INTERACTIONS) {
            self.process_interactions();
        }
        if reactions.contains(ReactionSet::DRAW) {
            self.draw(Animation::Animated);
        }
        if reactions.contains(ReactionSet::RELAYOUT) {
            self.relayout(animation);
        }
        if reactions.contains(ReactionSet::UPDATE_STYLE) {
            self.update_style();
        }
        if reactions.contains(ReactionSet::UPDATE_VISIBILITY) {
            self.update_visibility();
        }
        if reactions.contains(ReactionSet::UPDATE_LABEL_TEXT) {
            self.update_label_text();
        }
        if reactions.contains(ReactionSet::UPDATE_PADDING) {
            self.compute_view_padding();
        }
    }

    /// Apply queued scale notifications.
    pub fn poll(&mut self) {
        let pending = std::mem::take(&mut *self.pending.lock());
        if !pending.is_empty() {
            tracing::trace!(?pending, "applying scale notifications");
            self.run_view_reactions(pending, Animation::Immediate);
        }
    }

    /// Resize the plot area and lay out again.
    pub fn resize(&mut self, plot_area: PlotArea) {
        if self.plot_area != plot_area {
            self.plot_area = plot_area;
            self.relayout(Animation::Immediate);
        }
    }

    fn create_listeners(&mut self) {
        let scales = self.model.scales().clone();

        for axis in [scales.x, scales.y] {
            let pending = Arc::clone(&self.pending);
            let dirty = self.model.dirty_flag();
            let id = axis.subscribe(Arc::new(move |_event: ScaleEvent| {
                // Positions are redrawn once normalization completes.
                if !dirty.is_set() {
                    *pending.lock() |= ReactionSet::RELAYOUT;
                }
            }));
            self.subscriptions.push(Subscription::Axis(axis, id));
        }

        if let Some(color) = scales.color {
            let pending = Arc::clone(&self.pending);
            let id = color.subscribe(Arc::new(move |_event: ScaleEvent| {
                *pending.lock() |= ReactionSet::UPDATE_STYLE;
            }));
            self.subscriptions.push(Subscription::Color(color, id));
        }
    }

    fn process_interactions(&mut self) {
        let mode = self.config.interactions;
        if self.handlers.mode() != mode {
            tracing::debug!(%mode, "interaction mode changed");
        }
        self.handlers = HandlerSet::for_mode(mode);
    }

    fn compute_view_padding(&mut self) {
        let padding = self.config.view_padding();
        if self.padding != Some(padding) {
            self.padding = Some(padding);
            self.scene.padding = padding;
            self.renderer.render(&self.scene, &RenderCommand::Padding(padding));
        }
    }

    fn draw(&mut self, animation: Animation) {
        profile_function!();

        let keys = self.scene.reconcile(&scene_inputs!(self));
        self.renderer
            .render(&self.scene, &RenderCommand::Reconcile { keys, animation });

        self.relayout(animation);
        self.update_style();
        self.update_visibility();
        self.update_label_text();
    }

    fn relayout(&mut self, animation: Animation) {
        self.scene.layout(&scene_inputs!(self));
        self.renderer
            .render(&self.scene, &RenderCommand::Positions { animation });
    }

    fn update_style(&mut self) {
        self.scene.restyle(&scene_inputs!(self));
        self.renderer.render(&self.scene, &RenderCommand::Styles);
    }

    fn update_visibility(&mut self) {
        self.scene.update_visibility(&self.config);
        self.renderer.render(&self.scene, &RenderCommand::Visibility);
    }

    fn update_label_text(&mut self) {
        self.scene.rename(self.model.records());
        self.renderer.render(&self.scene, &RenderCommand::Labels);
    }

    /// Route a pointer event through the active handler set and forward the
    /// matching message to the host.
    pub fn dispatch(&mut self, event: PointerEvent) -> HandleStatus {
        profile_function!();

        let status = match self.handlers.get(event.name) {
            Handler::Noop => HandleStatus::ignored(),
            Handler::Hover => match event.curve {
                Some(curve) => self.set_hovered(Some(curve)),
                None => HandleStatus::ignored(),
            },
            Handler::Unhover => self.set_hovered(None),
            Handler::SelectCurve => match event.curve {
                Some(curve) => self.select_curve(curve, event.modifiers),
                None => HandleStatus::ignored(),
            },
            Handler::ClearSelection => self.clear_selection(),
        };

        let message = match event.name {
            EventName::MouseOver => Some(HostMessage::Hover { curve: event.curve }),
            EventName::LegendClicked => Some(HostMessage::LegendClick { curve: event.curve }),
            EventName::ElementClicked => Some(HostMessage::ElementClick { curve: event.curve }),
            EventName::ParentClicked => Some(HostMessage::BackgroundClick),
            EventName::MouseMove
            | EventName::MouseOut
            | EventName::LegendMouseOver
            | EventName::LegendMouseOut => None,
        };
        if let Some(message) = message {
            self.messages.push(message);
        }

        tracing::trace!(
            event = %event.name,
            message = ?event.name.message_name(),
            ?status,
            "dispatched pointer event"
        );
        self.poll();
        status
    }

    /// A click on a curve (`Some`) or the background (`None`).
    ///
    /// A click on a curve never reaches the background handler, whether or
    /// not the active mode handles it.
    pub fn click(&mut self, curve: Option<usize>, modifiers: Modifiers) -> HandleStatus {
        match curve {
            Some(curve) => self.dispatch(
                PointerEvent::on_curve(EventName::ElementClicked, curve).with_modifiers(modifiers),
            ),
            None => self.dispatch(PointerEvent::new(EventName::ParentClicked)),
        }
    }

    pub fn pointer_enter(&mut self, curve: usize) -> HandleStatus {
        self.dispatch(PointerEvent::on_curve(EventName::MouseOver, curve))
    }

    pub fn pointer_leave(&mut self) -> HandleStatus {
        self.dispatch(PointerEvent::new(EventName::MouseOut))
    }

    fn select_curve(&mut self, curve: usize, modifiers: Modifiers) -> HandleStatus {
        if curve >= self.model.curve_count() {
            tracing::warn!(curve, curves = self.model.curve_count(), "click on unknown curve");
            return HandleStatus::ignored();
        }

        self.selection = self
            .selection
            .apply_click(curve as u32, modifiers.is_accelerator());
        self.delta.selected = Some(self.selection.clone());
        tracing::debug!(selection = ?self.selection.indices(), "selection changed");

        self.update_style();
        HandleStatus::consumed() | HandleStatus::PREVENT_DEFAULT
    }

    fn clear_selection(&mut self) -> HandleStatus {
        if !self.selection.is_none() {
            self.selection = Selection::none();
            self.delta.selected = Some(Selection::none());
            tracing::debug!("selection cleared");
            self.update_style();
        }
        HandleStatus::handled()
    }

    /// Select the points of the first curve whose pixel position passes
    /// `selector`. `None` means the selector has no extent and clears the
    /// selection.
    ///
    /// Point indices share `selected` with curve clicks.
    pub fn selector_changed(&mut self, selector: Option<&dyn Fn(DVec2) -> bool>) {
        let selection = match selector {
            Some(selector) => Selection::of(
                self.scene
                    .pixel_coords
                    .iter()
                    .enumerate()
                    .filter(|(_, pixel)| selector(**pixel))
                    .map(|(index, _)| index as u32),
            ),
            None => Selection::none(),
        };
        self.write_selection(selection);
    }

    /// Select the first-curve point nearest to the right of `pixel` along x,
    /// clamped to the last point. `None` clears the selection.
    pub fn invert_point(&mut self, pixel: Option<f64>) {
        let selection = match pixel {
            Some(pixel) => {
                Selection::of([selection::nearest_index(&self.scene.x_pixels, pixel) as u32])
            }
            None => Selection::none(),
        };
        self.write_selection(selection);
    }

    /// First and last point indices covered by a brush over `extent` in x
    /// data space, for the brush's own `selected` attribute.
    pub fn multi_range_indices(&self, extent: (f64, f64)) -> [usize; 2] {
        let xs = self
            .model
            .data()
            .x
            .series(0)
            .map(|column| column.as_slice())
            .unwrap_or_default();
        [
            selection::bisect_left(xs, extent.0),
            selection::nearest_index(xs, extent.1),
        ]
    }

    fn write_selection(&mut self, selection: Selection) {
        tracing::debug!(selection = ?selection.indices(), "selector updated selection");
        self.selection = selection;
        self.delta.selected = Some(self.selection.clone());
        self.update_style();
    }

    fn set_hovered(&mut self, hovered: Option<usize>) -> HandleStatus {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.delta.hovered = Some(hovered);
            self.update_style();
        }
        HandleStatus::handled()
    }

    /// Begin dragging point `sub_index` of `curve`. Ignored unless
    /// `enable_move` is set or while another drag is in flight.
    pub fn drag_start(&mut self, curve: usize, sub_index: usize) -> MarkResult<HandleStatus> {
        if !self.config.enable_move || self.drag.is_some() {
            return Ok(HandleStatus::ignored());
        }

        let records = self.model.records();
        let record = records.get(curve).ok_or(MarkError::CurveOutOfRange {
            curve,
            curves: records.len(),
        })?;
        let point = record.point(sub_index).ok_or(MarkError::PointOutOfRange {
            curve,
            point: sub_index,
            points: record.values.len(),
        })?;

        let scales = self.model.scales();
        let session = DragSession::start(curve, point, scales.x.as_ref(), scales.y.as_ref());

        self.renderer.render(
            &self.scene,
            &RenderCommand::DragEmphasis {
                curve,
                sub_index,
                size: self.config.drag_size(),
                color: self.config.drag_color,
            },
        );
        self.messages.push(HostMessage::DragStart {
            point: session.origin,
            index: sub_index,
            curve,
        });
        tracing::debug!(curve, sub_index, "drag started");

        self.drag = Some(session);
        Ok(HandleStatus::consumed())
    }

    /// Move the dragged point toward `pointer` (pixels).
    pub fn drag_move(&mut self, pointer: DVec2) -> HandleStatus {
        let Some(mut session) = self.drag else {
            return HandleStatus::ignored();
        };
        if !session.follow(pointer, self.config.restrict_x, self.config.restrict_y) {
            return HandleStatus::handled();
        }
        self.drag = Some(session);

        self.scene
            .move_point(session.curve, session.sub_index, session.pixel);
        self.renderer.render(
            &self.scene,
            &RenderCommand::PointMoved {
                curve: session.curve,
                sub_index: session.sub_index,
                pixel: session.pixel,
            },
        );

        let scales = self.model.scales();
        let point = session.data_point(scales.x.as_ref(), scales.y.as_ref());
        self.messages.push(HostMessage::Drag {
            origin: session.origin,
            point,
            index: session.sub_index,
            curve: session.curve,
        });
        tracing::trace!(?point, "drag moved");

        if self.config.update_on_move {
            self.write_back(&session);
        }
        HandleStatus::consumed()
    }

    /// Finish the drag and commit the final position.
    pub fn drag_end(&mut self) -> HandleStatus {
        let Some(session) = self.drag.take() else {
            return HandleStatus::ignored();
        };

        self.renderer.render(
            &self.scene,
            &RenderCommand::DragReleased {
                curve: session.curve,
                sub_index: session.sub_index,
            },
        );
        // The commit may move the domains; report the written point.
        let point = self.write_back(&session);
        self.messages.push(HostMessage::DragEnd {
            point,
            index: session.sub_index,
            curve: session.curve,
        });
        tracing::debug!(curve = session.curve, sub_index = session.sub_index, "drag ended");
        HandleStatus::consumed()
    }

    /// Commit the session's position and return the data point written.
    fn write_back(&mut self, session: &DragSession) -> DataPoint {
        let scales = self.model.scales();
        let write = drag::write_back(
            self.model.data(),
            session,
            scales.x.as_ref(),
            scales.y.as_ref(),
            self.config.restrict_x,
            self.config.restrict_y,
        );
        let point = write.point;
        if write.is_empty() {
            return point;
        }

        let mut reactions = ReactionSet::empty();
        if write.x_written {
            reactions |= reactions_for(Field::X);
            self.delta.x = Some(write.data.x.clone());
        }
        if write.y_written {
            reactions |= reactions_for(Field::Y);
            self.delta.y = Some(write.data.y.clone());
        }

        self.model.stage_data(write.data);
        self.model.react(reactions);
        self.run_view_reactions(reactions.view(), Animation::Animated);
        self.poll();
        point
    }
}

impl<R: MarkRenderer> Drop for CurveMark<R> {
    fn drop(&mut self) {
        for subscription in self.subscriptions.drain(..) {
            match subscription {
                Subscription::Axis(scale, id) => scale.unsubscribe(id),
                Subscription::Color(scale, id) => scale.unsubscribe(id),
            }
        }
    }
}
