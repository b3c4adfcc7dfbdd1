//! A renderer that records commands for verification.

use std::sync::Arc;

use multicurve::render::{MarkRenderer, RenderCommand};
use multicurve::scene::Scene;
use parking_lot::Mutex;

/// Records every [`RenderCommand`] it receives. Clones share the log.
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    commands: Arc<Mutex<Vec<RenderCommand>>>,
    last_scene: Arc<Mutex<Option<Scene>>>,
}

impl RecordingRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<RenderCommand> {
        self.commands.lock().clone()
    }

    pub fn clear(&self) {
        self.commands.lock().clear();
    }

    /// The scene as of the most recent command.
    pub fn last_scene(&self) -> Option<Scene> {
        self.last_scene.lock().clone()
    }

    pub fn count(&self, predicate: impl Fn(&RenderCommand) -> bool) -> usize {
        self.commands.lock().iter().filter(|c| predicate(*c)).count()
    }

    pub fn count_reconciles(&self) -> usize {
        self.count(|c| matches!(c, RenderCommand::Reconcile { .. }))
    }

    pub fn count_positions(&self) -> usize {
        self.count(|c| matches!(c, RenderCommand::Positions { .. }))
    }

    pub fn count_styles(&self) -> usize {
        self.count(|c| matches!(c, RenderCommand::Styles))
    }
}

impl MarkRenderer for RecordingRenderer {
    fn render(&mut self, scene: &Scene, command: &RenderCommand) {
        self.commands.lock().push(command.clone());
        *self.last_scene.lock() = Some(scene.clone());
    }
}
