//! The boundary to the drawing layer.

use multicurve_core::math::DVec2;

use crate::color::Color;
use crate::scene::Scene;

/// Whether a renderer should transition to the new state or jump to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Animation {
    Animated,
    Immediate,
}

/// What changed in the [`Scene`] since the last command.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Curves were added or removed; `keys` are the live curve indices.
    Reconcile { keys: Vec<usize>, animation: Animation },
    Positions { animation: Animation },
    Styles,
    Visibility,
    Labels,
    /// A point is being dragged: enlarge its marker and tint it.
    DragEmphasis {
        curve: usize,
        sub_index: usize,
        size: f64,
        color: Option<Color>,
    },
    /// Drag finished: restore the marker to the curve style.
    DragReleased { curve: usize, sub_index: usize },
    PointMoved {
        curve: usize,
        sub_index: usize,
        pixel: DVec2,
    },
    Padding(f64),
}

/// Receives scene updates. The scene is always fully up to date when
/// `render` is called.
pub trait MarkRenderer {
    fn render(&mut self, scene: &Scene, command: &RenderCommand);
}

impl<R: MarkRenderer + ?Sized> MarkRenderer for Box<R> {
    fn render(&mut self, scene: &Scene, command: &RenderCommand) {
        (**self).render(scene, command);
    }
}

/// Renderer that ignores every command.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl MarkRenderer for NullRenderer {
    fn render(&mut self, _scene: &Scene, command: &RenderCommand) {
        tracing::trace!(?command, "render command dropped");
    }
}
