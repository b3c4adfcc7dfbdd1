//! Event names, interaction modes and the handler table.
//!
//! A mode maps every [`EventName`] to a [`Handler`]; switching modes swaps the
//! whole [`HandlerSet`] at once.

use crate::attribute::attribute_enum;
use crate::input::Modifiers;

attribute_enum! {
    /// Pointer events routed through the dispatch table.
    pub enum EventName as "event" {
        MouseOver => "mouse_over",
        MouseMove => "mouse_move",
        MouseOut => "mouse_out",
        LegendMouseOver => "legend_mouse_over",
        LegendMouseOut => "legend_mouse_out",
        LegendClicked => "legend_clicked",
        ElementClicked => "element_clicked",
        ParentClicked => "parent_clicked",
    }
}

impl EventName {
    /// Name of the message forwarded to the host, if any.
    pub fn message_name(self) -> Option<&'static str> {
        match self {
            EventName::MouseOver => Some("hover"),
            EventName::LegendClicked => Some("legend_click"),
            EventName::ElementClicked => Some("element_click"),
            EventName::ParentClicked => Some("background_click"),
            EventName::MouseMove
            | EventName::MouseOut
            | EventName::LegendMouseOver
            | EventName::LegendMouseOut => None,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

attribute_enum! {
    /// What clicks on the mark do.
    #[derive(Default)]
    pub enum InteractionMode as "interactions" {
        #[default]
        None => "none",
        /// Clicks select curves; background clicks clear the selection.
        Select => "select",
    }
}

/// The action bound to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handler {
    Noop,
    Hover,
    Unhover,
    SelectCurve,
    ClearSelection,
}

fn handler_for(mode: InteractionMode, event: EventName) -> Handler {
    match (mode, event) {
        (_, EventName::MouseOver | EventName::LegendMouseOver) => Handler::Hover,
        (_, EventName::MouseOut | EventName::LegendMouseOut) => Handler::Unhover,
        (InteractionMode::Select, EventName::ElementClicked) => Handler::SelectCurve,
        (InteractionMode::Select, EventName::ParentClicked) => Handler::ClearSelection,
        (InteractionMode::None, EventName::ElementClicked | EventName::ParentClicked) => {
            Handler::Noop
        }
        (_, EventName::MouseMove | EventName::LegendClicked) => Handler::Noop,
    }
}

const EVENT_COUNT: usize = EventName::ALL.len();

/// Handlers for every event under one mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerSet {
    mode: InteractionMode,
    handlers: [Handler; EVENT_COUNT],
}

impl HandlerSet {
    pub fn for_mode(mode: InteractionMode) -> Self {
        let mut handlers = [Handler::Noop; EVENT_COUNT];
        for event in EventName::ALL {
            handlers[event.slot()] = handler_for(mode, *event);
        }
        Self { mode, handlers }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn get(&self, event: EventName) -> Handler {
        self.handlers[event.slot()]
    }
}

impl Default for HandlerSet {
    fn default() -> Self {
        Self::for_mode(InteractionMode::default())
    }
}

/// A pointer event as delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub name: EventName,
    /// Curve under the pointer, when the event targets one.
    pub curve: Option<usize>,
    pub modifiers: Modifiers,
}

impl PointerEvent {
    pub fn new(name: EventName) -> Self {
        Self {
            name,
            curve: None,
            modifiers: Modifiers::empty(),
        }
    }

    pub fn on_curve(name: EventName, curve: usize) -> Self {
        Self {
            curve: Some(curve),
            ..Self::new(name)
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}
