//! Keyboard modifiers and event handling status.

bitflags::bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        /// Cmd on macOS.
        const META = 1 << 3;
    }
}

impl Modifiers {
    /// Ctrl or Cmd: the multi-select modifier.
    pub fn is_accelerator(self) -> bool {
        self.intersects(Self::CTRL | Self::META)
    }
}

bitflags::bitflags! {
    /// Result of handling an event.
    ///
    /// `CONSUMED` stops propagation to the background handler;
    /// `PREVENT_DEFAULT` asks the host to skip its default action.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HandleStatus: u8 {
        const HANDLED = 1 << 0;
        const CONSUMED = 1 << 1;
        const PREVENT_DEFAULT = 1 << 2;
    }
}

impl HandleStatus {
    pub fn ignored() -> Self {
        Self::empty()
    }

    pub fn handled() -> Self {
        Self::HANDLED
    }

    pub fn consumed() -> Self {
        Self::HANDLED | Self::CONSUMED
    }

    pub fn is_handled(self) -> bool {
        self.contains(Self::HANDLED)
    }

    pub fn is_consumed(self) -> bool {
        self.contains(Self::CONSUMED)
    }

    pub fn prevents_default(self) -> bool {
        self.contains(Self::PREVENT_DEFAULT)
    }
}
