//! Keyboard input dispatch.
//!
//! Key events are handed to an [`InputSink`] during event polling instead of
//! a global callback bound to the window.

use glfw::{Action, Key};

/// What the render loop should do after an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Request window closure. Observed at the next loop-condition check.
    Close,
}

/// Receives key events from [`Surface::poll_events`](crate::app::Surface::poll_events).
pub trait InputSink {
    /// Handle one key event.
    fn on_key(&mut self, key: Key, action: Action) -> Flow;
}

/// Closes the window on an Escape key-down. Held and released keys are
/// ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct EscapeToClose;

impl InputSink for EscapeToClose {
    fn on_key(&mut self, key: Key, action: Action) -> Flow {
        match (key, action) {
            (Key::Escape, Action::Press) => Flow::Close,
            _ => Flow::Continue,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_press_requests_close() {
        assert_eq!(EscapeToClose.on_key(Key::Escape, Action::Press), Flow::Close);
    }

    #[test]
    fn escape_repeat_and_release_are_ignored() {
        let mut sink = EscapeToClose;
        assert_eq!(sink.on_key(Key::Escape, Action::Repeat), Flow::Continue);
        assert_eq!(sink.on_key(Key::Escape, Action::Release), Flow::Continue);
    }

    #[test]
    fn other_keys_are_ignored() {
        let mut sink = EscapeToClose;
        for key in [Key::Space, Key::Enter, Key::Q, Key::F4] {
            assert_eq!(sink.on_key(key, Action::Press), Flow::Continue);
        }
    }
}
