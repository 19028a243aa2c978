//! Drag-to-connect gesture state.
//!
//! ```text
//!   Idle ── start ──► Connecting ── complete ──► Idle
//!                        │  ▲
//!                        │  └── start (overwrites source)
//!                        └───── cancel ─────► Idle
//! ```

use crate::model::{Endpoint, Position};

#[derive(Debug, Clone, Default, PartialEq)]
enum ConnectState {
    #[default]
    Idle,
    Connecting { from: Endpoint },
}

/// An in-progress connection drag plus the live cursor position.
///
/// The cursor is tracked in every state; it only matters while connecting.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectGesture {
    state: ConnectState,
    cursor: Position,
}

impl ConnectGesture {
    pub fn is_connecting(&self) -> bool {
        matches!(self.state, ConnectState::Connecting { .. })
    }

    pub fn source(&self) -> Option<&Endpoint> {
        match &self.state {
            ConnectState::Connecting { from } => Some(from),
            ConnectState::Idle => None,
        }
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Enters `Connecting`. A gesture already in progress is replaced.
    pub fn start(&mut self, from: Endpoint) {
        self.state = ConnectState::Connecting { from };
    }

    pub fn move_cursor(&mut self, position: Position) {
        self.cursor = position;
    }

    pub fn cancel(&mut self) {
        self.state = ConnectState::Idle;
    }

    /// Returns to `Idle`, handing back the recorded source if there was one.
    pub fn finish(&mut self) -> Option<Endpoint> {
        match std::mem::take(&mut self.state) {
            ConnectState::Connecting { from } => Some(from),
            ConnectState::Idle => None,
        }
    }
}
