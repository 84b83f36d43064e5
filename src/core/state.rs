//! # Application State
//!
//! Core business state for r4r. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: Session              // active project/phase/title (private)
//! ├── transcript: Transcript        // conversation pane view-model
//! ├── nav: Navigator                // sidebar project tree
//! ├── header: Header                // header label + save button
//! ├── notices: Notices              // toasts
//! ├── is_sending: bool              // waiting for /api/message
//! ├── pending_reply: Option<ReplyHandle>  // placeholder of the in-flight send
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! The session has no public setters at all, so no surprise mutations.

use crate::core::header::Header;
use crate::core::nav::Navigator;
use crate::core::notice::Notices;
use crate::core::session::Session;
use crate::core::transcript::{ReplyHandle, Transcript};

pub struct App {
    pub(in crate::core) session: Session,
    pub transcript: Transcript,
    pub nav: Navigator,
    pub header: Header,
    pub notices: Notices,
    pub is_sending: bool,
    pub(in crate::core) pending_reply: Option<ReplyHandle>,
    pub status_message: String,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            session: Session::new(),
            transcript: Transcript::new(),
            nav: Navigator::new(),
            header: Header::new(),
            notices: Notices::new(),
            is_sending: false,
            pending_reply: None,
            status_message: String::from("Welcome to r4r!"),
        }
    }

    /// Read-only view of the active context.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// A send or a reveal is in flight; new prompts are refused.
    pub fn is_loading(&self) -> bool {
        self.is_sending || self.transcript.is_revealing()
    }

    pub fn header_label(&self) -> String {
        self.header.label(&self.session)
    }
}
