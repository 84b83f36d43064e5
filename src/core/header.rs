//! # Header
//!
//! Label above the transcript plus the save button's enabled flag.
//!
//! ```text
//!   Pending ──select/send──▶ Active ──save──▶ Saving ─┬─▶ Saved ────────┐
//!                              ▲                      ├─▶ SaveFailed ───┼─(restore)─▶ Settled
//!                              │                      └─▶ ConnectionFailed ┘
//!   Deleted ◀──delete──────────┘
//! ```

use crate::core::session::Session;

/// Shown while the session has no project.
pub const PENDING_LABEL: &str = "New project — pending";
pub const DELETED_LABEL: &str = "Project deleted — select another";
pub const SAVE_FAILED_LABEL: &str = "⚠️ Save failed";
pub const CONNECTION_FAILED_LABEL: &str = "❌ Connection failed while saving";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStatus {
    Pending,
    Active,
    Saving,
    Saved,
    SaveFailed,
    ConnectionFailed,
    Deleted,
    Settled,
}

#[derive(Debug, Clone)]
pub struct Header {
    status: HeaderStatus,
    save_enabled: bool,
    /// Identifies the latest save; restore timers from older saves are ignored.
    save_nonce: u64,
}

impl Default for Header {
    fn default() -> Self {
        Self::new()
    }
}

impl Header {
    pub fn new() -> Self {
        Self {
            status: HeaderStatus::Pending,
            save_enabled: false,
            save_nonce: 0,
        }
    }

    pub fn status(&self) -> HeaderStatus {
        self.status
    }

    pub fn save_enabled(&self) -> bool {
        self.save_enabled
    }

    pub fn label(&self, session: &Session) -> String {
        match self.status {
            HeaderStatus::Deleted => return DELETED_LABEL.to_string(),
            HeaderStatus::SaveFailed => return SAVE_FAILED_LABEL.to_string(),
            HeaderStatus::ConnectionFailed => return CONNECTION_FAILED_LABEL.to_string(),
            _ => {}
        }
        let Some(phase) = session.phase() else {
            return PENDING_LABEL.to_string();
        };

        let thread = format!("{} / {}", session.display_title(), phase);
        match self.status {
            HeaderStatus::Pending => PENDING_LABEL.to_string(),
            HeaderStatus::Saving => format!("{thread} — saving..."),
            HeaderStatus::Saved => format!("{thread} — saved ✅"),
            HeaderStatus::Settled => {
                let state = if session.pending() { "pending save" } else { "saved" };
                format!("{thread} — {state}")
            }
            _ => thread,
        }
    }

    pub(crate) fn pending(&mut self) {
        self.status = HeaderStatus::Pending;
        self.save_enabled = false;
    }

    pub(crate) fn active(&mut self) {
        self.status = HeaderStatus::Active;
        self.save_enabled = true;
    }

    pub(crate) fn deleted(&mut self) {
        self.status = HeaderStatus::Deleted;
        self.save_enabled = false;
    }

    /// Enters `Saving` and returns the nonce the restore timer must carry.
    pub(crate) fn saving(&mut self) -> u64 {
        self.status = HeaderStatus::Saving;
        self.save_enabled = false;
        self.save_nonce += 1;
        self.save_nonce
    }

    pub(crate) fn saved(&mut self) {
        self.status = HeaderStatus::Saved;
        self.save_enabled = false;
    }

    pub(crate) fn save_failed(&mut self) {
        self.status = HeaderStatus::SaveFailed;
        self.save_enabled = true;
    }

    pub(crate) fn connection_failed(&mut self) {
        self.status = HeaderStatus::ConnectionFailed;
        self.save_enabled = true;
    }

    /// Drops a save result from the label. Returns false for stale timers or
    /// when the header already moved on.
    pub(crate) fn restore(&mut self, nonce: u64) -> bool {
        let showing_result = matches!(
            self.status,
            HeaderStatus::Saved | HeaderStatus::SaveFailed | HeaderStatus::ConnectionFailed
        );
        if nonce != self.save_nonce || !showing_result {
            return false;
        }
        self.status = HeaderStatus::Settled;
        true
    }
}
