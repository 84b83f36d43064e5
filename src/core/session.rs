//! # Session State
//!
//! The active project/phase/title triple. Lives inside `App` and is only
//! written by the reducer in `action.rs`; everything else gets a shared
//! reference through `App::session()`.
//!
//! ```text
//! Session
//! ├── project: Option<String>   // active thread slug (None = new-project mode)
//! ├── phase: Option<String>     // phase inside the project
//! ├── title: Option<String>     // display name
//! ├── memory_time: f64          // last memory timestamp from /api/history
//! └── pending: bool             // unsaved conversation memory on the backend
//! ```

use chrono::{DateTime, Local, Utc};

/// Title used while no project exists yet.
pub const NEW_PROJECT_TITLE: &str = "New project";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    project: Option<String>,
    phase: Option<String>,
    title: Option<String>,
    memory_time: f64,
    pending: bool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole triple at once. No validation: callers pass a
    /// consistent selection.
    pub(in crate::core) fn set(
        &mut self,
        project: Option<String>,
        phase: Option<String>,
        title: Option<String>,
    ) {
        self.project = project;
        self.phase = phase;
        self.title = title;
        log::info!(
            "Active context -> project={:?} phase={:?} title={:?}",
            self.project,
            self.phase,
            self.title
        );
    }

    /// Switches to new-project mode.
    pub(in crate::core) fn clear(&mut self, title: &str) {
        self.set(None, None, Some(title.to_string()));
        self.memory_time = 0.0;
        self.pending = false;
    }

    /// Updates the title if `slug` is the active project. Returns whether it was.
    pub(in crate::core) fn rename(&mut self, slug: &str, title: &str) -> bool {
        if self.project.as_deref() == Some(slug) {
            self.title = Some(title.to_string());
            true
        } else {
            false
        }
    }

    pub(in crate::core) fn note_history(&mut self, memory_time: f64, pending: bool) {
        self.memory_time = memory_time;
        self.pending = pending;
    }

    pub(in crate::core) fn mark_pending(&mut self) {
        self.pending = true;
    }

    pub(in crate::core) fn mark_saved(&mut self) {
        self.pending = false;
    }

    pub fn project(&self) -> Option<&str> {
        self.project.as_deref()
    }

    pub fn phase(&self) -> Option<&str> {
        self.phase.as_deref()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn pending(&self) -> bool {
        self.pending
    }

    pub fn memory_time(&self) -> f64 {
        self.memory_time
    }

    /// The `(project, phase)` pair when both are set.
    pub fn thread(&self) -> Option<(&str, &str)> {
        Some((self.project.as_deref()?, self.phase.as_deref()?))
    }

    /// Human-readable title, falling back to the slug.
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.project.as_deref())
            .unwrap_or(NEW_PROJECT_TITLE)
    }

    /// Local time of the last memory write, if the backend reported one.
    pub fn memory_time_label(&self) -> Option<String> {
        if self.memory_time <= 0.0 {
            return None;
        }
        let secs = self.memory_time.trunc() as i64;
        let dt: DateTime<Local> = DateTime::<Utc>::from_timestamp(secs, 0)?.with_timezone(&Local);
        Some(dt.format("%Y-%m-%d %H:%M").to_string())
    }
}
