//! # Actions
//!
//! Everything that can happen in r4r becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::ReplyReceived { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns the side effects the adapter must run. No I/O
//! happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//! ```
//!
//! Results of async work come back as actions tagged with the transcript
//! generation they were started under; `update` drops the ones that no
//! longer match.

use log::{debug, error, info, warn};

use crate::core::metrics::Hud;
use crate::core::notice::NoticeKind;
use crate::core::session::NEW_PROJECT_TITLE;
use crate::core::state::App;
use crate::core::transcript::{RevealStart, ScrollMotion};
use crate::gateway::{GatewayResult, History, ProjectSummary, Role, SaveOutcome, SendReply};

pub const MSG_SENT: &str = "Message sent";
pub const MSG_SEND_FAILED: &str = "Failed to send message";
pub const MSG_HISTORY_FAILED: &str = "Failed to load history";
pub const MSG_NO_ACTIVE_PROJECT: &str = "No active project to save";
pub const MSG_SAVED: &str = "Context saved";
pub const MSG_SAVE_ERROR: &str = "Error while saving";
pub const MSG_SAVE_CONNECTION: &str = "Connection failed while saving";
pub const MSG_NEW_PROJECT: &str = "Start a new project by writing your first prompt";
pub const MSG_RENAME_FAILED: &str = "Failed to rename project";
pub const MSG_DELETE_FAILED: &str = "Failed to delete project";

#[derive(Debug, Clone)]
pub enum Action {
    // User intents
    Submit(String),
    SelectPhase { project: String, phase: String },
    NewProject,
    SaveContext,
    RenameProject { slug: String, new_title: String },
    DeleteProject { slug: String },
    ToggleProject(String),
    RefreshProjects,
    ScrollUp(u16),
    ScrollDown(u16),
    ScrollToBottom,
    Quit,

    // Backend results
    ProjectsLoaded {
        expand_title: Option<String>,
        result: GatewayResult<Vec<ProjectSummary>>,
    },
    HistoryLoaded {
        generation: u64,
        project: String,
        phase: String,
        result: GatewayResult<History>,
    },
    ReplyReceived {
        generation: u64,
        result: GatewayResult<SendReply>,
    },
    SaveFinished {
        nonce: u64,
        result: GatewayResult<SaveOutcome>,
    },
    RenameFinished {
        slug: String,
        new_title: String,
        result: GatewayResult<()>,
    },
    DeleteFinished {
        slug: String,
        title: String,
        result: GatewayResult<()>,
    },

    // Timers
    RevealStep { generation: u64 },
    DismissNotice(u64),
    RestoreHeader { nonce: u64 },
}

/// Side effects returned by `update()` for the adapter to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Quit,
    LoadProjects {
        expand_title: Option<String>,
    },
    LoadHistory {
        generation: u64,
        project: String,
        phase: String,
    },
    SendMessage {
        generation: u64,
        message: String,
        project: Option<String>,
        phase: Option<String>,
    },
    SaveContext {
        nonce: u64,
        project: String,
        phase: String,
    },
    RenameProject {
        slug: String,
        new_title: String,
    },
    DeleteProject {
        slug: String,
        title: String,
    },
    /// Tick `RevealStep { generation }` `steps` times, one per typewriter delay.
    StartReveal {
        generation: u64,
        steps: usize,
    },
    DismissNoticeAfter {
        id: u64,
    },
    RestoreHeaderAfter {
        nonce: u64,
    },
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::Quit => vec![Effect::Quit],

        Action::Submit(text) => submit(app, text),

        Action::ReplyReceived { generation, result } => reply_received(app, generation, result),

        Action::RevealStep { generation } => {
            let progress = app.transcript.reveal_step(generation);
            debug!("Reveal step (gen {}): {:?}", generation, progress);
            Vec::new()
        }

        Action::SelectPhase { project, phase } => select_phase(app, project, phase),

        Action::HistoryLoaded {
            generation,
            project,
            phase,
            result,
        } => history_loaded(app, generation, &project, &phase, result),

        Action::NewProject => {
            app.transcript.begin_view();
            app.transcript.clear();
            app.transcript.hide_loader();
            app.pending_reply = None;
            app.session.clear(NEW_PROJECT_TITLE);
            app.nav.clear_active();
            app.header.pending();
            let mut effects = Vec::new();
            notify(app, MSG_NEW_PROJECT, NoticeKind::Success, &mut effects);
            effects
        }

        Action::SaveContext => save_context(app),

        Action::SaveFinished { nonce, result } => save_finished(app, nonce, result),

        Action::RenameProject { slug, new_title } => {
            let new_title = new_title.trim().to_string();
            let unchanged = app.nav.title_of(&slug) == Some(new_title.as_str());
            if new_title.is_empty() || unchanged {
                debug!("Rename of {} cancelled (empty or unchanged)", slug);
                return Vec::new();
            }
            vec![Effect::RenameProject { slug, new_title }]
        }

        Action::RenameFinished {
            slug,
            new_title,
            result,
        } => {
            let mut effects = Vec::new();
            match result {
                Ok(()) => {
                    app.nav.rename(&slug, &new_title);
                    if app.session.rename(&slug, &new_title) {
                        info!("Active project renamed to {:?}", new_title);
                    }
                    let text = format!("Project renamed to \"{new_title}\"");
                    notify(app, text, NoticeKind::Success, &mut effects);
                }
                Err(e) => {
                    error!("Rename of {} failed: {}", slug, e);
                    notify(app, MSG_RENAME_FAILED, NoticeKind::Error, &mut effects);
                }
            }
            effects
        }

        Action::DeleteProject { slug } => {
            let title = app.nav.title_of(&slug).unwrap_or(&slug).to_string();
            vec![Effect::DeleteProject { slug, title }]
        }

        Action::DeleteFinished {
            slug,
            title,
            result,
        } => delete_finished(app, slug, title, result),

        Action::ToggleProject(slug) => {
            app.nav.toggle(&slug);
            Vec::new()
        }

        Action::RefreshProjects => vec![Effect::LoadProjects { expand_title: None }],

        Action::ProjectsLoaded {
            expand_title,
            result,
        } => {
            match result {
                Ok(projects) => {
                    app.nav.load(projects, expand_title.as_deref());
                    if let Some((project, phase)) = app.session.thread() {
                        app.nav.set_active(project, phase);
                    }
                }
                Err(e) => {
                    error!("Failed to load projects: {}", e);
                    app.nav.mark_failed();
                }
            }
            Vec::new()
        }

        Action::ScrollUp(rows) => {
            app.transcript.scroll.scroll_up(rows);
            Vec::new()
        }

        Action::ScrollDown(rows) => {
            app.transcript.scroll.scroll_down(rows);
            Vec::new()
        }

        Action::ScrollToBottom => {
            app.transcript.scroll.scroll_to_bottom(ScrollMotion::Smooth);
            Vec::new()
        }

        Action::DismissNotice(id) => {
            app.notices.dismiss(id);
            Vec::new()
        }

        Action::RestoreHeader { nonce } => {
            if !app.header.restore(nonce) {
                debug!("Header restore #{} skipped", nonce);
            }
            Vec::new()
        }
    }
}

/// Pushes a notice and schedules its dismissal.
fn notify(app: &mut App, text: impl Into<String>, kind: NoticeKind, effects: &mut Vec<Effect>) {
    let id = app.notices.push(text, kind);
    effects.push(Effect::DismissNoticeAfter { id });
}

fn submit(app: &mut App, text: String) -> Vec<Effect> {
    let message = text.trim();
    if message.is_empty() {
        return Vec::new();
    }
    if app.is_loading() {
        debug!("Submit ignored: a reply is still in flight");
        return Vec::new();
    }

    app.transcript.append(Role::User, message);
    app.pending_reply = Some(app.transcript.append_loader());
    app.is_sending = true;
    app.status_message = String::from("Waiting for reply...");

    vec![Effect::SendMessage {
        generation: app.transcript.generation(),
        message: message.to_string(),
        project: app.session.project().map(str::to_string),
        phase: app.session.phase().map(str::to_string),
    }]
}

fn reply_received(app: &mut App, generation: u64, result: GatewayResult<SendReply>) -> Vec<Effect> {
    app.is_sending = false;
    app.status_message.clear();

    if !app.transcript.is_current(generation) {
        // The user moved on. Nothing is written, but the backend may have
        // created a project we should list.
        info!(
            "Dropping reply from generation {} (current {})",
            generation,
            app.transcript.generation()
        );
        return match result {
            Ok(_) => vec![Effect::LoadProjects { expand_title: None }],
            Err(e) => {
                warn!("Stale send also failed: {}", e);
                Vec::new()
            }
        };
    }

    let mut effects = Vec::new();
    let reply = match result {
        Ok(reply) if !reply.reply.trim().is_empty() => reply,
        Ok(_) => {
            error!("Backend returned an empty reply");
            send_failed(app, &mut effects);
            return effects;
        }
        Err(e) => {
            error!("Send failed: {}", e);
            send_failed(app, &mut effects);
            return effects;
        }
    };

    if let Some(handle) = app.pending_reply.take() {
        app.transcript.remove_loader(handle);
    }
    let block = app.transcript.open_reply();
    let hud = Hud::new(reply.model.as_deref(), reply.metrics);
    match app.transcript.start_reveal(block, &reply.reply, hud) {
        RevealStart::Running { generation, steps } => {
            effects.push(Effect::StartReveal { generation, steps });
        }
        RevealStart::Finished => {}
        RevealStart::Missing => warn!("Reply block disappeared before the reveal"),
    }

    let title = reply.display_title().to_string();
    app.session.set(
        Some(reply.project.clone()),
        Some(reply.phase.clone()),
        Some(title.clone()),
    );
    app.session.mark_pending();
    app.nav.set_active(&reply.project, &reply.phase);
    app.header.active();
    notify(app, MSG_SENT, NoticeKind::Success, &mut effects);
    effects.push(Effect::LoadProjects {
        expand_title: Some(title),
    });
    effects
}

fn send_failed(app: &mut App, effects: &mut Vec<Effect>) {
    app.pending_reply = None;
    app.transcript.remove_placeholder();
    notify(app, MSG_SEND_FAILED, NoticeKind::Error, effects);
}

fn select_phase(app: &mut App, project: String, phase: String) -> Vec<Effect> {
    let title = app.nav.title_of(&project).unwrap_or(&project).to_string();
    app.session
        .set(Some(project.clone()), Some(phase.clone()), Some(title));
    let generation = app.transcript.begin_view();
    app.pending_reply = None;
    app.transcript.show_loader();
    app.nav.set_active(&project, &phase);
    vec![Effect::LoadHistory {
        generation,
        project,
        phase,
    }]
}

fn history_loaded(
    app: &mut App,
    generation: u64,
    project: &str,
    phase: &str,
    result: GatewayResult<History>,
) -> Vec<Effect> {
    if !app.transcript.is_current(generation) {
        debug!("Dropping stale history for {}/{}", project, phase);
        return Vec::new();
    }

    app.transcript.hide_loader();
    app.header.active();
    let mut effects = Vec::new();
    match result {
        Ok(history) => {
            info!(
                "Loaded {}/{}: {} messages, pending={}",
                project,
                phase,
                history.history.len(),
                history.pending
            );
            app.transcript.render_all(&history.history);
            app.session.note_history(history.memory_time, history.pending);
        }
        Err(e) => {
            // The session already points at the new phase; the old
            // transcript stays on screen until the next successful load.
            error!("History for {}/{} failed: {}", project, phase, e);
            notify(app, MSG_HISTORY_FAILED, NoticeKind::Error, &mut effects);
        }
    }
    effects
}

fn save_context(app: &mut App) -> Vec<Effect> {
    let mut effects = Vec::new();
    let Some((project, phase)) = app
        .session
        .thread()
        .map(|(p, ph)| (p.to_string(), ph.to_string()))
    else {
        notify(app, MSG_NO_ACTIVE_PROJECT, NoticeKind::Error, &mut effects);
        return effects;
    };
    if !app.header.save_enabled() {
        debug!("Save ignored: button disabled");
        return effects;
    }

    let nonce = app.header.saving();
    effects.push(Effect::SaveContext {
        nonce,
        project,
        phase,
    });
    effects
}

fn save_finished(app: &mut App, nonce: u64, result: GatewayResult<SaveOutcome>) -> Vec<Effect> {
    let mut effects = Vec::new();
    match result {
        Ok(outcome) if outcome.saved => {
            app.header.saved();
            app.session.mark_saved();
            notify(app, MSG_SAVED, NoticeKind::Success, &mut effects);
            if let Some(next_phase) = outcome.next_phase {
                info!("Backend opened phase {:?}", next_phase);
                effects.push(Effect::LoadProjects {
                    expand_title: Some(app.session.display_title().to_string()),
                });
                let text = format!("New phase created: {next_phase}");
                notify(app, text, NoticeKind::Success, &mut effects);
            }
        }
        Ok(_) => {
            warn!("Backend did not save the context");
            app.header.save_failed();
            notify(app, MSG_SAVE_ERROR, NoticeKind::Error, &mut effects);
        }
        Err(e) => {
            error!("Save failed: {}", e);
            app.header.connection_failed();
            notify(app, MSG_SAVE_CONNECTION, NoticeKind::Error, &mut effects);
        }
    }
    effects.push(Effect::RestoreHeaderAfter { nonce });
    effects
}

fn delete_finished(
    app: &mut App,
    slug: String,
    title: String,
    result: GatewayResult<()>,
) -> Vec<Effect> {
    let mut effects = Vec::new();
    if let Err(e) = result {
        error!("Delete of {} failed: {}", slug, e);
        notify(app, MSG_DELETE_FAILED, NoticeKind::Error, &mut effects);
        return effects;
    }

    app.nav.remove(&slug);
    if app.session.project() == Some(slug.as_str()) {
        app.session.clear(NEW_PROJECT_TITLE);
    }
    app.transcript.begin_view();
    app.transcript.clear();
    app.transcript.hide_loader();
    app.pending_reply = None;
    app.header.deleted();
    notify(
        app,
        format!("Project \"{title}\" deleted"),
        NoticeKind::Success,
        &mut effects,
    );
    effects.push(Effect::LoadProjects { expand_title: None });
    effects
}
