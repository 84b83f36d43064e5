//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::state::App;
use crate::gateway::{
    Backend, GatewayError, GatewayResult, History, ProjectSummary, SaveOutcome, SendReply,
    WireMetrics,
};

/// An in-memory backend that answers from queued results and records calls.
///
/// Empty queues answer with a `Network` error so a missing script is loud.
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<GatewayResult<SendReply>>>,
    histories: Mutex<VecDeque<GatewayResult<History>>>,
    saves: Mutex<VecDeque<GatewayResult<SaveOutcome>>>,
    projects: Mutex<Vec<ProjectSummary>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_reply(&self, reply: GatewayResult<SendReply>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_history(&self, history: GatewayResult<History>) {
        self.histories.lock().unwrap().push_back(history);
    }

    pub fn push_save(&self, outcome: GatewayResult<SaveOutcome>) {
        self.saves.lock().unwrap().push_back(outcome);
    }

    pub fn set_projects(&self, projects: Vec<ProjectSummary>) {
        *self.projects.lock().unwrap() = projects;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

fn unscripted<T>(what: &str) -> GatewayResult<T> {
    Err(GatewayError::Network(format!("no scripted {what}")))
}

#[async_trait]
impl Backend for ScriptedBackend {
    async fn send_message(
        &self,
        message: &str,
        project: Option<&str>,
        phase: Option<&str>,
    ) -> GatewayResult<SendReply> {
        self.record(format!("send {message} {project:?} {phase:?}"));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("reply"))
    }

    async fn get_history(&self, project: &str, phase: &str) -> GatewayResult<History> {
        self.record(format!("history {project}/{phase}"));
        self.histories
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(History::default()))
    }

    async fn save_context(&self, project: &str, phase: &str) -> GatewayResult<SaveOutcome> {
        self.record(format!("save {project}/{phase}"));
        self.saves
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| unscripted("save"))
    }

    async fn list_projects(&self) -> GatewayResult<Vec<ProjectSummary>> {
        self.record("projects".to_string());
        Ok(self.projects.lock().unwrap().clone())
    }

    async fn rename_project(&self, slug: &str, new_title: &str) -> GatewayResult<()> {
        self.record(format!("rename {slug} {new_title}"));
        Ok(())
    }

    async fn delete_project(&self, slug: &str) -> GatewayResult<()> {
        self.record(format!("delete {slug}"));
        Ok(())
    }
}

/// Creates a fresh test App.
pub fn test_app() -> App {
    App::new()
}

/// A successful `/api/message` reply from `test-model` with 5 tokens.
pub fn reply(text: &str, project: &str, phase: &str, display: Option<&str>) -> SendReply {
    SendReply {
        reply: text.to_string(),
        model: Some("test-model".to_string()),
        metrics: Some(WireMetrics {
            tokens: Some(5),
            tok_per_s: Some(10.0),
            ttf: Some(0.5),
        }),
        project: project.to_string(),
        phase: phase.to_string(),
        project_display: display.map(str::to_string),
    }
}
