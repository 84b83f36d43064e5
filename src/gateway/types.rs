use serde::{Deserialize, Serialize};

/// Who authored a transcript message.
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    /// Older history files store assistant turns as `bot`.
    #[serde(rename = "assistant", alias = "bot")]
    Assistant,
}

/// Per-reply generation metrics as reported by the backend.
///
/// Every field is optional on the wire: replies created with a new project
/// report `ttf = 0` and `tok_per_s = 0`, older history entries may omit
/// fields entirely.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct WireMetrics {
    #[serde(default)]
    pub tokens: Option<u64>,
    #[serde(default)]
    pub tok_per_s: Option<f64>,
    #[serde(default)]
    pub ttf: Option<f64>,
}

/// Metadata stored next to assistant messages in history.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct MessageMeta {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub metrics: Option<WireMetrics>,
}

/// A single transcript entry as returned by `/api/history`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MessageMeta>,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            meta: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            meta: None,
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Serialize, Debug)]
pub(crate) struct SendRequest<'a> {
    pub message: &'a str,
    pub project: Option<&'a str>,
    pub phase: Option<&'a str>,
}

/// Body shared by `/api/history` and `/api/save_context`.
#[derive(Serialize, Debug)]
pub(crate) struct ThreadRequest<'a> {
    pub project: &'a str,
    pub phase: &'a str,
}

#[derive(Serialize, Debug)]
pub(crate) struct RenameRequest<'a> {
    pub new_title: &'a str,
}

// ============================================================================
// Responses
// ============================================================================

/// Response of `/api/message`.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SendReply {
    #[serde(default)]
    pub reply: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub metrics: Option<WireMetrics>,
    pub project: String,
    pub phase: String,
    #[serde(default)]
    pub project_display: Option<String>,
}

impl SendReply {
    /// Friendly project name, falling back to the slug.
    pub fn display_title(&self) -> &str {
        self.project_display
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or(&self.project)
    }
}

/// Response of `/api/history`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct History {
    #[serde(default)]
    pub history: Vec<Message>,
    #[serde(default)]
    pub memory_time: f64,
    #[serde(default)]
    pub context_exists: bool,
    /// Conversation memory is newer than the saved context.
    #[serde(default)]
    pub pending: bool,
}

/// Response of `/api/save_context`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SaveOutcome {
    #[serde(default)]
    pub saved: bool,
    #[serde(default)]
    pub next_phase: Option<String>,
}

/// One entry of `/api/projects`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct ProjectSummary {
    pub project: String,
    pub title: String,
    #[serde(default)]
    pub phases: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_role_is_read_as_assistant() {
        let msg: Message = serde_json::from_str(r#"{"role":"bot","content":"hi"}"#).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert!(msg.meta.is_none());
    }

    #[test]
    fn history_message_meta_parses_partial_metrics() {
        let json = r#"{
            "role": "assistant",
            "content": "answer",
            "meta": {"model": "mistral:7b", "metrics": {"tokens": 12, "ttf": 0.5}}
        }"#;
        let msg: Message = serde_json::from_str(json).unwrap();
        let meta = msg.meta.unwrap();
        assert_eq!(meta.model.as_deref(), Some("mistral:7b"));
        let metrics = meta.metrics.unwrap();
        assert_eq!(metrics.tokens, Some(12));
        assert_eq!(metrics.tok_per_s, None);
        assert_eq!(metrics.ttf, Some(0.5));
    }

    #[test]
    fn history_tolerates_missing_fields() {
        let history: History = serde_json::from_str(r#"{"history": []}"#).unwrap();
        assert!(history.history.is_empty());
        assert_eq!(history.memory_time, 0.0);
        assert!(!history.pending);
    }

    #[test]
    fn save_outcome_without_saved_is_a_soft_failure() {
        let outcome: SaveOutcome = serde_json::from_str(r#"{"status":"pending"}"#).unwrap();
        assert!(!outcome.saved);
        assert!(outcome.next_phase.is_none());
    }

    #[test]
    fn display_title_falls_back_to_slug() {
        let reply = SendReply {
            reply: "ok".into(),
            model: None,
            metrics: None,
            project: "acme_r4r_1".into(),
            phase: "main".into(),
            project_display: None,
        };
        assert_eq!(reply.display_title(), "acme_r4r_1");

        let named = SendReply {
            project_display: Some("Acme Corp".into()),
            ..reply
        };
        assert_eq!(named.display_title(), "Acme Corp");
    }

    #[test]
    fn send_request_serializes_absent_thread_as_null() {
        let body = SendRequest {
            message: "hello",
            project: None,
            phase: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "hello");
        assert!(json["project"].is_null());
        assert!(json["phase"].is_null());
    }
}
