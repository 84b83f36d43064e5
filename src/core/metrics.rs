//! # Reply Metrics
//!
//! The HUD strip shown under an assistant reply: model name, token rate,
//! token count and time-to-first-token.
//!
//! A live reply and a replayed history entry build their HUD the same way,
//! from the metrics that belong to *that* message. Nothing is read from
//! shared state.

use crate::gateway::{MessageMeta, WireMetrics};

/// Shown when the backend didn't tell us which model answered.
pub const UNKNOWN_MODEL: &str = "Model";

/// Shown in place of a metric the backend didn't report.
const MISSING: &str = "—";

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ReplyMetrics {
    pub tokens: Option<u64>,
    pub tok_per_s: Option<f64>,
    pub ttf: Option<f64>,
}

impl From<WireMetrics> for ReplyMetrics {
    fn from(m: WireMetrics) -> Self {
        Self {
            tokens: m.tokens,
            tok_per_s: m.tok_per_s,
            ttf: m.ttf,
        }
    }
}

/// Everything a HUD block displays.
#[derive(Debug, Clone, PartialEq)]
pub struct Hud {
    pub model: String,
    pub metrics: ReplyMetrics,
}

impl Hud {
    pub fn new(model: Option<&str>, metrics: Option<WireMetrics>) -> Self {
        Self {
            model: model
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .unwrap_or(UNKNOWN_MODEL)
                .to_string(),
            metrics: metrics.map(ReplyMetrics::from).unwrap_or_default(),
        }
    }

    /// HUD for a history message; `None` unless metrics were stored with it.
    pub fn from_meta(meta: Option<&MessageMeta>) -> Option<Self> {
        let meta = meta?;
        let metrics = meta.metrics?;
        Some(Self::new(meta.model.as_deref(), Some(metrics)))
    }

    pub fn rate_label(&self) -> String {
        match self.metrics.tok_per_s {
            Some(rate) if rate > 0.0 => format!("{rate:.2} tok/s"),
            _ => MISSING.to_string(),
        }
    }

    pub fn tokens_label(&self) -> String {
        match self.metrics.tokens {
            Some(tokens) => format!("{tokens} tokens"),
            None => format!("{MISSING} tokens"),
        }
    }

    pub fn ttf_label(&self) -> String {
        match self.metrics.ttf {
            Some(ttf) if ttf > 0.0 => format!("TTF {ttf:.2}s"),
            _ => format!("TTF {MISSING}"),
        }
    }

    /// The four HUD cells in display order.
    pub fn cells(&self) -> [String; 4] {
        [
            format!("⚡ {}", self.model),
            format!("🕓 {}", self.rate_label()),
            format!("🔢 {}", self.tokens_label()),
            format!("⏳ {}", self.ttf_label()),
        ]
    }
}
