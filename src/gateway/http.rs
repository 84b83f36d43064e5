//! `reqwest` implementation of the [`Backend`] trait.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use super::types::{RenameRequest, SendRequest, ThreadRequest};
use super::{Backend, GatewayError, GatewayResult, History, ProjectSummary, SaveOutcome, SendReply};

/// HTTP client for the R4R backend.
pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                reqwest::Client::new()
            });
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Turns a non-success response into `GatewayError::Api`, keeping the body.
async fn check_status(response: reqwest::Response) -> GatewayResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    Err(GatewayError::Api {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> GatewayResult<T> {
    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::Network(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| GatewayError::Parse(e.to_string()))
}

fn network(e: reqwest::Error) -> GatewayError {
    GatewayError::Network(e.to_string())
}

#[async_trait]
impl Backend for HttpBackend {
    async fn send_message(
        &self,
        message: &str,
        project: Option<&str>,
        phase: Option<&str>,
    ) -> GatewayResult<SendReply> {
        info!(
            "POST /api/message (project={:?}, phase={:?}, len={})",
            project,
            phase,
            message.len()
        );
        let response = self
            .client
            .post(self.url("/api/message"))
            .json(&SendRequest {
                message,
                project,
                phase,
            })
            .send()
            .await
            .map_err(network)?;
        debug!("/api/message status: {}", response.status());

        let response = check_status(response).await.inspect_err(|e| {
            warn!("Send message rejected: {}", e);
        })?;
        decode(response).await
    }

    async fn get_history(&self, project: &str, phase: &str) -> GatewayResult<History> {
        info!("POST /api/history ({}/{})", project, phase);
        let response = self
            .client
            .post(self.url("/api/history"))
            .json(&ThreadRequest { project, phase })
            .send()
            .await
            .map_err(network)?;

        if !response.status().is_success() {
            warn!(
                "History for {}/{} unavailable (HTTP {}), showing empty transcript",
                project,
                phase,
                response.status().as_u16()
            );
            return Ok(History::default());
        }

        match decode::<History>(response).await {
            Ok(history) => {
                debug!("History for {}/{}: {} messages", project, phase, history.history.len());
                Ok(history)
            }
            Err(GatewayError::Parse(e)) => {
                warn!("Malformed history for {}/{}: {}", project, phase, e);
                Ok(History::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn save_context(&self, project: &str, phase: &str) -> GatewayResult<SaveOutcome> {
        info!("POST /api/save_context ({}/{})", project, phase);
        let response = self
            .client
            .post(self.url("/api/save_context"))
            .json(&ThreadRequest { project, phase })
            .send()
            .await
            .map_err(network)?;
        let status = response.status();
        debug!("/api/save_context status: {}", status);

        // 202 "pending" and error bodies still decode, with `saved` false.
        match decode::<SaveOutcome>(response).await {
            Ok(outcome) => Ok(outcome),
            Err(GatewayError::Parse(e)) if !status.is_success() => {
                warn!("Save rejected (HTTP {}): {}", status.as_u16(), e);
                Ok(SaveOutcome::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn list_projects(&self) -> GatewayResult<Vec<ProjectSummary>> {
        debug!("GET /api/projects");
        let response = self
            .client
            .get(self.url("/api/projects"))
            .send()
            .await
            .map_err(network)?;
        let response = check_status(response).await?;
        decode(response).await
    }

    async fn rename_project(&self, slug: &str, new_title: &str) -> GatewayResult<()> {
        info!("PATCH /api/project/{} -> {:?}", slug, new_title);
        let response = self
            .client
            .patch(self.url(&format!("/api/project/{slug}")))
            .json(&RenameRequest { new_title })
            .send()
            .await
            .map_err(network)?;
        check_status(response).await?;
        Ok(())
    }

    async fn delete_project(&self, slug: &str) -> GatewayResult<()> {
        info!("DELETE /api/project/{}", slug);
        let response = self
            .client
            .delete(self.url(&format!("/api/project/{slug}")))
            .send()
            .await
            .map_err(network)?;
        check_status(response).await?;
        Ok(())
    }
}
