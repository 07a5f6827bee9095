//! Task breakdown via an external text-generation service.
//!
//! The service receives a natural-language instruction embedding the task's
//! text and must answer with a JSON object of the shape
//! `{ "subtasks": ["...", ...] }`. Any transport failure or shape violation
//! is a single, unretried `Error::Enrichment` for that invocation; the
//! caller abandons the operation with no partial mutation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Serialize)]
struct BreakdownRequest {
    instruction: String,
}

#[derive(Debug, Clone, Deserialize)]
struct BreakdownResponse {
    subtasks: Vec<String>,
}

/// Splits a task's text into short subtask lines.
#[async_trait::async_trait]
pub trait Breaker: Send + Sync {
    async fn break_down(&self, text: &str) -> Result<Vec<String>>;
}

/// Implements the `Breaker` trait against an HTTP text-generation endpoint.
pub struct HttpBreaker {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBreaker {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait::async_trait]
impl Breaker for HttpBreaker {
    async fn break_down(&self, text: &str) -> Result<Vec<String>> {
        trace!("requesting breakdown for task text of {} chars", text.len());
        let request = BreakdownRequest {
            instruction: format!(
                "Break the task \"{text}\" into three to five short, actionable \
                 subtasks. Respond with a JSON object of the form \
                 {{\"subtasks\": [\"...\"]}} and nothing else."
            ),
        };
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::enrichment(format!(
                "service returned {}",
                response.status()
            )));
        }
        let body: BreakdownResponse = response
            .json()
            .await
            .map_err(|e| Error::enrichment(format!("malformed response: {e}")))?;
        validate_lines(body.subtasks)
    }
}

/// Canned implementation of the `Breaker` trait.
///
/// Note: compiled even in the "production" version of this app so that the
/// breakdown path can run top-to-bottom without a text-generation service.
pub struct StaticBreaker {
    lines: Option<Vec<String>>,
}

impl StaticBreaker {
    /// Always answers with `lines`.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines: Some(lines) }
    }

    /// Always fails, for exercising the abandon path.
    pub fn failing() -> Self {
        Self { lines: None }
    }
}

#[async_trait::async_trait]
impl Breaker for StaticBreaker {
    async fn break_down(&self, _text: &str) -> Result<Vec<String>> {
        match &self.lines {
            Some(lines) => Ok(lines.clone()),
            None => Err(Error::enrichment("canned failure")),
        }
    }
}

/// A response with no lines, or with any blank line, is a shape violation.
fn validate_lines(lines: Vec<String>) -> Result<Vec<String>> {
    if lines.is_empty() {
        return Err(Error::enrichment("empty subtask list"));
    }
    lines
        .into_iter()
        .map(|line| {
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() {
                Err(Error::enrichment("blank subtask line"))
            } else {
                Ok(trimmed)
            }
        })
        .collect()
}
