use crate::client::error::ApiError;
use crate::client::{FinsightApi, Operation};
use crate::config::Settings;
use crate::domain::analysis::{AnalysisResult, AnalyzeRequest};
use crate::domain::profile::Profile;
use crate::domain::recommendation::{Recommendation, RecommendationsResponse};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpFinsightClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpFinsightClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build FinSight http client")?;

        Ok(Self {
            http,
            base_url: settings.api_base.clone(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, op: Operation) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), op.path())
    }

    async fn get_json(&self, op: Operation) -> Result<Value> {
        let req = self.http.get(self.url(op));
        self.send(op, req).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, op: Operation, body: &B) -> Result<Value> {
        let req = self.http.post(self.url(op)).json(body);
        self.send(op, req).await
    }

    async fn send(&self, op: Operation, req: reqwest::RequestBuilder) -> Result<Value> {
        tracing::debug!(operation = op.as_str(), path = op.path(), "sending request");

        let res = req.send().await.map_err(|e| {
            let detail = if e.is_timeout() {
                format!("timed out after {}s", self.timeout.as_secs())
            } else {
                e.to_string()
            };
            ApiError {
                operation: op,
                stage: "send",
                detail,
                status: None,
                raw_body: None,
                raw_body_json: None,
            }
        })?;

        let status = res.status();
        let text = res.text().await.map_err(|e| ApiError {
            operation: op,
            stage: "read_body",
            detail: e.to_string(),
            status: Some(status.as_u16()),
            raw_body: None,
            raw_body_json: None,
        })?;

        // Non-2xx is a failure even when the body is valid JSON.
        if !status.is_success() {
            let raw_body_json = serde_json::from_str::<Value>(&text).ok();
            tracing::warn!(operation = op.as_str(), %status, "backend returned error status");
            return Err(ApiError {
                operation: op,
                stage: "http",
                detail: format!("status={status}"),
                status: Some(status.as_u16()),
                raw_body: Some(text),
                raw_body_json,
            }
            .into());
        }

        let raw_json = serde_json::from_str::<Value>(&text).map_err(|e| ApiError {
            operation: op,
            stage: "decode",
            detail: format!("response is not valid JSON: {e}"),
            status: Some(status.as_u16()),
            raw_body: Some(text.clone()),
            raw_body_json: None,
        })?;

        tracing::debug!(operation = op.as_str(), %status, "request succeeded");
        Ok(raw_json)
    }
}

fn decode_error(op: Operation, err: anyhow::Error, raw: Value) -> anyhow::Error {
    ApiError {
        operation: op,
        stage: "decode",
        detail: format!("{err:#}"),
        status: None,
        raw_body: None,
        raw_body_json: Some(raw),
    }
    .into()
}

#[async_trait::async_trait]
impl FinsightApi for HttpFinsightClient {
    async fn health(&self) -> Result<Value> {
        self.get_json(Operation::Health).await
    }

    async fn save_profile(&self, profile: &Profile) -> Result<Profile> {
        let op = Operation::SaveProfile;
        let raw = self.post_json(op, profile).await?;
        serde_json::from_value::<Profile>(raw.clone())
            .context("failed to decode saved profile")
            .map_err(|e| decode_error(op, e, raw))
    }

    async fn recommendations(&self, profile: &Profile) -> Result<Vec<Recommendation>> {
        let op = Operation::Recommendations;
        let raw = self.post_json(op, profile).await?;
        // A body that is not an object at all still means "no picks".
        if !raw.is_object() {
            tracing::warn!("recommendations body is not an object; treating as empty");
            return Ok(Vec::new());
        }
        let parsed = serde_json::from_value::<RecommendationsResponse>(raw.clone())
            .context("failed to decode recommendations")
            .map_err(|e| decode_error(op, e, raw))?;
        Ok(parsed.items)
    }

    async fn analyze(&self, question: &str, profile: &Profile) -> Result<AnalysisResult> {
        let op = Operation::Analyze;
        let raw = self
            .post_json(op, &AnalyzeRequest { question, profile })
            .await?;
        AnalysisResult::from_value(raw.clone()).map_err(|e| decode_error(op, e, raw))
    }
}
