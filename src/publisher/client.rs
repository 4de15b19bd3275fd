use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use tracing::{info, instrument};
use url::Url;

use crate::config::ENV_BEARER_TOKEN;
use crate::publisher::errors::PublishError;

const STATUS_URL_PREFIX: &str = "https://x.com/i/status/";

/// What the platform hands back for a created post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub id: String,
    pub url: Option<String>,
}

/// Final hop of a run: takes the assembled post text as an opaque value.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, text: &str) -> Result<PublishReceipt, PublishError>;
}

#[derive(Debug, Deserialize)]
struct CreatedResponse {
    data: CreatedPost,
}

#[derive(Debug, Deserialize)]
struct CreatedPost {
    id: String,
}

/// Posts through a JSON `POST {"text": ...}` endpoint with bearer auth.
/// Only `201 Created` counts as success.
#[derive(Debug, Clone)]
pub struct HttpPublisher {
    http: Client,
    endpoint: Url,
    token: String,
}

impl HttpPublisher {
    pub fn new(endpoint: &str, token: Option<&str>, timeout: Duration) -> Result<Self, PublishError> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(PublishError::MissingCredential(ENV_BEARER_TOKEN))?;
        let endpoint = Url::parse(endpoint)?;

        let http = ClientBuilder::new()
            .timeout(timeout)
            .build()
            .map_err(PublishError::from_reqwest_error)?;

        Ok(Self {
            http,
            endpoint,
            token: token.to_string(),
        })
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    #[instrument(skip_all, fields(endpoint = %self.endpoint, chars = text.chars().count()))]
    async fn publish(&self, text: &str) -> Result<PublishReceipt, PublishError> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.token)
            .json(&serde_json::json!({ "text": text }))
            .send()
            .await
            .map_err(PublishError::from_reqwest_error)?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(PublishError::from_reqwest_error)?;

        if status != StatusCode::CREATED {
            return Err(PublishError::Rejected { status, body });
        }

        let created: CreatedResponse =
            serde_json::from_str(&body).map_err(|e| PublishError::Decode(e.to_string()))?;
        let url = format!("{STATUS_URL_PREFIX}{}", created.data.id);
        info!("Post published: {}", url);

        Ok(PublishReceipt {
            id: created.data.id,
            url: Some(url),
        })
    }
}

/// Logs the post instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunPublisher;

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn publish(&self, text: &str) -> Result<PublishReceipt, PublishError> {
        info!("Dry run, post not sent ({} chars):\n{}", text.chars().count(), text);
        Ok(PublishReceipt {
            id: "dry-run".to_string(),
            url: None,
        })
    }
}
