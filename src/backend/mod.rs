pub mod dto;
pub mod shape;

pub use dto::{ForwardRequest, UpstreamResponse};
pub use shape::Shape;

use async_trait::async_trait;
use axum::http::header;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::BackendConfig;
use crate::error::AppError;

#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Sends `request` to the backend and returns its status and body unchanged.
    /// Only transport failures are errors; 4xx/5xx answers are ordinary responses.
    async fn forward(&self, request: ForwardRequest) -> Result<UpstreamResponse, AppError>;

    /// Backend path segment for organizations.
    fn org_segment(&self) -> &str {
        "organizations"
    }
}

pub struct BackendHttpClient {
    client: Client,
    config: BackendConfig,
}

impl BackendHttpClient {
    pub fn new(config: BackendConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self { client, config })
    }

    fn url(&self, request: &ForwardRequest) -> String {
        format!("{}{}", self.config.base_url, request.target())
    }
}

#[async_trait]
impl BackendClient for BackendHttpClient {
    async fn forward(&self, request: ForwardRequest) -> Result<UpstreamResponse, AppError> {
        let url = self.url(&request);
        debug!("forwarding {} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .header(header::ACCEPT, "application/json");

        if let Some(auth) = &request.authorization {
            builder = builder.header(header::AUTHORIZATION, auth);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("backend request {} {} failed: {}", request.method, url, e);
            AppError::Upstream(e)
        })?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        if !status.is_success() {
            debug!("backend answered {} for {} {}", status, request.method, url);
        }

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }

    fn org_segment(&self) -> &str {
        &self.config.org_segment
    }
}
