use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Method, Url};
use serde_json::Value;

use crate::api::{ApiError, ApiRequest, HttpMethod};
use crate::config::ApiConfig;
use crate::transport::envelope::unwrap_envelope;
use crate::transport::Transport;

/// reqwest-backed [`Transport`] talking JSON to the backend.
pub struct HttpTransport {
    client: Client,
    base_url: String,
    request_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> Result<Self, reqwest::Error> {
        let request_timeout = Duration::from_secs(u64::from(config.timeout_seconds));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(u64::from(config.connect_timeout_seconds)))
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            request_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, request: &ApiRequest) -> Result<Url, ApiError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ApiError::network(format!("Invalid base URL '{}': {}", self.base_url, e))
        })?;
        url.path_segments_mut()
            .map_err(|()| {
                ApiError::network(format!("Base URL '{}' cannot carry a path", self.base_url))
            })?
            .pop_if_empty()
            .extend(&request.segments);

        if !request.params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &request.params {
                pairs.append_pair(name, value);
            }
        }
        Ok(url)
    }

    fn classify(&self, err: reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::network(format!(
                "Request timed out after {}s",
                self.request_timeout.as_secs()
            ))
        } else {
            ApiError::network(err.to_string())
        }
    }
}

fn method_of(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest, token: Option<String>) -> Result<Value, ApiError> {
        let url = self.url_for(&request)?;
        tracing::debug!(method = request.method.as_str(), url = %url, "Sending API request");

        let mut builder = self
            .client
            .request(method_of(request.method), url)
            .header(ACCEPT, "application/json");

        if let Some(token) = token {
            builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| self.classify(e))?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.classify(e))?;

        tracing::debug!(status, bytes = body.len(), path = %request.path(), "API response received");
        unwrap_envelope(status, &body)
    }
}
