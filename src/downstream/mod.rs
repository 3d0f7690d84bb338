use std::error::Error as _;
use std::time::Duration;

use anyhow::Context;
use axum::{
    body::Bytes,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use reqwest::Url;
use tracing::debug;

use crate::error::AppResult;
use crate::models::{ProductRecord, SubmitOutcome};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// A downstream response relayed to our caller unchanged.
#[derive(Debug)]
pub struct Forwarded {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: Bytes,
}

impl Forwarded {
    async fn read(response: reqwest::Response) -> AppResult<Self> {
        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        let body = response.bytes().await?;
        Ok(Self {
            status,
            content_type,
            body,
        })
    }
}

impl IntoResponse for Forwarded {
    fn into_response(self) -> Response {
        let mut response = (self.status, self.body).into_response();
        if let Some(content_type) = self.content_type {
            response
                .headers_mut()
                .insert(header::CONTENT_TYPE, content_type);
        }
        response
    }
}

/// HTTP client for the downstream product store. Cheap to clone.
#[derive(Debug, Clone)]
pub struct DownstreamClient {
    client: reqwest::Client,
    products_url: Url,
}

impl DownstreamClient {
    pub fn new(base_url: &str, products_path: &str, timeout: Duration) -> anyhow::Result<Self> {
        let products_url = Url::parse(&format!("{}{}", base_url, products_path))
            .with_context(|| format!("invalid downstream URL {}{}", base_url, products_path))?;
        if products_url.cannot_be_a_base() {
            anyhow::bail!("downstream URL {} cannot carry a path", products_url);
        }

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .context("failed to build downstream HTTP client")?;

        Ok(Self {
            client,
            products_url,
        })
    }

    pub fn products_url(&self) -> &Url {
        &self.products_url
    }

    fn product_url(&self, id: &str) -> Url {
        let mut url = self.products_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    pub async fn list_products(&self) -> AppResult<Forwarded> {
        let response = self.client.get(self.products_url.clone()).send().await?;
        Forwarded::read(response).await
    }

    pub async fn get_product(&self, id: &str) -> AppResult<Forwarded> {
        let response = self.client.get(self.product_url(id)).send().await?;
        Forwarded::read(response).await
    }

    pub async fn delete_product(&self, id: &str) -> AppResult<Forwarded> {
        let response = self.client.delete(self.product_url(id)).send().await?;
        Forwarded::read(response).await
    }

    pub async fn create_product(&self, record: &ProductRecord) -> AppResult<Forwarded> {
        let response = self
            .client
            .post(self.products_url.clone())
            .json(record)
            .send()
            .await?;
        Forwarded::read(response).await
    }

    /// Create one record and fold every outcome into a [`SubmitOutcome`].
    /// Never fails: transport errors become an unsuccessful outcome.
    pub async fn submit(&self, record: &ProductRecord) -> SubmitOutcome {
        let response = match self
            .client
            .post(self.products_url.clone())
            .json(record)
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => return SubmitOutcome::transport(describe(&err)),
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => return SubmitOutcome::transport(describe(&err)),
        };

        debug!(sl_no = record.serial_number, status = status.as_u16(), "Downstream create");

        if status == StatusCode::CREATED {
            let data = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
            SubmitOutcome::created(data)
        } else {
            SubmitOutcome::rejected(status.as_u16(), body)
        }
    }
}

/// reqwest's Display stops at the top-level error; include the causes.
fn describe(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
