//! [`ScriptureBackend`] over the comparison service's HTTP/JSON API.

use serde::Deserialize;

use crate::Config;
use crate::backend::{BackendFuture, ScriptureBackend};
use crate::error::FetchError;
use crate::model::{self, Book, ComparisonPayload, CompareRequest, Edition, HealthStatus};

/// Error body the service sends alongside 4xx/5xx statuses.
#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("raah/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self::with_client(client, &config.base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.url(path);
        tracing::debug!(%url, "GET");
        let resp = self.client.get(&url).send().await?;
        checked_body(resp).await
    }
}

/// Read the body, turning non-success statuses into [`FetchError::Status`].
async fn checked_body(resp: reqwest::Response) -> Result<Vec<u8>, FetchError> {
    let status = resp.status();
    let body = resp.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&body)
            .ok()
            .map(|b| b.error);
        return Err(FetchError::Status {
            code: status.as_u16(),
            message,
        });
    }
    Ok(body.to_vec())
}

impl ScriptureBackend for HttpBackend {
    fn list_editions(&self) -> BackendFuture<'_, Vec<Edition>> {
        Box::pin(async move {
            let body = self.get("versions").await?;
            Ok(model::parse_editions(&body)?)
        })
    }

    fn list_books<'a>(&'a self, edition_id: &'a str) -> BackendFuture<'a, Vec<Book>> {
        Box::pin(async move {
            let path = format!("versions/{}/books", urlencoding::encode(edition_id));
            let body = self.get(&path).await?;
            Ok(model::parse_books(&body)?)
        })
    }

    fn compare<'a>(&'a self, request: &'a CompareRequest) -> BackendFuture<'a, ComparisonPayload> {
        Box::pin(async move {
            let url = self.url("compare");
            tracing::debug!(
                %url,
                book = %request.book_id,
                chapter = request.chapter,
                editions = request.version_ids.len(),
                "POST"
            );
            let resp = self.client.post(&url).json(request).send().await?;
            let body = checked_body(resp).await?;
            Ok(model::parse_comparison(&body, request.chapter)?)
        })
    }

    fn health(&self) -> BackendFuture<'_, HealthStatus> {
        Box::pin(async move {
            let body = self.get("health").await?;
            serde_json::from_slice(&body).map_err(|e| FetchError::Malformed(e.into()))
        })
    }
}
