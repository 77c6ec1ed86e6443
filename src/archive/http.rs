use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, RequestBuilder, StatusCode};
use tracing::debug;

use super::{ArchiveError, ArchiveReceipt, ArchiveResult, Archiver};

/// Runtime configuration describing a remote blob endpoint (`PUT {base_url}/{name}`).
#[derive(Debug, Clone)]
pub struct HttpArchiveConfig {
    /// Endpoint blobs are stored under.
    pub base_url: String,
    /// Bearer token, if the endpoint needs one.
    pub token: Option<String>,
}

impl HttpArchiveConfig {
    /// Anonymous configuration for `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
        }
    }

    /// Send `token` as a bearer credential.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Uploads photos to a remote storage endpoint, probing with `HEAD` first.
#[derive(Clone)]
pub struct HttpArchiver {
    client: Client,
    base_url: Arc<str>,
    token: Option<Arc<str>>,
}

impl HttpArchiver {
    /// Build the HTTP client for `config`.
    pub fn new(config: HttpArchiveConfig) -> ArchiveResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ArchiveError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            token: config.token.map(Arc::from),
        })
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token.as_ref()),
            None => builder,
        }
    }

    fn url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name)
    }

    async fn exists(&self, name: &str) -> ArchiveResult<bool> {
        let response = self
            .authorize(self.client.head(self.url(name)))
            .send()
            .await
            .map_err(|source| ArchiveError::RequestSend {
                name: name.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(ArchiveError::RequestStatus {
                name: name.to_string(),
                status,
            }),
        }
    }

    async fn upload(&self, name: &str, bytes: Vec<u8>) -> ArchiveResult<ArchiveReceipt> {
        if self.exists(name).await? {
            return Ok(ArchiveReceipt::AlreadyPresent);
        }

        let response = self
            .authorize(self.client.put(self.url(name)))
            .header(reqwest::header::CONTENT_TYPE, "image/jpeg")
            .body(bytes)
            .send()
            .await
            .map_err(|source| ArchiveError::RequestSend {
                name: name.to_string(),
                source,
            })?;

        match response.status() {
            status if status.is_success() => {
                debug!(name, %status, "photo archived remotely");
                Ok(ArchiveReceipt::Stored)
            }
            // Lost a race with another uploader for the same name.
            StatusCode::CONFLICT | StatusCode::PRECONDITION_FAILED => {
                Ok(ArchiveReceipt::AlreadyPresent)
            }
            status => Err(ArchiveError::RequestStatus {
                name: name.to_string(),
                status,
            }),
        }
    }
}

impl Archiver for HttpArchiver {
    fn archive(&self, name: String, bytes: Vec<u8>) -> BoxFuture<'static, ArchiveResult<ArchiveReceipt>> {
        let archiver = self.clone();
        Box::pin(async move { archiver.upload(&name, bytes).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_join_base_and_name() {
        let archiver =
            HttpArchiver::new(HttpArchiveConfig::new("https://backup.example/photos/")).unwrap();
        assert_eq!(archiver.url("a.jpg"), "https://backup.example/photos/a.jpg");
    }
}
