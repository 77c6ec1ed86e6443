//! LINE Messaging API client.

use std::sync::Arc;

use futures::future::BoxFuture;
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use tracing::debug;

use super::{ChatError, ChatMessenger, ChatResult, Profile};

/// Default host for the messaging endpoints.
pub const DEFAULT_API_BASE_URL: &str = "https://api.line.me";
/// Default host for message content downloads.
pub const DEFAULT_DATA_BASE_URL: &str = "https://api-data.line.me";

/// Runtime configuration describing how to reach the LINE platform.
#[derive(Debug, Clone)]
pub struct LineConfig {
    /// Channel access token.
    pub access_token: String,
    /// Host of the messaging endpoints.
    pub api_base_url: String,
    /// Host of the content endpoints.
    pub data_base_url: String,
}

impl LineConfig {
    /// Configuration against the public LINE hosts.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            data_base_url: DEFAULT_DATA_BASE_URL.into(),
        }
    }

    /// Point every endpoint at `base_url`, e.g. a local mock of the platform.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.api_base_url = base_url.clone();
        self.data_base_url = base_url;
        self
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReplyBody<'a> {
    reply_token: &'a str,
    messages: [TextMessage<'a>; 1],
}

#[derive(Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Clone)]
/// [`ChatMessenger`] over the LINE Messaging REST API.
pub struct LineMessenger {
    client: Client,
    access_token: Arc<str>,
    api_base_url: Arc<str>,
    data_base_url: Arc<str>,
}

impl LineMessenger {
    /// Build the HTTP client for `config`.
    pub fn new(config: LineConfig) -> ChatResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|source| ChatError::ClientBuilder { source })?;

        Ok(Self {
            client,
            access_token: Arc::from(config.access_token),
            api_base_url: Arc::from(config.api_base_url.trim_end_matches('/')),
            data_base_url: Arc::from(config.data_base_url.trim_end_matches('/')),
        })
    }

    fn request(&self, method: Method, base: &str, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{base}{path}"))
            .bearer_auth(self.access_token.as_ref())
    }

    async fn send(&self, path: &str, builder: RequestBuilder) -> ChatResult<reqwest::Response> {
        let response = builder
            .send()
            .await
            .map_err(|source| ChatError::RequestSend {
                path: path.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChatError::RequestStatus {
                path: path.to_string(),
                status,
            });
        }
        Ok(response)
    }

    async fn reply(&self, reply_token: &str, text: &str) -> ChatResult<()> {
        let path = "/v2/bot/message/reply";
        let body = ReplyBody {
            reply_token,
            messages: [TextMessage { kind: "text", text }],
        };
        let builder = self
            .request(Method::POST, &self.api_base_url, path)
            .json(&body);
        self.send(path, builder).await?;
        debug!(reply_token, "reply sent");
        Ok(())
    }

    async fn content(&self, message_id: &str) -> ChatResult<Vec<u8>> {
        let path = format!("/v2/bot/message/{message_id}/content");
        let builder = self.request(Method::GET, &self.data_base_url, &path);
        let response = self.send(&path, builder).await?;
        let bytes = response
            .bytes()
            .await
            .map_err(|source| ChatError::DecodeResponse { path, source })?;
        Ok(bytes.to_vec())
    }

    async fn profile(&self, user_id: &str) -> ChatResult<Profile> {
        let path = format!("/v2/bot/profile/{user_id}");
        let builder = self.request(Method::GET, &self.api_base_url, &path);
        let response = self.send(&path, builder).await?;
        response
            .json::<Profile>()
            .await
            .map_err(|source| ChatError::DecodeResponse { path, source })
    }
}

impl ChatMessenger for LineMessenger {
    fn reply_text(&self, reply_token: String, text: String) -> BoxFuture<'static, ChatResult<()>> {
        let messenger = self.clone();
        Box::pin(async move { messenger.reply(&reply_token, &text).await })
    }

    fn fetch_content(&self, message_id: String) -> BoxFuture<'static, ChatResult<Vec<u8>>> {
        let messenger = self.clone();
        Box::pin(async move { messenger.content(&message_id).await })
    }

    fn get_profile(&self, user_id: String) -> BoxFuture<'static, ChatResult<Profile>> {
        let messenger = self.clone();
        Box::pin(async move { messenger.profile(&user_id).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reply_body_matches_platform_shape() {
        let body = ReplyBody {
            reply_token: "r1",
            messages: [TextMessage {
                kind: "text",
                text: "hello",
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"replyToken": "r1", "messages": [{"type": "text", "text": "hello"}]})
        );
    }

    #[test]
    fn base_url_override_applies_to_both_hosts() {
        let config = LineConfig::new("token").with_base_url("http://127.0.0.1:9000/");
        let messenger = LineMessenger::new(config).unwrap();
        assert_eq!(&*messenger.api_base_url, "http://127.0.0.1:9000");
        assert_eq!(&*messenger.data_base_url, "http://127.0.0.1:9000");
    }
}
