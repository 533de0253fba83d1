//! Telegram Bot API message sink.

use serde::{Deserialize, Serialize};

use super::error::NotifyError;

/// Default base URL for the Telegram Bot API.
const DEFAULT_BASE_URL: &str = "https://api.telegram.org";

/// Sends a text message somewhere a person will see it.
#[allow(async_fn_in_trait)]
pub trait MessageSink {
    async fn send(&self, text: &str) -> Result<(), NotifyError>;
}

/// Configuration for the Telegram sink.
#[derive(Clone, PartialEq, Eq)]
pub struct TelegramConfig {
    /// Bot token from BotFather
    pub token: String,
    /// Chat to post into
    pub chat_id: String,
    /// Base URL for the API (defaults to Telegram)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl TelegramConfig {
    /// Create a new config for a bot and chat.
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            chat_id: chat_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
}

/// Bot API response envelope.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Posts messages through a Telegram bot.
#[derive(Debug, Clone)]
pub struct TelegramSink {
    http: reqwest::Client,
    url: String,
    chat_id: String,
}

impl TelegramSink {
    /// Create a new sink.
    pub fn new(config: TelegramConfig) -> Result<Self, NotifyError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: send_message_url(&config.base_url, &config.token),
            chat_id: config.chat_id,
        })
    }
}

impl MessageSink for TelegramSink {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .json(&SendMessage {
                chat_id: &self.chat_id,
                text,
            })
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        check_response(status.as_u16(), &body)
    }
}

fn send_message_url(base_url: &str, token: &str) -> String {
    format!("{}/bot{}/sendMessage", base_url.trim_end_matches('/'), token)
}

/// Turn a Bot API reply into a result.
fn check_response(status: u16, body: &str) -> Result<(), NotifyError> {
    match serde_json::from_str::<ApiResponse>(body) {
        Ok(reply) if reply.ok && (200..300).contains(&status) => Ok(()),
        Ok(reply) => Err(NotifyError::Api {
            status,
            message: reply
                .description
                .unwrap_or_else(|| "request not ok".to_string()),
        }),
        Err(_) => Err(NotifyError::Api {
            status,
            message: body.chars().take(500).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = TelegramConfig::new("123:abc", "42");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 10);
    }

    #[test]
    fn debug_hides_token() {
        let config = TelegramConfig::new("123:secret", "42");
        assert!(!format!("{:?}", config).contains("secret"));
    }

    #[test]
    fn url_includes_token() {
        assert_eq!(
            send_message_url("https://api.telegram.org/", "123:abc"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn sink_creation() {
        let config = TelegramConfig::new("123:abc", "42").with_base_url("http://localhost:1");
        assert!(TelegramSink::new(config).is_ok());
    }

    #[test]
    fn ok_response_accepted() {
        assert!(check_response(200, r#"{"ok": true, "result": {}}"#).is_ok());
    }

    #[test]
    fn error_response_carries_description() {
        let err = check_response(400, r#"{"ok": false, "description": "chat not found"}"#)
            .unwrap_err();
        assert_eq!(err.to_string(), "message API error 400: chat not found");
    }

    #[test]
    fn garbage_response_rejected() {
        let err = check_response(502, "<html>Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, NotifyError::Api { status: 502, .. }));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        // Port 9 (discard) on localhost is almost never listening
        let sink = TelegramSink::new(
            TelegramConfig::new("123:abc", "42").with_base_url("http://127.0.0.1:9"),
        )
        .unwrap();
        let err = sink.send("hello").await.unwrap_err();
        assert!(matches!(err, NotifyError::Http(_)));
    }
}
