//! W3C WebDriver HTTP client.
//!
//! Talks to a running chromedriver (or any W3C-compliant driver) over its
//! JSON wire protocol. Only the handful of commands the booker needs are
//! implemented.

use std::time::Duration;

use reqwest::Method;
use serde_json::{Value, json};

use super::error::WebDriverError;

/// Default chromedriver address.
const DEFAULT_BASE_URL: &str = "http://localhost:9515";

/// JSON key that marks a web element reference.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// The Enter key, as understood by "Element Send Keys".
pub const ENTER: &str = "\u{E007}";

/// Configuration for a WebDriver session.
#[derive(Debug, Clone)]
pub struct WebDriverConfig {
    /// Base URL of the driver process
    pub base_url: String,
    /// Run the browser without a window
    pub headless: bool,
    /// HTTP timeout per command, in seconds
    pub timeout_secs: u64,
    /// How long element lookups poll before failing
    pub implicit_wait: Duration,
}

impl WebDriverConfig {
    /// Create a config pointing at a local chromedriver.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headless: false,
            timeout_secs: 60,
            implicit_wait: Duration::from_secs(5),
        }
    }

    /// Set a custom driver URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Run headless.
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the implicit element wait.
    pub fn with_implicit_wait(mut self, wait: Duration) -> Self {
        self.implicit_wait = wait;
        self
    }

    fn capabilities(&self) -> Value {
        let mut args = vec!["--window-size=1280,1024"];
        if self.headless {
            args.push("--headless=new");
        }
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    "goog:chromeOptions": { "args": args }
                }
            }
        })
    }
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How to find an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Css(String),
    XPath(String),
    Id(String),
    Name(String),
}

impl Locator {
    pub fn css(s: impl Into<String>) -> Self {
        Locator::Css(s.into())
    }

    pub fn xpath(s: impl Into<String>) -> Self {
        Locator::XPath(s.into())
    }

    pub fn id(s: impl Into<String>) -> Self {
        Locator::Id(s.into())
    }

    pub fn name(s: impl Into<String>) -> Self {
        Locator::Name(s.into())
    }

    /// The W3C location strategy and selector for this locator.
    ///
    /// W3C dropped the id and name strategies, so both become CSS.
    fn to_query(&self) -> Value {
        let (using, value) = match self {
            Locator::Css(s) => ("css selector", s.clone()),
            Locator::XPath(s) => ("xpath", s.clone()),
            Locator::Id(s) => ("css selector", format!("[id=\"{s}\"]")),
            Locator::Name(s) => ("css selector", format!("[name=\"{s}\"]")),
        };
        json!({ "using": using, "value": value })
    }
}

/// Opaque handle to an element in the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRef(String);

impl ElementRef {
    /// The element as a script argument.
    pub fn to_json(&self) -> Value {
        json!({ ELEMENT_KEY: self.0 })
    }

    fn from_json(value: &Value) -> Result<Self, WebDriverError> {
        value
            .get(ELEMENT_KEY)
            .and_then(Value::as_str)
            .map(|id| ElementRef(id.to_string()))
            .ok_or_else(|| WebDriverError::Json {
                message: format!("expected element reference, got {value}"),
            })
    }
}

/// A live browser session.
#[derive(Debug)]
pub struct WebDriverSession {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl WebDriverSession {
    /// Launch a browser and open a session.
    pub async fn start(config: &WebDriverConfig) -> Result<Self, WebDriverError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let url = format!("{}/session", config.base_url);
        let value = send(&http, Method::POST, &url, config.capabilities()).await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| WebDriverError::Json {
                message: "new session response has no sessionId".to_string(),
            })?
            .to_string();

        let session = Self {
            http,
            base_url: config.base_url.clone(),
            session_id,
        };
        session.set_implicit_wait(config.implicit_wait).await?;
        Ok(session)
    }

    /// Navigate to a URL.
    pub async fn goto(&self, url: &str) -> Result<(), WebDriverError> {
        self.post("/url", json!({ "url": url })).await.map(drop)
    }

    /// Go back one history entry.
    pub async fn back(&self) -> Result<(), WebDriverError> {
        self.post("/back", json!({})).await.map(drop)
    }

    /// Set how long element lookups poll before failing.
    pub async fn set_implicit_wait(&self, wait: Duration) -> Result<(), WebDriverError> {
        let millis = u64::try_from(wait.as_millis()).unwrap_or(u64::MAX);
        self.post("/timeouts", json!({ "implicit": millis }))
            .await
            .map(drop)
    }

    /// Find the first element matching a locator.
    pub async fn find(&self, locator: &Locator) -> Result<ElementRef, WebDriverError> {
        let value = self.post("/element", locator.to_query()).await?;
        ElementRef::from_json(&value)
    }

    /// Find every element matching a locator. An empty result is not an error.
    pub async fn find_all(&self, locator: &Locator) -> Result<Vec<ElementRef>, WebDriverError> {
        let value = self.post("/elements", locator.to_query()).await?;
        value
            .as_array()
            .ok_or_else(|| WebDriverError::Json {
                message: format!("expected element list, got {value}"),
            })?
            .iter()
            .map(ElementRef::from_json)
            .collect()
    }

    /// Rendered text of an element.
    pub async fn text(&self, element: &ElementRef) -> Result<String, WebDriverError> {
        let value = self.get(&format!("/element/{}/text", element.0)).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Click an element.
    pub async fn click(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.post(&format!("/element/{}/click", element.0), json!({}))
            .await
            .map(drop)
    }

    /// Clear a text input.
    pub async fn clear(&self, element: &ElementRef) -> Result<(), WebDriverError> {
        self.post(&format!("/element/{}/clear", element.0), json!({}))
            .await
            .map(drop)
    }

    /// Type into an element.
    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<(), WebDriverError> {
        self.post(
            &format!("/element/{}/value", element.0),
            json!({ "text": text }),
        )
        .await
        .map(drop)
    }

    /// Run a synchronous script in the page.
    pub async fn execute(&self, script: &str, args: Vec<Value>) -> Result<Value, WebDriverError> {
        self.post("/execute/sync", json!({ "script": script, "args": args }))
            .await
    }

    /// Close the browser and end the session.
    pub async fn quit(self) -> Result<(), WebDriverError> {
        let url = format!("{}/session/{}", self.base_url, self.session_id);
        send(&self.http, Method::DELETE, &url, Value::Null)
            .await
            .map(drop)
    }

    async fn get(&self, path: &str) -> Result<Value, WebDriverError> {
        send(&self.http, Method::GET, &self.url(path), Value::Null).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, WebDriverError> {
        send(&self.http, Method::POST, &self.url(path), body).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/session/{}{}", self.base_url, self.session_id, path)
    }
}

/// Send one command and unwrap the `value` envelope.
async fn send(
    http: &reqwest::Client,
    method: Method,
    url: &str,
    body: Value,
) -> Result<Value, WebDriverError> {
    let mut request = http.request(method, url);
    if !body.is_null() {
        request = request.json(&body);
    }

    let response = request.send().await?;
    let ok = response.status().is_success();
    let body = response.text().await?;

    parse_response(ok, &body)
}

/// Unwrap a response body, turning W3C error payloads into errors.
fn parse_response(ok: bool, body: &str) -> Result<Value, WebDriverError> {
    let envelope: Value = serde_json::from_str(body).map_err(|e| WebDriverError::Json {
        message: format!(
            "{e} (body: {})",
            body.chars().take(500).collect::<String>()
        ),
    })?;

    let value = envelope.get("value").cloned().unwrap_or(Value::Null);

    if let Some(code) = value.get("error").and_then(Value::as_str) {
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(WebDriverError::Command {
            code: code.to_string(),
            message: message.to_string(),
        });
    }

    if !ok {
        return Err(WebDriverError::Command {
            code: "unknown error".to_string(),
            message: body.chars().take(500).collect(),
        });
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = WebDriverConfig::new()
            .with_base_url("http://localhost:4444")
            .with_headless(true)
            .with_implicit_wait(Duration::from_secs(10));

        assert_eq!(config.base_url, "http://localhost:4444");
        assert!(config.headless);
        assert_eq!(config.implicit_wait, Duration::from_secs(10));
    }

    #[test]
    fn config_defaults() {
        let config = WebDriverConfig::default();

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(!config.headless);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn headless_adds_argument() {
        let caps = WebDriverConfig::new().with_headless(true).capabilities();
        let args = &caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"];
        assert!(
            args.as_array()
                .unwrap()
                .iter()
                .any(|a| a == "--headless=new")
        );
    }

    #[test]
    fn locator_queries() {
        assert_eq!(
            Locator::id("dptDt").to_query(),
            json!({ "using": "css selector", "value": "[id=\"dptDt\"]" })
        );
        assert_eq!(
            Locator::name("psgInfoPerPrnb1").to_query(),
            json!({ "using": "css selector", "value": "[name=\"psgInfoPerPrnb1\"]" })
        );
        assert_eq!(
            Locator::xpath("//input").to_query(),
            json!({ "using": "xpath", "value": "//input" })
        );
    }

    #[test]
    fn element_reference_roundtrip() {
        let value = json!({ ELEMENT_KEY: "abc-123" });
        let element = ElementRef::from_json(&value).unwrap();
        assert_eq!(element, ElementRef("abc-123".into()));
        assert_eq!(element.to_json(), value);

        assert!(ElementRef::from_json(&json!({ "other": 1 })).is_err());
    }

    #[test]
    fn parse_success_value() {
        let value = parse_response(true, r#"{"value": "hello"}"#).unwrap();
        assert_eq!(value, json!("hello"));

        let value = parse_response(true, r#"{"value": null}"#).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn parse_command_error() {
        let body = r#"{"value": {"error": "stale element reference", "message": "gone", "stacktrace": ""}}"#;
        let err = parse_response(false, body).unwrap_err();
        assert!(err.is_stale());
        assert_eq!(err.to_string(), "stale element reference: gone");
    }

    #[test]
    fn parse_failure_without_code() {
        let err = parse_response(false, r#"{"value": {}}"#).unwrap_err();
        assert_eq!(err.code(), Some("unknown error"));
    }

    #[test]
    fn parse_invalid_json() {
        let err = parse_response(true, "<html>").unwrap_err();
        assert!(matches!(err, WebDriverError::Json { .. }));
    }
}
