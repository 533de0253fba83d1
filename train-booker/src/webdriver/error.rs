//! WebDriver client error types.

/// W3C error code for an element that left the DOM after being located.
pub const STALE_ELEMENT: &str = "stale element reference";

/// W3C error code for a click that landed on a different element.
pub const CLICK_INTERCEPTED: &str = "element click intercepted";

/// W3C error code for a locator that matched nothing.
pub const NO_SUCH_ELEMENT: &str = "no such element";

/// Errors from the WebDriver HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum WebDriverError {
    /// HTTP request failed (driver not running, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body was not the expected JSON shape
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The driver rejected the command
    #[error("{code}: {message}")]
    Command { code: String, message: String },
}

impl WebDriverError {
    /// The W3C error code, if the driver returned one.
    pub fn code(&self) -> Option<&str> {
        match self {
            WebDriverError::Command { code, .. } => Some(code),
            _ => None,
        }
    }

    /// True if the element went stale between lookup and use.
    pub fn is_stale(&self) -> bool {
        self.code() == Some(STALE_ELEMENT)
    }

    /// True if another element received the click.
    pub fn is_click_intercepted(&self) -> bool {
        self.code() == Some(CLICK_INTERCEPTED)
    }

    /// True if the locator matched nothing.
    pub fn is_no_such_element(&self) -> bool {
        self.code() == Some(NO_SUCH_ELEMENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(code: &str) -> WebDriverError {
        WebDriverError::Command {
            code: code.into(),
            message: "details".into(),
        }
    }

    #[test]
    fn classifies_codes() {
        assert!(command(STALE_ELEMENT).is_stale());
        assert!(command(CLICK_INTERCEPTED).is_click_intercepted());
        assert!(command(NO_SUCH_ELEMENT).is_no_such_element());
        assert!(!command("invalid session id").is_stale());

        let err = WebDriverError::Json {
            message: "missing value".into(),
        };
        assert_eq!(err.code(), None);
    }

    #[test]
    fn error_display() {
        assert_eq!(
            command(STALE_ELEMENT).to_string(),
            "stale element reference: details"
        );
    }
}
