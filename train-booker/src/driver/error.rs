//! Driver error types.

use std::fmt;

use crate::webdriver::WebDriverError;

/// Permanent or unexpected failures from an automation driver.
///
/// Transient conditions (a stale row, an intercepted click) are not errors;
/// drivers report them through `RowObservation` and `ActivationResult`.
#[derive(Debug)]
pub enum DriverError {
    /// Login was refused
    Authentication(String),

    /// The browser session failed
    WebDriver(WebDriverError),

    /// The page is not in a state the driver understands
    UnexpectedPage(String),

    /// A scripted driver could not load its script
    Script(String),
}

impl fmt::Display for DriverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverError::Authentication(msg) => write!(f, "authentication failed: {msg}"),
            DriverError::WebDriver(e) => write!(f, "browser error: {e}"),
            DriverError::UnexpectedPage(msg) => write!(f, "unexpected page: {msg}"),
            DriverError::Script(msg) => write!(f, "script error: {msg}"),
        }
    }
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DriverError::WebDriver(e) => Some(e),
            _ => None,
        }
    }
}

impl From<WebDriverError> for DriverError {
    fn from(err: WebDriverError) -> Self {
        DriverError::WebDriver(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DriverError::Authentication("welcome banner missing".into());
        assert_eq!(
            err.to_string(),
            "authentication failed: welcome banner missing"
        );

        let err = DriverError::from(WebDriverError::Command {
            code: "invalid session id".into(),
            message: "closed".into(),
        });
        assert_eq!(err.to_string(), "browser error: invalid session id: closed");
        assert!(std::error::Error::source(&err).is_some());

        let err = DriverError::Script("no passes".into());
        assert_eq!(err.to_string(), "script error: no passes");
    }
}
