use std::time::Duration;

use thiserror::Error;

/// Everything that can go wrong between the terminal and the calendar api
#[derive(Debug, Error)]
pub enum Error {
    /// The stored token is missing or could not be refreshed, or the initial
    /// authorization did not complete
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Any failure reported while listing or inserting events
    #[error("Calendar request failed: {0}")]
    Remote(String),

    #[error("Calendar request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Event {id} has neither a date nor a date-time for its {field}")]
    MalformedEvent { id: String, field: &'static str },

    /// Text that is not an api date (`2024-05-01`) or date-time (`2024-05-01T09:00:00`)
    #[error("`{0}` is not a date or date-time")]
    InvalidEventTime(String),

    /// Input from the add-event form that cannot become an event
    #[error("{0}")]
    InvalidForm(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short heading for the message popup
    pub fn title(&self) -> &'static str {
        match self {
            Error::Auth(_) => "Authentication error",
            Error::Remote(_) | Error::Timeout(_) | Error::MalformedEvent { .. } => "Calendar error",
            Error::InvalidEventTime(_) => "Invalid date",
            Error::InvalidForm(_) => "Invalid event",
            Error::Config(_) => "Configuration error",
            Error::Io(_) => "Error",
        }
    }
}

impl From<google_calendar3::Error> for Error {
    fn from(err: google_calendar3::Error) -> Self {
        match err {
            google_calendar3::Error::MissingToken(e) => Error::Auth(e.to_string()),
            // a revoked or expired grant comes back as a 401 body rather than a token failure
            google_calendar3::Error::BadRequest(body) if body.pointer("/error/code").and_then(serde_json::Value::as_i64) == Some(401) => {
                Error::Auth(server_message(&body))
            }
            google_calendar3::Error::BadRequest(body) => Error::Remote(server_message(&body)),
            other => Error::Remote(other.to_string()),
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// The api wraps failures as `{"error": {"code": .., "message": ..}}`, fall back to the raw body
fn server_message(body: &serde_json::Value) -> String {
    body.pointer("/error/message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bad_request_uses_the_server_message() {
        let body = json!({ "error": { "code": 400, "message": "The specified time range is empty." } });
        let err = Error::from(google_calendar3::Error::BadRequest(body));

        assert!(matches!(&err, Error::Remote(msg) if msg == "The specified time range is empty."));
        assert_eq!(err.title(), "Calendar error");
    }

    #[test]
    fn bad_request_without_message_keeps_the_body() {
        let err = Error::from(google_calendar3::Error::BadRequest(json!({ "oops": true })));

        assert!(matches!(err, Error::Remote(msg) if msg.contains("oops")));
    }

    #[test]
    fn unauthorized_body_is_an_auth_error() {
        let body = json!({ "error": { "code": 401, "message": "Invalid Credentials" } });
        let err = Error::from(google_calendar3::Error::BadRequest(body));

        assert!(matches!(&err, Error::Auth(msg) if msg == "Invalid Credentials"));
        assert_eq!(err.title(), "Authentication error");
    }

    #[test]
    fn missing_token_is_an_auth_error() {
        let err = Error::from(google_calendar3::Error::MissingToken("re-authorization required".into()));

        assert!(matches!(&err, Error::Auth(msg) if msg == "re-authorization required"));
    }

    #[test]
    fn timeout_reports_seconds() {
        let err = Error::Timeout(Duration::from_secs(30));
        assert_eq!(err.to_string(), "Calendar request timed out after 30s");
    }
}
