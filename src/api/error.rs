//! Chat client errors
//!
//! Failure kinds are kept apart so callers can tell a deliberate
//! cancellation from a transport fault or a remote refusal without matching
//! on message strings.

use std::error::Error;
use std::fmt;

/// Failures surfaced by [`crate::api::ChatClient`] operations.
#[derive(Debug)]
pub enum ChatError {
    /// Network-level failure reaching the proxy, including body decode
    /// failures on an otherwise successful response.
    Transport(reqwest::Error),
    /// The proxy answered with a non-success status. `message` is already
    /// human-readable (see [`format_remote_error`]).
    Remote { status: u16, message: String },
    /// The caller's cancellation token fired.
    Cancelled,
    /// The retry loop finished without producing a result. Only reachable
    /// when the loop is asked for zero attempts.
    RetriesExhausted,
}

impl ChatError {
    /// True when the failure was a deliberate caller cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ChatError::Cancelled)
    }
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::Transport(err) => write!(f, "{err}"),
            ChatError::Remote { message, .. } => write!(f, "{message}"),
            ChatError::Cancelled => write!(f, "Request was cancelled"),
            ChatError::RetriesExhausted => {
                write!(f, "Failed to invoke AI chat after multiple retries")
            }
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChatError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        ChatError::Transport(err)
    }
}

impl From<std::convert::Infallible> for ChatError {
    fn from(err: std::convert::Infallible) -> Self {
        match err {}
    }
}

/// Human-readable message for a non-success proxy response.
///
/// Preference order: the JSON `error` field with provider context, a generic
/// unknown-error line when the body is JSON without a usable `error`, the raw
/// body when it is not JSON, and a bare status line when the body is empty.
pub fn format_remote_error(provider: &str, status: u16, body: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(parsed) => match parsed
            .get("error")
            .and_then(|e| e.as_str())
            .filter(|e| !e.is_empty())
        {
            Some(error) => format!("Error from {provider}: {error}"),
            None => "An unknown error occurred in the chat proxy.".to_string(),
        },
        Err(_) => {
            let raw = body.trim();
            if raw.is_empty() {
                format!("Chat proxy returned an error: {status}")
            } else {
                raw.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_prefers_json_error_field() {
        let message = format_remote_error("OpenAI", 429, r#"{"error":"rate limited"}"#);
        assert_eq!(message, "Error from OpenAI: rate limited");
    }

    #[test]
    fn json_without_error_field_reads_as_unknown() {
        let message = format_remote_error("OpenAI", 500, r#"{"detail":"oops"}"#);
        assert_eq!(message, "An unknown error occurred in the chat proxy.");
    }

    #[test]
    fn empty_json_error_field_reads_as_unknown() {
        let message = format_remote_error("OpenAI", 500, r#"{"error":""}"#);
        assert_eq!(message, "An unknown error occurred in the chat proxy.");
    }

    #[test]
    fn non_json_body_passes_through() {
        let message = format_remote_error("OpenAI", 502, "Bad Gateway");
        assert_eq!(message, "Bad Gateway");
    }

    #[test]
    fn empty_body_falls_back_to_status_line() {
        let message = format_remote_error("OpenAI", 503, "");
        assert_eq!(message, "Chat proxy returned an error: 503");

        let whitespace = format_remote_error("OpenAI", 503, "  \n");
        assert_eq!(whitespace, "Chat proxy returned an error: 503");
    }

    #[test]
    fn cancellation_is_distinguishable() {
        assert!(ChatError::Cancelled.is_cancelled());
        assert!(!ChatError::RetriesExhausted.is_cancelled());
        assert!(!ChatError::Remote {
            status: 500,
            message: "boom".into()
        }
        .is_cancelled());
    }

    #[test]
    fn display_messages_are_stable() {
        assert_eq!(ChatError::Cancelled.to_string(), "Request was cancelled");
        assert_eq!(
            ChatError::RetriesExhausted.to_string(),
            "Failed to invoke AI chat after multiple retries"
        );
        let remote = ChatError::Remote {
            status: 429,
            message: "Error from OpenAI: rate limited".into(),
        };
        assert_eq!(remote.to_string(), "Error from OpenAI: rate limited");
    }
}
