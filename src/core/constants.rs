//! Shared constants used across the crate

use std::time::Duration;

/// Path of the chat endpoint relative to the proxy base URL.
pub const AI_CHAT_ENDPOINT: &str = "functions/v1/ai-chat";

/// Number of attempts a chat call makes before giving up.
pub const CHAT_RETRY_ATTEMPTS: u32 = 3;

/// Base delay between chat attempts. The wait before retrying attempt N is
/// this delay doubled N-1 times; backoff is deterministic, no jitter.
pub const CHAT_RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);
