//! Chat proxy client
//!
//! [`ChatClient`] issues authenticated calls against a single proxy
//! endpoint. Buffered calls return a [`NormalizedResponse`]; streaming calls
//! relay opaque text chunks to a callback as they arrive. Transient failures
//! are retried with deterministic exponential backoff, and the caller's
//! [`CancellationToken`] is honored at every suspension point.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::error::{format_remote_error, ChatError};
use crate::api::stream::relay_text_chunks;
use crate::api::{ChatMessage, ChatRequest, NormalizedResponse};
use crate::auth::{ApiKeyStore, NoKeyStore, NoSession, SessionSource};
use crate::core::config::ProxyConfig;
use crate::core::constants::{AI_CHAT_ENDPOINT, CHAT_RETRY_ATTEMPTS, CHAT_RETRY_BASE_DELAY};
use crate::utils::auth::add_proxy_headers;
use crate::utils::url::construct_api_url;

/// Client for the AI chat proxy.
///
/// Collaborators are swappable: the session source decides which bearer
/// token outgoing calls carry, and the key store backs
/// [`available_providers`](Self::available_providers). The defaults are
/// anonymous access and an empty store.
pub struct ChatClient {
    http: reqwest::Client,
    config: ProxyConfig,
    session: Arc<dyn SessionSource>,
    keys: Arc<dyn ApiKeyStore>,
}

impl ChatClient {
    pub fn new(config: ProxyConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            session: Arc::new(NoSession),
            keys: Arc::new(NoKeyStore),
        }
    }

    pub fn with_session_source(mut self, session: Arc<dyn SessionSource>) -> Self {
        self.session = session;
        self
    }

    pub fn with_key_store(mut self, keys: Arc<dyn ApiKeyStore>) -> Self {
        self.keys = keys;
        self
    }

    /// Share a preconfigured HTTP client instead of the default one.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Buffered chat call. Forces non-streaming mode and decodes the
    /// proxy's normalized JSON body.
    pub async fn send_chat_message(
        &self,
        mut request: ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<NormalizedResponse, ChatError> {
        request.stream = Some(false);
        let response = self.invoke_with_retry(&request, cancel).await?;
        response
            .json::<NormalizedResponse>()
            .await
            .map_err(ChatError::Transport)
    }

    /// Streaming chat call.
    ///
    /// `on_delta` fires synchronously per received chunk, in arrival order.
    /// Every failure, cancellation included, reaches the caller through
    /// `on_error`; nothing propagates past this boundary.
    pub async fn stream_chat_message<D, E>(
        &self,
        request: ChatRequest,
        mut on_delta: D,
        on_error: E,
        cancel: &CancellationToken,
    ) where
        D: FnMut(&str),
        E: FnOnce(ChatError),
    {
        if let Err(err) = self.stream_inner(request, &mut on_delta, cancel).await {
            tracing::error!(error = %err, "chat stream failed");
            on_error(err);
        }
    }

    async fn stream_inner(
        &self,
        mut request: ChatRequest,
        on_delta: &mut dyn FnMut(&str),
        cancel: &CancellationToken,
    ) -> Result<(), ChatError> {
        request.stream = Some(true);
        let response = self.invoke_with_retry(&request, cancel).await?;
        relay_text_chunks(response.bytes_stream(), cancel, on_delta).await
    }

    /// Build a one-shot request and return just the assistant text.
    pub async fn generate_ai_response(
        &self,
        messages: Vec<ChatMessage>,
        provider: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<String, ChatError> {
        let mut request = ChatRequest::new(provider, messages);
        request.model = Some(model.into());
        request.api_key = api_key;

        // One-shot calls expose no cancel surface; a fresh token never fires.
        let cancel = CancellationToken::new();
        let response = self.send_chat_message(request, &cancel).await?;
        Ok(response.content)
    }

    /// Distinct provider names with stored API keys, first-seen order.
    ///
    /// A store failure is logged and reported as an empty list rather than
    /// an error, so callers can always render a provider picker.
    pub async fn available_providers(&self) -> Vec<String> {
        match self.keys.provider_names().await {
            Ok(names) => {
                let mut seen = HashSet::new();
                names
                    .into_iter()
                    .filter(|name| seen.insert(name.clone()))
                    .collect()
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to list providers with stored keys");
                Vec::new()
            }
        }
    }

    async fn invoke_with_retry(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ChatError> {
        retry_with_backoff(
            || self.invoke(request, cancel),
            cancel,
            CHAT_RETRY_ATTEMPTS,
            CHAT_RETRY_BASE_DELAY,
        )
        .await
    }

    /// Single attempt: resolve the session, build headers, POST, check the
    /// status. Races the whole attempt against the cancellation token.
    async fn invoke(
        &self,
        request: &ChatRequest,
        cancel: &CancellationToken,
    ) -> Result<reqwest::Response, ChatError> {
        let attempt = async {
            let session_token = self.session.access_token().await;
            let url = construct_api_url(self.config.base_url(), AI_CHAT_ENDPOINT);
            let http_request =
                add_proxy_headers(self.http.post(url), &self.config, session_token.as_deref());
            let response = http_request
                .json(request)
                .send()
                .await
                .map_err(ChatError::Transport)?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                let message = format_remote_error(&request.provider, status, &body);
                tracing::error!(status, provider = %request.provider, "chat proxy call failed: {message}");
                return Err(ChatError::Remote { status, message });
            }

            Ok(response)
        };

        tokio::select! {
            result = attempt => result,
            _ = cancel.cancelled() => Err(ChatError::Cancelled),
        }
    }
}

/// Run `op` up to `retries` times with deterministic exponential backoff.
///
/// The wait after failed attempt `i` is `delay * 2^i`, with no jitter. A
/// token already cancelled before an attempt reports
/// [`ChatError::Cancelled`] without consuming that attempt; a token observed
/// cancelled right after a failed attempt reports `Cancelled` instead of the
/// attempt's own error, and one firing mid-backoff cuts the wait short. The
/// final attempt's error propagates unmodified.
pub(crate) async fn retry_with_backoff<F, Fut, T>(
    mut op: F,
    cancel: &CancellationToken,
    retries: u32,
    delay: Duration,
) -> Result<T, ChatError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ChatError>>,
{
    for attempt in 0..retries {
        if cancel.is_cancelled() {
            return Err(ChatError::Cancelled);
        }

        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if cancel.is_cancelled() {
                    return Err(ChatError::Cancelled);
                }
                if attempt + 1 == retries {
                    return Err(err);
                }
                tracing::warn!(attempt = attempt + 1, retries, error = %err, "chat attempt failed, backing off");
                tokio::select! {
                    _ = tokio::time::sleep(delay * 2u32.pow(attempt)) => {}
                    _ = cancel.cancelled() => return Err(ChatError::Cancelled),
                }
            }
        }
    }

    // Only reachable when asked for zero attempts.
    Err(ChatError::RetriesExhausted)
}
