//! Authentication utilities for proxy requests
//!
//! Every request to the chat proxy carries the fixed anon key in an `apikey`
//! header plus a bearer `Authorization` header. Authenticated callers present
//! their session token; guests fall back to the anon key, so the proxy always
//! sees some Authorization value. A guest-supplied provider API key is part
//! of the request body and never appears in headers.

use crate::core::config::ProxyConfig;

/// Add the proxy's authentication headers to an HTTP request
///
/// # Arguments
/// * `request` - The reqwest RequestBuilder to add headers to
/// * `config` - Proxy settings holding the anon key
/// * `session_token` - The caller's session token, when one exists
///
/// # Returns
/// The RequestBuilder with content-type, apikey and Authorization headers set
pub fn add_proxy_headers(
    request: reqwest::RequestBuilder,
    config: &ProxyConfig,
    session_token: Option<&str>,
) -> reqwest::RequestBuilder {
    let bearer = session_token.unwrap_or_else(|| config.anon_key());

    request
        .header("Content-Type", "application/json")
        .header("apikey", config.anon_key())
        .header("Authorization", format!("Bearer {bearer}"))
}
