//! URL utilities for consistent URL handling
//!
//! This module provides utilities for normalizing URLs to prevent issues
//! with trailing slashes when constructing API endpoints.

/// Normalize a base URL by removing trailing slashes
///
/// This ensures consistent URL construction when appending endpoints,
/// preventing double slashes in the final URLs.
///
/// # Examples
///
/// ```
/// use parapet::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://proxy.example.com"), "https://proxy.example.com");
/// assert_eq!(normalize_base_url("https://proxy.example.com/"), "https://proxy.example.com");
/// assert_eq!(normalize_base_url("https://proxy.example.com///"), "https://proxy.example.com");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Construct a complete API endpoint URL from a base URL and endpoint path
///
/// This function normalizes the base URL and safely appends the endpoint,
/// ensuring there are no double slashes in the result.
///
/// # Examples
///
/// ```
/// use parapet::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://proxy.example.com", "functions/v1/ai-chat"),
///     "https://proxy.example.com/functions/v1/ai-chat"
/// );
/// assert_eq!(
///     construct_api_url("https://proxy.example.com/", "/functions/v1/ai-chat"),
///     "https://proxy.example.com/functions/v1/ai-chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url() {
        // No trailing slash - should remain unchanged
        assert_eq!(
            normalize_base_url("https://proxy.example.com"),
            "https://proxy.example.com"
        );

        // Single trailing slash - should be removed
        assert_eq!(
            normalize_base_url("https://proxy.example.com/"),
            "https://proxy.example.com"
        );

        // Multiple trailing slashes - should all be removed
        assert_eq!(
            normalize_base_url("https://proxy.example.com///"),
            "https://proxy.example.com"
        );

        // Empty string
        assert_eq!(normalize_base_url(""), "");

        // Just slashes
        assert_eq!(normalize_base_url("///"), "");
    }

    #[test]
    fn test_construct_api_url() {
        // Normal case - no trailing slash on base URL
        assert_eq!(
            construct_api_url("https://proxy.example.com", "functions/v1/ai-chat"),
            "https://proxy.example.com/functions/v1/ai-chat"
        );

        // Base URL with trailing slash
        assert_eq!(
            construct_api_url("https://proxy.example.com/", "functions/v1/ai-chat"),
            "https://proxy.example.com/functions/v1/ai-chat"
        );

        // Endpoint with leading slash
        assert_eq!(
            construct_api_url("https://proxy.example.com", "/functions/v1/ai-chat"),
            "https://proxy.example.com/functions/v1/ai-chat"
        );

        // Both sides decorated with slashes
        assert_eq!(
            construct_api_url("https://proxy.example.com///", "///functions/v1/ai-chat"),
            "https://proxy.example.com/functions/v1/ai-chat"
        );
    }
}
