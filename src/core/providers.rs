//! Built-in provider/model catalog
//!
//! The chat proxy accepts a provider display name with every request but does
//! not serve a model listing, so the client ships a fixed catalog embedded
//! from builtin_models.toml. Unknown providers fall back to
//! [`FALLBACK_MODEL`].

use serde::Deserialize;
use std::sync::OnceLock;

/// Model offered for providers without a catalog entry.
pub const FALLBACK_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone, Deserialize)]
pub struct BuiltinProvider {
    pub display_name: String,
    pub default_model: String,
    pub models: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct BuiltinProvidersConfig {
    providers: Vec<BuiltinProvider>,
}

/// Built-in providers from the embedded configuration, parsed once.
pub fn builtin_providers() -> &'static [BuiltinProvider] {
    static CATALOG: OnceLock<Vec<BuiltinProvider>> = OnceLock::new();
    CATALOG.get_or_init(|| {
        const CONFIG_CONTENT: &str = include_str!("../builtin_models.toml");

        let config: BuiltinProvidersConfig =
            toml::from_str(CONFIG_CONTENT).expect("Failed to parse builtin_models.toml");
        config.providers
    })
}

/// Find a built-in provider by display name (case-insensitive).
pub fn find_builtin_provider(name: &str) -> Option<&'static BuiltinProvider> {
    builtin_providers()
        .iter()
        .find(|p| p.display_name.eq_ignore_ascii_case(name))
}

/// Default model for a provider.
///
/// Providers missing from the catalog get [`FALLBACK_MODEL`] so callers never
/// have to special-case an unknown name.
pub fn default_model_for(provider: &str) -> String {
    find_builtin_provider(provider)
        .map(|p| p.default_model.clone())
        .unwrap_or_else(|| FALLBACK_MODEL.to_string())
}

/// Fallback model list for a provider (used when nothing can be fetched
/// dynamically). Unknown providers get a one-element list holding
/// [`FALLBACK_MODEL`].
pub fn fallback_models_for(provider: &str) -> Vec<String> {
    find_builtin_provider(provider)
        .map(|p| p.models.clone())
        .unwrap_or_else(|| vec![FALLBACK_MODEL.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_providers_load() {
        let providers = builtin_providers();
        assert!(!providers.is_empty());

        let names: Vec<&str> = providers.iter().map(|p| p.display_name.as_str()).collect();
        assert!(names.contains(&"OpenAI"));
        assert!(names.contains(&"Anthropic"));
        assert!(names.contains(&"Google Gemini"));
        assert!(names.contains(&"Mistral"));
        assert!(names.contains(&"OpenRouter"));
    }

    #[test]
    fn test_find_builtin_provider() {
        // Case-insensitive lookup
        let provider = find_builtin_provider("openai");
        assert!(provider.is_some());
        assert_eq!(provider.unwrap().display_name, "OpenAI");

        // Exact match
        let provider = find_builtin_provider("Google Gemini");
        assert!(provider.is_some());
        assert_eq!(provider.unwrap().default_model, "gemini-1.5-flash");

        // Non-existent provider
        assert!(find_builtin_provider("nonexistent").is_none());
    }

    #[test]
    fn test_default_model_lookup() {
        assert_eq!(default_model_for("OpenAI"), "gpt-4o-mini");
        assert_eq!(default_model_for("Anthropic"), "claude-3-5-haiku-20241022");
        assert_eq!(default_model_for("Mistral"), "mistral-small-latest");
    }

    #[test]
    fn test_unknown_provider_falls_back() {
        assert_eq!(default_model_for("Unknown Provider"), FALLBACK_MODEL);
        assert_eq!(
            fallback_models_for("Unknown Provider"),
            vec![FALLBACK_MODEL.to_string()]
        );
    }

    #[test]
    fn test_fallback_models_lookup() {
        let models = fallback_models_for("OpenRouter");
        assert!(models.contains(&"anthropic/claude-3.5-sonnet".to_string()));
        assert!(models.contains(&"deepseek/deepseek-chat".to_string()));
    }

    #[test]
    fn test_provider_properties() {
        for provider in builtin_providers() {
            // All providers should have non-empty required fields
            assert!(!provider.display_name.is_empty());
            assert!(!provider.default_model.is_empty());
            assert!(!provider.models.is_empty());

            // The default model should be offered in the provider's own list
            assert!(provider.models.contains(&provider.default_model));
        }
    }
}
