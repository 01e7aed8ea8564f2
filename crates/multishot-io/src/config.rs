//! Loading [`GenerationConfig`] in the browser.

use dioxus::logger::tracing;
use multishot_core::GenerationConfig;
use wasm_bindgen::JsValue;

/// `localStorage` key holding an optional JSON override, e.g.
/// `{"api_key": "...", "model": "..."}`.
pub const STORAGE_KEY: &str = "multishot.config";

/// API key baked in at build time, if any.
const BUILD_API_KEY: Option<&str> = option_env!("MULTISHOT_API_KEY");

/// Defaults, then the build-time key, then the `localStorage` override.
///
/// An unreadable or invalid override is logged and ignored so the app
/// still starts.
#[must_use]
pub fn load_config() -> GenerationConfig {
    let stored = match read_override() {
        Ok(stored) => stored,
        Err(e) => {
            tracing::warn!("cannot read {STORAGE_KEY} from localStorage: {e:?}");
            None
        }
    };
    let config = layer(BUILD_API_KEY, stored.as_deref());
    tracing::info!(
        endpoint = %config.endpoint,
        model = %config.model,
        has_api_key = config.api_key.is_some(),
        "generation config loaded"
    );
    config
}

/// Apply the build-time key and an optional JSON override to the
/// defaults.
fn layer(build_key: Option<&str>, stored: Option<&str>) -> GenerationConfig {
    let base = GenerationConfig::default().with_api_key(build_key);
    let Some(json) = stored.filter(|s| !s.trim().is_empty()) else {
        return base;
    };
    match base.clone().merge_json(json) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("ignoring {STORAGE_KEY}: {e}");
            base
        }
    }
}

fn read_override() -> Result<Option<String>, JsValue> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    match window.local_storage()? {
        Some(storage) => storage.get_item(STORAGE_KEY),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use multishot_core::config::DEFAULT_MODEL;

    use super::*;

    #[test]
    fn build_key_applies_without_override() {
        let config = layer(Some("abc"), None);
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.model, DEFAULT_MODEL);
    }

    #[test]
    fn override_wins_over_build_key() {
        let config = layer(Some("abc"), Some(r#"{"api_key": "xyz", "model": "other"}"#));
        assert_eq!(config.api_key.as_deref(), Some("xyz"));
        assert_eq!(config.model, "other");
    }

    #[test]
    fn invalid_override_falls_back() {
        let config = layer(Some("abc"), Some(r#"{"colour": "blue"}"#));
        assert_eq!(config, GenerationConfig::default().with_api_key(Some("abc")));
    }

    #[test]
    fn blank_override_is_ignored() {
        assert_eq!(layer(None, Some("  ")), GenerationConfig::default());
    }
}
