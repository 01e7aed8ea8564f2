//! Generation service configuration.
//!
//! Values are layered: built-in defaults, then a build-time API key, then
//! an optional JSON override supplied by the host (the web app reads it
//! from `localStorage`).

use serde::{Deserialize, Serialize};

/// Default REST endpoint of the generation API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image-capable model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Default instruction sent with every composition.
pub const DEFAULT_INSTRUCTION: &str = "Re-render the character and background from the first \
image so that the camera angle, framing, and pose match the reference figure in the second \
image. Keep the character's identity, clothing, and style unchanged. Do not include the \
reference figure itself in the result.";

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The override JSON could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field has an unusable value.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for the generation client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenerationConfig {
    /// API key sent as `x-goog-api-key`. `None` fails every request with
    /// a descriptive error instead of calling the service.
    #[serde(alias = "apiKey")]
    pub api_key: Option<String>,

    /// Base URL, without a trailing slash.
    pub endpoint: String,

    /// Model name used in the `models/{model}:generateContent` path.
    pub model: String,

    /// Instruction text sent alongside the images.
    pub instruction: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            model: DEFAULT_MODEL.to_owned(),
            instruction: DEFAULT_INSTRUCTION.to_owned(),
        }
    }
}

/// Partial override; absent fields keep the current value.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigOverride {
    #[serde(alias = "apiKey")]
    api_key: Option<String>,
    endpoint: Option<String>,
    model: Option<String>,
    instruction: Option<String>,
}

impl GenerationConfig {
    /// Use `key` unless it is blank.
    #[must_use]
    pub fn with_api_key(mut self, key: Option<&str>) -> Self {
        if let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) {
            self.api_key = Some(key.to_owned());
        }
        self
    }

    /// Apply a partial JSON override on top of `self`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown keys,
    /// and [`ConfigError::Invalid`] if the result fails [`validate`](Self::validate).
    pub fn merge_json(mut self, json: &str) -> Result<Self, ConfigError> {
        let patch: ConfigOverride = serde_json::from_str(json)?;
        if let Some(key) = patch.api_key {
            self = self.with_api_key(Some(&key));
        }
        if let Some(endpoint) = patch.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(model) = patch.model {
            self.model = model;
        }
        if let Some(instruction) = patch.instruction {
            self.instruction = instruction;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check that the endpoint and model are usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a blank model, or an endpoint
    /// that is blank or not `http(s)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let endpoint = self.endpoint.trim();
        if endpoint.is_empty() {
            return Err(ConfigError::Invalid("endpoint must not be empty".into()));
        }
        if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
            return Err(ConfigError::Invalid(format!(
                "endpoint must be an http(s) URL: {endpoint}"
            )));
        }
        if self.model.trim().is_empty() {
            return Err(ConfigError::Invalid("model must not be empty".into()));
        }
        Ok(())
    }

    /// Full `generateContent` URL for the configured model.
    #[must_use]
    pub fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim().trim_end_matches('/'),
            self.model.trim()
        )
    }
}
