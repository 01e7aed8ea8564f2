//! The generation service as consumed by the wizard.
//!
//! The service itself is external. This module defines the request the
//! wizard hands out, the error taxonomy, and the async seam the web
//! client (and test fakes) implement.

use std::future::Future;

use crate::types::{AspectRatio, CharacterImage, CompositionImage, GeneratedImage};

/// Message used when a failure carries no description.
pub const GENERIC_FAILURE: &str = "An unknown error occurred during image generation.";

/// Everything the service needs for one generation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// The reference photo to re-render.
    pub character: CharacterImage,
    /// One to three viewport snapshots, in capture order.
    pub compositions: Vec<CompositionImage>,
    /// The session's output aspect ratio.
    pub aspect_ratio: AspectRatio,
}

/// Ways a generation attempt can fail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// No API key is configured.
    #[error("No API key is configured for the image generation service.")]
    MissingApiKey,

    /// The request never produced an HTTP response.
    #[error("Could not reach the image generation service: {0}")]
    Transport(String),

    /// The service answered with an error status.
    #[error("{message} (HTTP {status})")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message reported by the service.
        message: String,
    },

    /// A successful response contained no image for a composition.
    #[error("The service did not return an image for composition {composition}.")]
    NoImage {
        /// One-based composition index.
        composition: usize,
    },

    /// The response body could not be decoded.
    #[error("Unexpected response from the image generation service: {0}")]
    Decode(String),

    /// Any other failure, carrying the service's own description.
    #[error("{0}")]
    Service(String),
}

impl GenerationError {
    /// The message shown to the user: the error's description, or
    /// [`GENERIC_FAILURE`] when the description is blank.
    #[must_use]
    pub fn user_message(&self) -> String {
        let message = self.to_string();
        if message.trim().is_empty() {
            GENERIC_FAILURE.to_owned()
        } else {
            message
        }
    }
}

/// An external image generation service.
///
/// One call is one attempt: no streaming, no internal retry.
pub trait GenerationService {
    /// Generate images for `request`, in composition order.
    fn generate(
        &self,
        request: GenerationRequest,
    ) -> impl Future<Output = Result<Vec<GeneratedImage>, GenerationError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_uses_description() {
        let e = GenerationError::Service("rate limited".into());
        assert_eq!(e.user_message(), "rate limited");
    }

    #[test]
    fn user_message_falls_back_when_blank() {
        let e = GenerationError::Service("  ".into());
        assert_eq!(e.user_message(), GENERIC_FAILURE);
    }

    #[test]
    fn api_error_includes_status_and_message() {
        let e = GenerationError::Api {
            status: 429,
            message: "Resource has been exhausted".into(),
        };
        let msg = e.user_message();
        assert!(msg.contains("Resource has been exhausted"));
        assert!(msg.contains("429"));
    }
}
