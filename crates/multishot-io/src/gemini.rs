//! `fetch`-based client for the Gemini `generateContent` API.
//!
//! Bodies are built and parsed by [`multishot_core::gemini`]; this module
//! only moves them over HTTP.

use dioxus::logger::tracing;
use multishot_core::gemini;
use multishot_core::{
    GeneratedImage, GenerationConfig, GenerationError, GenerationRequest, GenerationService,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Headers, Request, RequestInit, RequestMode, Response};

/// Generation service backed by the browser's `fetch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiClient {
    config: GenerationConfig,
}

impl GeminiClient {
    /// A client for `config`.
    #[must_use]
    pub const fn new(config: GenerationConfig) -> Self {
        Self { config }
    }

    /// POST one body and decode the image for `composition` (one-based).
    #[allow(clippy::future_not_send)]
    async fn post(
        &self,
        api_key: &str,
        body: &str,
        composition: usize,
    ) -> Result<GeneratedImage, GenerationError> {
        let url = self.config.generate_url();

        let headers = Headers::new().map_err(transport)?;
        headers
            .set("Content-Type", "application/json")
            .map_err(transport)?;
        headers.set("x-goog-api-key", api_key).map_err(transport)?;

        let opts = RequestInit::new();
        opts.set_method("POST");
        opts.set_mode(RequestMode::Cors);
        opts.set_headers(&headers);
        opts.set_body(&JsValue::from_str(body));

        let request = Request::new_with_str_and_init(&url, &opts).map_err(transport)?;
        let window = web_sys::window()
            .ok_or_else(|| GenerationError::Transport("no global window".into()))?;

        tracing::debug!(composition, %url, "sending generation request");
        let response: Response = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(transport)?
            .dyn_into()
            .map_err(|_| GenerationError::Transport("fetch did not return a Response".into()))?;

        let text = JsFuture::from(response.text().map_err(transport)?)
            .await
            .map_err(transport)?
            .as_string()
            .unwrap_or_default();

        if !response.ok() {
            tracing::warn!(composition, status = response.status(), "generation request failed");
            return Err(gemini::parse_error(response.status(), &text));
        }
        gemini::parse_response(&text, composition)
    }
}

impl GenerationService for GeminiClient {
    /// One request per composition, issued sequentially. The first
    /// failure aborts the attempt.
    #[allow(clippy::future_not_send)]
    async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Vec<GeneratedImage>, GenerationError> {
        let Some(api_key) = self.config.api_key.as_deref() else {
            return Err(GenerationError::MissingApiKey);
        };

        let mut images = Vec::with_capacity(request.compositions.len());
        for (index, composition) in request.compositions.iter().enumerate() {
            let body = gemini::request_json(&self.config, &request, composition)?;
            images.push(self.post(api_key, &body, index + 1).await?);
        }
        Ok(images)
    }
}

/// Map a rejected JS promise or failed browser call to a transport error.
fn transport(value: JsValue) -> GenerationError {
    let message = value
        .dyn_ref::<js_sys::Error>()
        .map(|e| String::from(e.message()))
        .or_else(|| value.as_string())
        .unwrap_or_else(|| format!("{value:?}"));
    GenerationError::Transport(message)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use multishot_core::{AspectRatio, CharacterImage, CompositionImage};

    use super::*;

    #[test]
    fn missing_key_fails_before_any_request() {
        let client = GeminiClient::new(GenerationConfig::default());
        let request = GenerationRequest {
            character: CharacterImage::new("image/png", vec![1]),
            compositions: vec![CompositionImage::from_png(vec![2])],
            aspect_ratio: AspectRatio::Square,
        };
        let err = pollster::block_on(client.generate(request)).unwrap_err();
        assert_eq!(err, GenerationError::MissingApiKey);
    }
}
