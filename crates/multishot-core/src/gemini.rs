//! Request and response bodies for the Gemini `generateContent` API.
//!
//! Pure JSON encoding/decoding; the HTTP transport lives in
//! `multishot-io`. Each composition is sent as its own request carrying
//! the instruction, the character image, and the composition snapshot,
//! and each response is expected to contain one inline image.

use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::generation::{GenerationError, GenerationRequest};
use crate::types::{AspectRatio, CompositionImage, EncodedImage, GeneratedImage};

/// `generateContent` request body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationSettings,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text { text: String },
    InlineData { inline_data: InlineBlob },
}

#[derive(Debug, Serialize)]
struct InlineBlob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationSettings {
    response_modalities: [&'static str; 2],
}

impl RequestPart {
    fn image(image: &EncodedImage) -> Self {
        Self::InlineData {
            inline_data: InlineBlob {
                mime_type: image.mime().to_owned(),
                data: image.to_base64(),
            },
        }
    }
}

/// Instruction text for one composition.
fn instruction_text(config: &GenerationConfig, aspect_ratio: AspectRatio) -> String {
    format!(
        "{} The output image must use a {aspect_ratio} aspect ratio.",
        config.instruction.trim()
    )
}

/// Build the request body for a single composition of `request`.
#[must_use]
pub fn build_request(
    config: &GenerationConfig,
    request: &GenerationRequest,
    composition: &CompositionImage,
) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts: vec![
                RequestPart::Text {
                    text: instruction_text(config, request.aspect_ratio),
                },
                RequestPart::image(request.character.image()),
                RequestPart::image(composition.image()),
            ],
        }],
        generation_config: GenerationSettings {
            response_modalities: ["IMAGE", "TEXT"],
        },
    }
}

/// Serialise the body for `composition` to JSON.
///
/// # Errors
///
/// Returns [`GenerationError::Decode`] if serialisation fails.
pub fn request_json(
    config: &GenerationConfig,
    request: &GenerationRequest,
    composition: &CompositionImage,
) -> Result<String, GenerationError> {
    serde_json::to_string(&build_request(config, request, composition))
        .map_err(|e| GenerationError::Decode(format!("failed to encode request: {e}")))
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(rename = "inlineData", alias = "inline_data")]
    inline_data: Option<ResponseBlob>,
}

#[derive(Debug, Deserialize)]
struct ResponseBlob {
    #[serde(rename = "mimeType", alias = "mime_type")]
    mime_type: Option<String>,
    data: String,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

/// Decode a successful response for the composition at one-based
/// `composition` into its generated image.
///
/// # Errors
///
/// Returns [`GenerationError::Decode`] for malformed JSON or base64,
/// [`GenerationError::Service`] if the prompt was blocked, and
/// [`GenerationError::NoImage`] if no candidate holds an image.
pub fn parse_response(body: &str, composition: usize) -> Result<GeneratedImage, GenerationError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::Decode(e.to_string()))?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GenerationError::Service(format!(
            "The request for composition {composition} was blocked ({reason})."
        )));
    }

    let blob = response
        .candidates
        .iter()
        .filter_map(|c| c.content.as_ref())
        .flat_map(|c| c.parts.iter())
        .find_map(|p| p.inline_data.as_ref());

    let Some(blob) = blob else {
        let reason = response
            .candidates
            .iter()
            .find_map(|c| c.finish_reason.as_deref())
            .unwrap_or("none");
        tracing::warn!(composition, finish_reason = reason, "response had no image");
        return Err(GenerationError::NoImage { composition });
    };

    let mime = blob.mime_type.as_deref().unwrap_or("image/png");
    let image = EncodedImage::from_base64(mime, &blob.data)
        .map_err(|e| GenerationError::Decode(e.to_string()))?;
    Ok(GeneratedImage::new(image))
}

/// Map a non-success HTTP response into a [`GenerationError::Api`],
/// using the service's error message when the body carries one.
#[must_use]
pub fn parse_error(status: u16, body: &str) -> GenerationError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| {
            let ErrorBody {
                message,
                status: code,
            } = envelope.error;
            if message.trim().is_empty() { code } else { message }
        })
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                format!("Request failed with status {status}")
            } else {
                trimmed.chars().take(200).collect()
            }
        });
    GenerationError::Api { status, message }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::CharacterImage;

    fn request() -> GenerationRequest {
        GenerationRequest {
            character: CharacterImage::new("image/jpeg", vec![0xff, 0xd8, 0xff]),
            compositions: vec![CompositionImage::from_png(vec![1, 2, 3])],
            aspect_ratio: AspectRatio::Landscape,
        }
    }

    #[test]
    fn request_body_carries_text_and_both_images() {
        let req = request();
        let json = request_json(&GenerationConfig::default(), &req, &req.compositions[0]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let parts = value["contents"][0]["parts"].as_array().unwrap();
        assert_eq!(parts.len(), 3);
        assert!(parts[0]["text"].as_str().unwrap().contains("16:9"));
        assert_eq!(parts[1]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(parts[1]["inline_data"]["data"], "/9j/");
        assert_eq!(parts[2]["inline_data"]["mime_type"], "image/png");
        assert_eq!(
            value["generationConfig"]["responseModalities"],
            serde_json::json!(["IMAGE", "TEXT"])
        );
    }

    #[test]
    fn parse_response_returns_first_inline_image() {
        let body = r#"{
            "candidates": [{
                "content": {"parts": [
                    {"text": "here you go"},
                    {"inlineData": {"mimeType": "image/png", "data": "iVBORw=="}}
                ]},
                "finishReason": "STOP"
            }]
        }"#;
        let image = parse_response(body, 1).unwrap();
        assert_eq!(image.image().mime(), "image/png");
        assert_eq!(image.image().bytes(), &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn parse_response_without_image_is_no_image() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "sorry"}]}, "finishReason": "STOP"}]}"#;
        assert_eq!(
            parse_response(body, 2).unwrap_err(),
            GenerationError::NoImage { composition: 2 }
        );
    }

    #[test]
    fn parse_response_reports_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = parse_response(body, 1).unwrap_err();
        assert!(err.user_message().contains("SAFETY"));
    }

    #[test]
    fn parse_response_rejects_malformed_json() {
        assert!(matches!(
            parse_response("not json", 1),
            Err(GenerationError::Decode(_))
        ));
    }

    #[test]
    fn parse_error_uses_service_message() {
        let body = r#"{"error": {"code": 429, "message": "rate limited", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = parse_error(429, body);
        assert_eq!(
            err,
            GenerationError::Api {
                status: 429,
                message: "rate limited".into()
            }
        );
        assert!(err.user_message().contains("rate limited"));
    }

    #[test]
    fn parse_error_falls_back_to_status_text() {
        assert_eq!(
            parse_error(502, ""),
            GenerationError::Api {
                status: 502,
                message: "Request failed with status 502".into()
            }
        );
    }
}
