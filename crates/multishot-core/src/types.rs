//! Shared types for the multishot wizard.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};

/// Maximum number of composition snapshots a session can hold.
pub const MAX_COMPOSITIONS: usize = 3;

/// Errors produced while parsing or decoding the shared types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypesError {
    /// The aspect ratio tag is not one of the three supported values.
    #[error("unknown aspect ratio: {0:?}")]
    UnknownAspectRatio(String),

    /// The base64 payload could not be decoded.
    #[error("invalid base64 payload: {0}")]
    Base64(String),
}

/// Output aspect ratio, chosen once at the start of a session.
///
/// Determines the shape of the 3D viewport and therefore of every
/// captured composition snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    /// `1:1`
    #[default]
    #[serde(rename = "1:1")]
    Square,
    /// `16:9`
    #[serde(rename = "16:9")]
    Landscape,
    /// `9:16`
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    /// All ratios in selector display order.
    pub const ALL: [Self; 3] = [Self::Square, Self::Landscape, Self::Portrait];

    /// The ratio tag, e.g. `"16:9"`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Landscape => "16:9",
            Self::Portrait => "9:16",
        }
    }

    /// Human-readable name shown on the selector card.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Square => "Square",
            Self::Landscape => "Landscape",
            Self::Portrait => "Portrait",
        }
    }

    /// Short usage hint shown under the label.
    #[must_use]
    pub const fn hint(self) -> &'static str {
        match self {
            Self::Square => "Best for profiles",
            Self::Landscape => "Best for wide shots",
            Self::Portrait => "Best for stories",
        }
    }

    /// Pixel size of the viewport frame buffer for this ratio.
    #[must_use]
    pub const fn viewport_size(self) -> Size {
        match self {
            Self::Square => Size::new(512, 512),
            Self::Landscape => Size::new(768, 432),
            Self::Portrait => Size::new(432, 768),
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| TypesError::UnknownAspectRatio(s.to_owned()))
    }
}

/// A pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn aspect(self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

/// A stage of the linear wizard flow.
///
/// The derived ordering is the flow order; progress display relies on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum WizardStep {
    /// Choose the output aspect ratio.
    #[default]
    SelectAspectRatio,
    /// Orbit the reference figure and capture snapshots.
    CreateComposition,
    /// Upload the character photo.
    UploadImage,
    /// Generation has been requested.
    GenerateImages,
    /// Loading, error, or gallery view.
    ShowResults,
}

impl WizardStep {
    /// All steps in flow order.
    pub const ALL: [Self; 5] = [
        Self::SelectAspectRatio,
        Self::CreateComposition,
        Self::UploadImage,
        Self::GenerateImages,
        Self::ShowResults,
    ];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SelectAspectRatio => "Select aspect ratio",
            Self::CreateComposition => "Create composition",
            Self::UploadImage => "Upload image",
            Self::GenerateImages => "Generate images",
            Self::ShowResults => "Show results",
        }
    }
}

impl fmt::Display for WizardStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An encoded image (PNG, JPEG, ...) together with its MIME type.
///
/// The bytes are shared, so clones are cheap. That matters because
/// the session state is cloned into UI props on every render.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedImage {
    mime: String,
    bytes: Arc<[u8]>,
}

impl EncodedImage {
    /// Wrap already-encoded bytes.
    #[must_use]
    pub fn new(mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            mime: mime.into(),
            bytes: bytes.into(),
        }
    }

    /// Wrap PNG bytes.
    #[must_use]
    pub fn png(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self::new("image/png", bytes)
    }

    /// Decode a raw base64 payload (no `data:` prefix).
    ///
    /// # Errors
    ///
    /// Returns [`TypesError::Base64`] if the payload is not valid base64.
    pub fn from_base64(mime: impl Into<String>, payload: &str) -> Result<Self, TypesError> {
        let bytes = BASE64
            .decode(payload.trim())
            .map_err(|e| TypesError::Base64(e.to_string()))?;
        Ok(Self::new(mime, bytes))
    }

    /// MIME type, e.g. `image/png`.
    #[must_use]
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// The encoded bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The bytes as standard base64 without a `data:` prefix.
    #[must_use]
    pub fn to_base64(&self) -> String {
        BASE64.encode(&self.bytes)
    }
}

impl fmt::Debug for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never dump pixel payloads into logs.
        f.debug_struct("EncodedImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A rasterised snapshot of the 3D viewport. Always PNG.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositionImage(EncodedImage);

impl CompositionImage {
    /// Wrap PNG bytes captured from the viewport.
    #[must_use]
    pub fn from_png(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(EncodedImage::png(bytes))
    }

    /// The underlying encoded image.
    #[must_use]
    pub const fn image(&self) -> &EncodedImage {
        &self.0
    }
}

/// The user-supplied reference photo, with the MIME type it was
/// declared with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterImage(EncodedImage);

impl CharacterImage {
    /// Wrap the uploaded file contents.
    #[must_use]
    pub fn new(mime: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self(EncodedImage::new(mime, bytes))
    }

    /// The underlying encoded image.
    #[must_use]
    pub const fn image(&self) -> &EncodedImage {
        &self.0
    }

    /// The declared MIME type.
    #[must_use]
    pub fn mime(&self) -> &str {
        self.0.mime()
    }
}

/// An image returned by the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage(EncodedImage);

impl GeneratedImage {
    /// Wrap an encoded image returned by the service.
    #[must_use]
    pub const fn new(image: EncodedImage) -> Self {
        Self(image)
    }

    /// The underlying encoded image.
    #[must_use]
    pub const fn image(&self) -> &EncodedImage {
        &self.0
    }

    /// Download filename for the image at `index` in the gallery.
    #[must_use]
    pub fn download_name(index: usize) -> String {
        format!("generated-image-{}.png", index + 1)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- AspectRatio tests ---

    #[test]
    fn aspect_ratio_parses_every_tag() {
        for ratio in AspectRatio::ALL {
            assert_eq!(ratio.as_str().parse::<AspectRatio>().unwrap(), ratio);
        }
    }

    #[test]
    fn aspect_ratio_rejects_unknown_tag() {
        let err = "4:3".parse::<AspectRatio>().unwrap_err();
        assert_eq!(err, TypesError::UnknownAspectRatio("4:3".into()));
    }

    #[test]
    fn aspect_ratio_defaults_to_square() {
        assert_eq!(AspectRatio::default(), AspectRatio::Square);
    }

    #[test]
    fn viewport_sizes_match_ratio() {
        assert!((AspectRatio::Square.viewport_size().aspect() - 1.0).abs() < 1e-6);
        assert!((AspectRatio::Landscape.viewport_size().aspect() - 16.0 / 9.0).abs() < 1e-3);
        assert!((AspectRatio::Portrait.viewport_size().aspect() - 9.0 / 16.0).abs() < 1e-3);
    }

    #[test]
    fn aspect_ratio_serializes_as_tag() {
        let json = serde_json::to_string(&AspectRatio::Landscape).unwrap();
        assert_eq!(json, "\"16:9\"");
        let back: AspectRatio = serde_json::from_str("\"9:16\"").unwrap();
        assert_eq!(back, AspectRatio::Portrait);
    }

    // --- WizardStep tests ---

    #[test]
    fn wizard_steps_are_totally_ordered() {
        for pair in WizardStep::ALL.windows(2) {
            assert!(pair[0] < pair[1], "{} should precede {}", pair[0], pair[1]);
        }
    }

    // --- EncodedImage tests ---

    #[test]
    fn base64_payload_has_no_prefix() {
        let image = EncodedImage::new("image/jpeg", vec![0xff, 0xd8, 0xff]);
        assert_eq!(image.to_base64(), "/9j/");
    }

    #[test]
    fn from_base64_rejects_garbage() {
        assert!(matches!(
            EncodedImage::from_base64("image/png", "not base64!"),
            Err(TypesError::Base64(_))
        ));
    }

    #[test]
    fn debug_omits_payload() {
        let image = EncodedImage::png(vec![1u8; 4096]);
        let dbg = format!("{image:?}");
        assert!(dbg.contains("len: 4096"));
        assert!(dbg.len() < 100);
    }

    #[test]
    fn download_names_are_one_based() {
        assert_eq!(GeneratedImage::download_name(0), "generated-image-1.png");
        assert_eq!(GeneratedImage::download_name(2), "generated-image-3.png");
    }
}
