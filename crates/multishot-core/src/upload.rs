//! Character upload validation.
//!
//! The uploader accepts one file, checks that its declared content type
//! is an image, keeps it as a preview, and submits it once.

use crate::types::CharacterImage;

/// Extension → MIME fallbacks for browsers that report no content type.
const EXTENSION_MIME: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
];

/// Errors raised when a file is selected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// The declared content type is not an image type.
    #[error("Please select a valid image file.")]
    NotAnImage {
        /// The rejected MIME type (may be empty).
        mime: String,
    },

    /// The file has no content.
    #[error("The selected file is empty.")]
    Empty,

    /// The browser failed to read the file.
    #[error("Failed to read file: {0}")]
    Read(String),
}

/// Whether `mime` declares an image type.
#[must_use]
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim()
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Guess a MIME type from a filename extension.
#[must_use]
pub fn mime_from_filename(name: &str) -> Option<&'static str> {
    let (_, ext) = name.rsplit_once('.')?;
    EXTENSION_MIME
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|&(_, mime)| mime)
}

/// Resolve the effective content type: the declared type if any,
/// otherwise a guess from the filename.
#[must_use]
pub fn resolve_mime(name: &str, declared: Option<&str>) -> String {
    match declared.map(str::trim) {
        Some(mime) if !mime.is_empty() => mime.to_owned(),
        _ => mime_from_filename(name).unwrap_or_default().to_owned(),
    }
}

/// Uploader state: the current preview, the last validation error, and
/// whether the preview has already been submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadDraft {
    preview: Option<CharacterImage>,
    error: Option<String>,
    submitted: bool,
}

impl UploadDraft {
    /// An empty draft.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            preview: None,
            error: None,
            submitted: false,
        }
    }

    /// Current preview, if a valid file was selected.
    #[must_use]
    pub const fn preview(&self) -> Option<&CharacterImage> {
        self.preview.as_ref()
    }

    /// User-visible validation message, if the last selection failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether submit is currently available.
    #[must_use]
    pub const fn can_submit(&self) -> bool {
        self.preview.is_some() && !self.submitted
    }

    /// Start reading a newly chosen file. The old preview is dropped
    /// first so it cannot be submitted while the read is pending.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::NotAnImage`] for non-image content types; the
    /// file should then not be read at all.
    pub fn begin_read(&mut self, name: &str, mime: &str) -> Result<(), UploadError> {
        self.preview = None;
        self.submitted = false;
        if is_image_mime(mime) {
            self.error = None;
            return Ok(());
        }
        let e = UploadError::NotAnImage {
            mime: mime.to_owned(),
        };
        tracing::info!(name, mime, "rejected upload: {e}");
        self.error = Some(e.to_string());
        Err(e)
    }

    /// Handle a file selection.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::NotAnImage`] for non-image content types and
    /// [`UploadError::Empty`] for empty files. Either way the preview is
    /// cleared and the message is kept for display.
    pub fn select(&mut self, name: &str, mime: &str, bytes: Vec<u8>) -> Result<(), UploadError> {
        let outcome = if !is_image_mime(mime) {
            Err(UploadError::NotAnImage {
                mime: mime.to_owned(),
            })
        } else if bytes.is_empty() {
            Err(UploadError::Empty)
        } else {
            Ok(CharacterImage::new(mime, bytes))
        };

        match outcome {
            Ok(image) => {
                tracing::debug!(name, mime, "character image selected");
                self.preview = Some(image);
                self.error = None;
                self.submitted = false;
                Ok(())
            }
            Err(e) => {
                tracing::info!(name, mime, "rejected upload: {e}");
                self.preview = None;
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Record a read failure reported by the browser.
    pub fn fail(&mut self, error: &UploadError) {
        self.preview = None;
        self.error = Some(error.to_string());
    }

    /// Emit the previewed image. Returns `None` if there is no preview or
    /// it was already submitted.
    pub fn submit(&mut self) -> Option<CharacterImage> {
        if !self.can_submit() {
            return None;
        }
        self.submitted = true;
        self.preview.clone()
    }
}
