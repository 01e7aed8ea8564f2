//! Getting pixels and encoded images onto the page.
//!
//! Frames from the viewport are blitted straight onto a `<canvas>` via
//! `ImageData`; encoded images (the uploaded photo) are exposed as Blob
//! URLs for `<img src>`.

use multishot_core::scene::Frame;
use multishot_core::EncodedImage;
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{BlobPropertyBag, CanvasRenderingContext2d, HtmlCanvasElement, ImageData};

/// Errors from canvas or Blob URL operations.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// No `<canvas>` with the requested id is mounted.
    #[error("canvas #{0} not found")]
    CanvasNotFound(String),

    /// A browser API call returned an error.
    #[error("browser API error: {0}")]
    JsError(String),
}

impl From<JsValue> for RasterError {
    fn from(value: JsValue) -> Self {
        Self::JsError(format!("{value:?}"))
    }
}

fn canvas_by_id(id: &str) -> Result<HtmlCanvasElement, RasterError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| RasterError::JsError("no document".into()))?;
    document
        .get_element_by_id(id)
        .ok_or_else(|| RasterError::CanvasNotFound(id.to_owned()))?
        .dyn_into::<HtmlCanvasElement>()
        .map_err(|_| RasterError::CanvasNotFound(id.to_owned()))
}

/// Draw `frame` onto the canvas with element id `canvas_id`, resizing
/// the canvas backing store to the frame size.
///
/// # Errors
///
/// Returns [`RasterError::CanvasNotFound`] if the canvas is not mounted
/// and [`RasterError::JsError`] if the 2D context or `ImageData` calls
/// fail.
pub fn blit_frame(canvas_id: &str, frame: &Frame) -> Result<(), RasterError> {
    let canvas = canvas_by_id(canvas_id)?;
    let size = frame.size();
    if canvas.width() != size.width || canvas.height() != size.height {
        canvas.set_width(size.width);
        canvas.set_height(size.height);
    }

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| RasterError::JsError("no 2d context".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|e| RasterError::JsError(format!("failed to cast context: {e:?}")))?;

    let data = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(frame.rgba()),
        size.width,
        size.height,
    )?;
    ctx.put_image_data(&data, 0.0, 0.0)?;
    Ok(())
}

/// Ratio of canvas backing-store pixels to CSS pixels, vertically.
///
/// Pointer deltas arrive in CSS pixels; multiply by this to express
/// them in frame pixels. Falls back to `1.0` before layout.
///
/// # Errors
///
/// Returns [`RasterError::CanvasNotFound`] if the canvas is not mounted.
#[allow(clippy::cast_precision_loss)]
pub fn css_to_canvas_scale(canvas_id: &str) -> Result<f32, RasterError> {
    let canvas = canvas_by_id(canvas_id)?;
    let css_height = canvas.client_height();
    if css_height <= 0 {
        return Ok(1.0);
    }
    Ok(canvas.height() as f32 / css_height as f32)
}

/// Create a Blob URL for an encoded image.
///
/// The returned URL must be revoked via [`revoke_blob_url`] when no
/// longer needed to avoid memory leaks.
///
/// # Errors
///
/// Returns [`RasterError::JsError`] if Blob or URL creation fails.
pub fn image_to_blob_url(image: &EncodedImage) -> Result<String, RasterError> {
    let parts = js_sys::Array::new();
    parts.push(&js_sys::Uint8Array::from(image.bytes()));

    let opts = BlobPropertyBag::new();
    opts.set_type(image.mime());
    let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &opts)?;

    Ok(web_sys::Url::create_object_url_with_blob(&blob)?)
}

/// Revoke a Blob URL previously created by [`image_to_blob_url`].
///
/// Best-effort: failures are silently ignored since the URL may have
/// already been revoked or garbage collected.
pub fn revoke_blob_url(url: &str) {
    let _ = web_sys::Url::revoke_object_url(url);
}
