//! Flat-shaded software rasteriser for the reference scene.
//!
//! Faces are back-face culled, sorted far to near (painter's
//! algorithm), Lambert-shaded, and filled as anti-aliased paths with
//! `tiny-skia`. The figure is convex per part and parts barely overlap,
//! so per-face sorting is enough.

use glam::Vec3;
use image::{ImageEncoder as _, Rgba, RgbaImage};
use tiny_skia::{Color, FillRule, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

use super::camera::OrbitCamera;
use super::figure::{Face, Rgb, Scene};
use crate::types::Size;

const AMBIENT: f32 = 0.45;
const DIFFUSE: f32 = 0.55;

/// Seam-hiding outline drawn around each filled face.
const SEAM_WIDTH: f32 = 0.75;

/// Errors from rendering or encoding a frame.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The frame buffer could not be allocated at this size.
    #[error("cannot allocate a {}x{} frame", .0.width, .0.height)]
    InvalidSize(Size),

    /// PNG encoding failed.
    #[error("PNG encoding failed: {0}")]
    PngEncode(#[from] image::ImageError),
}

/// One rendered viewport image, straight (non-premultiplied) RGBA.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    image: RgbaImage,
}

impl Frame {
    /// Wrap an existing RGBA image.
    #[must_use]
    pub const fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    fn from_pixmap(pixmap: &Pixmap) -> Self {
        let mut image = RgbaImage::new(pixmap.width(), pixmap.height());
        for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Self { image }
    }

    /// Frame dimensions.
    #[must_use]
    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    /// Raw RGBA bytes, row-major.
    #[must_use]
    pub fn rgba(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// The pixel at `(x, y)`, or `None` outside the frame.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::PngEncode`] if encoding fails.
    pub fn to_png(&self) -> Result<Vec<u8>, RenderError> {
        let mut buf = Vec::new();
        let encoder = image::codecs::png::PngEncoder::new(&mut buf);
        encoder.write_image(
            self.image.as_raw(),
            self.image.width(),
            self.image.height(),
            image::ExtendedColorType::Rgba8,
        )?;
        Ok(buf)
    }
}

/// Anything that can turn a scene and camera into a frame.
///
/// The viewport only depends on this trait, so a GPU-backed renderer
/// can replace [`SoftwareRenderer`] without touching capture logic.
pub trait Renderer {
    /// Render `scene` as seen from `camera` into a frame of `size`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the frame cannot be produced.
    fn render(&self, scene: &Scene, camera: &OrbitCamera, size: Size) -> Result<Frame, RenderError>;
}

/// CPU renderer built on `tiny-skia`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoftwareRenderer {
    /// Direction *towards* the light, world space.
    light: Vec3,
}

impl Default for SoftwareRenderer {
    fn default() -> Self {
        Self {
            light: Vec3::splat(5.0).normalize(),
        }
    }
}

/// A face after projection, ready to paint.
struct ProjectedFace {
    points: [(f32, f32); 4],
    depth: f32,
    color: Rgb,
}

impl SoftwareRenderer {
    fn shade(&self, face: &Face) -> Rgb {
        let lambert = face.normal.dot(self.light).max(0.0);
        face.color.shade(AMBIENT + DIFFUSE * lambert)
    }

    /// Cull, project, and depth-sort the scene's faces, farthest first.
    #[allow(clippy::cast_precision_loss)]
    fn project(&self, scene: &Scene, camera: &OrbitCamera, size: Size) -> Vec<ProjectedFace> {
        let eye = camera.eye();
        let view = camera.view();
        let view_projection = camera.view_projection(size.aspect());
        let (w, h) = (size.width as f32, size.height as f32);

        let mut projected: Vec<ProjectedFace> = scene
            .faces()
            .iter()
            .filter(|face| face.normal.dot(eye - face.center()) > 0.0)
            .filter_map(|face| {
                let mut points = [(0.0, 0.0); 4];
                for (slot, corner) in points.iter_mut().zip(face.corners) {
                    let clip = view_projection * corner.extend(1.0);
                    if clip.w <= camera.near() {
                        return None;
                    }
                    let ndc = clip.truncate() / clip.w;
                    *slot = ((ndc.x + 1.0) * 0.5 * w, (1.0 - ndc.y) * 0.5 * h);
                }
                Some(ProjectedFace {
                    points,
                    depth: view.transform_point3(face.center()).z,
                    color: self.shade(face),
                })
            })
            .collect();

        // View space looks down -Z: most negative is farthest.
        projected.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        projected
    }
}

impl Renderer for SoftwareRenderer {
    fn render(&self, scene: &Scene, camera: &OrbitCamera, size: Size) -> Result<Frame, RenderError> {
        let mut pixmap = Pixmap::new(size.width, size.height).ok_or(RenderError::InvalidSize(size))?;
        let Rgb(r, g, b) = scene.background();
        pixmap.fill(Color::from_rgba8(r, g, b, 255));

        let stroke = Stroke {
            width: SEAM_WIDTH,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };

        for face in self.project(scene, camera, size) {
            let mut pb = PathBuilder::new();
            let [first, rest @ ..] = face.points;
            pb.move_to(first.0, first.1);
            for (x, y) in rest {
                pb.line_to(x, y);
            }
            pb.close();
            let Some(path) = pb.finish() else {
                continue;
            };

            let Rgb(r, g, b) = face.color;
            let mut paint = Paint::default();
            paint.set_color_rgba8(r, g, b, 255);
            paint.anti_alias = true;

            pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
            pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
        }

        Ok(Frame::from_pixmap(&pixmap))
    }
}
