//! The interactive viewport: scene, camera, and the last rendered frame.

use super::camera::OrbitCamera;
use super::figure::Scene;
use super::render::{Frame, RenderError, Renderer, SoftwareRenderer};
use crate::types::{AspectRatio, CompositionImage, Size};

/// A sized view onto the reference figure.
///
/// The frame is cached: it is re-rendered lazily after the camera moves,
/// so repeated captures from the same view are byte-identical.
#[derive(Debug, Clone)]
pub struct Viewport<R = SoftwareRenderer> {
    scene: Scene,
    camera: OrbitCamera,
    renderer: R,
    size: Size,
    frame: Option<Frame>,
}

impl Viewport {
    /// A viewport for `aspect_ratio` with the default camera and the
    /// software renderer.
    #[must_use]
    pub fn new(aspect_ratio: AspectRatio) -> Self {
        Self::with_renderer(aspect_ratio, SoftwareRenderer::default())
    }
}

impl<R: Renderer> Viewport<R> {
    /// A viewport using a custom renderer.
    #[must_use]
    pub fn with_renderer(aspect_ratio: AspectRatio, renderer: R) -> Self {
        Self {
            scene: Scene::reference_figure(),
            camera: OrbitCamera::default(),
            renderer,
            size: aspect_ratio.viewport_size(),
            frame: None,
        }
    }

    /// Replace the camera, e.g. to start from a fixed angle.
    #[must_use]
    pub fn with_camera(mut self, camera: OrbitCamera) -> Self {
        self.camera = camera;
        self.frame = None;
        self
    }

    /// Frame buffer size.
    #[must_use]
    pub const fn size(&self) -> Size {
        self.size
    }

    /// Current camera.
    #[must_use]
    pub const fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    /// Last rendered frame, if it is still current.
    #[must_use]
    pub const fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Apply a pointer drag of `(dx, dy)` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.camera.orbit(dx, dy, self.size.height);
        self.frame = None;
    }

    /// Apply a wheel delta.
    pub fn zoom(&mut self, delta_y: f32) {
        let before = self.camera.distance();
        self.camera.zoom(delta_y);
        if (self.camera.distance() - before).abs() > f32::EPSILON {
            self.frame = None;
        }
    }

    /// The current frame, rendering it if the view changed.
    ///
    /// # Errors
    ///
    /// Propagates [`RenderError`] from the renderer.
    pub fn render(&mut self) -> Result<&Frame, RenderError> {
        let frame = match self.frame.take() {
            Some(frame) => frame,
            None => self.renderer.render(&self.scene, &self.camera, self.size)?,
        };
        Ok(self.frame.insert(frame))
    }

    /// Snapshot the current view as a PNG composition. The camera is not
    /// changed.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if rendering or PNG encoding fails.
    pub fn capture(&mut self) -> Result<CompositionImage, RenderError> {
        let png = self.render()?.to_png()?;
        tracing::debug!(bytes = png.len(), size = ?self.size, "captured composition");
        Ok(CompositionImage::from_png(png))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts render calls and returns a 1x1 frame.
    #[derive(Default)]
    struct CountingRenderer {
        calls: Cell<usize>,
    }

    impl Renderer for CountingRenderer {
        fn render(
            &self,
            _scene: &Scene,
            _camera: &OrbitCamera,
            _size: Size,
        ) -> Result<Frame, RenderError> {
            self.calls.set(self.calls.get() + 1);
            Ok(Frame::from_image(image::RgbaImage::new(1, 1)))
        }
    }

    #[test]
    fn size_follows_aspect_ratio() {
        assert_eq!(Viewport::new(AspectRatio::Portrait).size(), Size::new(432, 768));
        assert_eq!(Viewport::new(AspectRatio::Landscape).size(), Size::new(768, 432));
    }

    #[test]
    fn frame_is_cached_until_camera_moves() {
        let mut viewport = Viewport::with_renderer(AspectRatio::Square, CountingRenderer::default());
        viewport.render().unwrap();
        viewport.render().unwrap();
        assert_eq!(viewport.renderer.calls.get(), 1);

        viewport.orbit(10.0, 0.0);
        assert!(viewport.frame().is_none());
        viewport.render().unwrap();
        assert_eq!(viewport.renderer.calls.get(), 2);
    }

    #[test]
    fn zoom_at_limit_keeps_frame() {
        let mut viewport = Viewport::with_renderer(AspectRatio::Square, CountingRenderer::default());
        for _ in 0..100 {
            viewport.zoom(-1.0);
        }
        viewport.render().unwrap();
        viewport.zoom(-1.0);
        assert!(viewport.frame().is_some());
    }

    #[test]
    fn capture_does_not_move_the_camera() {
        let mut viewport = Viewport::new(AspectRatio::Square);
        let camera = *viewport.camera();
        let first = viewport.capture().unwrap();
        let second = viewport.capture().unwrap();
        assert_eq!(*viewport.camera(), camera);
        assert_eq!(first, second);
        assert_eq!(first.image().mime(), "image/png");
    }

    #[test]
    fn orbiting_changes_the_capture() {
        let mut viewport = Viewport::new(AspectRatio::Landscape);
        let front = viewport.capture().unwrap();
        viewport.orbit(200.0, 0.0);
        let side = viewport.capture().unwrap();
        assert_ne!(front, side);
    }
}
