//! Orbit camera around the figure origin.
//!
//! Left-drag orbits, the wheel dollies within [`OrbitLimits`]. There is
//! no pan: the target is fixed so the figure always stays centred.

use std::f32::consts::{PI, TAU};

use glam::{Mat4, Vec3};

/// Keeps the camera off the poles, where `look_at` degenerates.
const POLAR_EPSILON: f32 = 1e-3;

/// Distance scale per wheel notch.
const ZOOM_STEP: f32 = 0.95;

const NEAR: f32 = 0.1;
const FAR: f32 = 100.0;

/// Zoom bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitLimits {
    /// Closest allowed distance to the target.
    pub min_distance: f32,
    /// Farthest allowed distance to the target.
    pub max_distance: f32,
}

impl Default for OrbitLimits {
    fn default() -> Self {
        Self {
            min_distance: 3.0,
            max_distance: 15.0,
        }
    }
}

/// A perspective camera on a sphere around a fixed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitCamera {
    target: Vec3,
    /// Angle around the Y axis, measured from +Z towards +X.
    azimuth: f32,
    /// Angle from +Y.
    polar: f32,
    distance: f32,
    fov_y_degrees: f32,
    limits: OrbitLimits,
}

impl Default for OrbitCamera {
    /// Looking at the origin from `(5, 5, 5)` with a 50° field of view.
    fn default() -> Self {
        Self::from_eye(Vec3::splat(5.0), Vec3::ZERO, 50.0, OrbitLimits::default())
    }
}

impl OrbitCamera {
    /// Place the camera at `eye` looking at `target`. The distance is
    /// clamped into `limits`.
    #[must_use]
    pub fn from_eye(eye: Vec3, target: Vec3, fov_y_degrees: f32, limits: OrbitLimits) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        Self {
            target,
            azimuth: offset.x.atan2(offset.z),
            polar: (offset.y / distance).clamp(-1.0, 1.0).acos(),
            distance: distance.clamp(limits.min_distance, limits.max_distance),
            fov_y_degrees,
            limits,
        }
        .clamped()
    }

    /// Place the camera by spherical angles (degrees) and distance.
    /// Elevation is measured up from the horizontal plane.
    #[must_use]
    pub fn from_angles(azimuth_degrees: f32, elevation_degrees: f32, distance: f32) -> Self {
        let base = Self::default();
        Self {
            azimuth: azimuth_degrees.to_radians(),
            polar: (90.0 - elevation_degrees).to_radians(),
            distance: distance.clamp(base.limits.min_distance, base.limits.max_distance),
            ..base
        }
        .clamped()
    }

    fn clamped(mut self) -> Self {
        self.polar = self.polar.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        self.azimuth = self.azimuth.rem_euclid(TAU);
        self
    }

    /// The point the camera looks at. Never changes.
    #[must_use]
    pub const fn target(&self) -> Vec3 {
        self.target
    }

    /// Current distance to the target.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Zoom bounds.
    #[must_use]
    pub const fn limits(&self) -> OrbitLimits {
        self.limits
    }

    /// World-space camera position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    /// Rotate by a pointer drag of `(dx, dy)` pixels on a viewport
    /// `viewport_height` pixels tall. A drag across the full height is
    /// one full turn.
    #[allow(clippy::cast_precision_loss)]
    pub fn orbit(&mut self, dx: f32, dy: f32, viewport_height: u32) {
        let height = viewport_height.max(1) as f32;
        self.azimuth -= TAU * dx / height;
        self.polar -= TAU * dy / height;
        *self = self.clamped();
    }

    /// Dolly by a wheel event. Negative `delta_y` (scroll up) moves
    /// closer.
    pub fn zoom(&mut self, delta_y: f32) {
        if delta_y < 0.0 {
            self.distance *= ZOOM_STEP;
        } else if delta_y > 0.0 {
            self.distance /= ZOOM_STEP;
        }
        self.distance = self
            .distance
            .clamp(self.limits.min_distance, self.limits.max_distance);
    }

    /// World → view transform.
    #[must_use]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// View → clip transform for the given width/height ratio.
    #[must_use]
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), aspect, NEAR, FAR)
    }

    /// Combined world → clip transform.
    #[must_use]
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }

    /// Near clipping distance.
    #[must_use]
    pub const fn near(&self) -> f32 {
        NEAR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_eye_is_five_five_five() {
        let eye = OrbitCamera::default().eye();
        assert!(eye.distance(Vec3::splat(5.0)) < 1e-4, "eye was {eye}");
    }

    #[test]
    fn zoom_is_clamped_to_limits() {
        let mut camera = OrbitCamera::default();
        for _ in 0..200 {
            camera.zoom(-1.0);
        }
        assert!((camera.distance() - 3.0).abs() < 1e-5);
        for _ in 0..200 {
            camera.zoom(1.0);
        }
        assert!((camera.distance() - 15.0).abs() < 1e-5);
    }

    #[test]
    fn zero_wheel_delta_keeps_distance() {
        let mut camera = OrbitCamera::default();
        let before = camera.distance();
        camera.zoom(0.0);
        assert!((camera.distance() - before).abs() < f32::EPSILON);
    }

    #[test]
    fn orbit_moves_eye_but_not_target() {
        let mut camera = OrbitCamera::default();
        let before = camera.eye();
        camera.orbit(120.0, -40.0, 512);
        assert!(camera.eye().distance(before) > 0.1);
        assert_eq!(camera.target(), Vec3::ZERO);
        assert!((camera.eye().length() - camera.distance()).abs() < 1e-4);
    }

    #[test]
    fn orbit_never_flips_over_the_pole() {
        let mut camera = OrbitCamera::default();
        camera.orbit(0.0, 10_000.0, 100);
        assert!(camera.eye().y <= camera.distance());
        assert!(camera.view().is_finite());
    }

    #[test]
    fn from_angles_places_camera_in_front() {
        let camera = OrbitCamera::from_angles(0.0, 0.0, 8.0);
        let eye = camera.eye();
        assert!(eye.distance(Vec3::new(0.0, 0.0, 8.0)) < 1e-3, "eye was {eye}");
    }

    #[test]
    fn target_projects_to_screen_center() {
        let camera = OrbitCamera::default();
        let clip = camera.view_projection(16.0 / 9.0) * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-4 && ndc.y.abs() < 1e-4);
    }
}
