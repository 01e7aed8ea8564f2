//! The humanoid reference figure.
//!
//! Built from a sphere and five boxes, then tessellated into world-space
//! quads for the renderer. Dimensions are in scene units with the figure
//! origin at the hips.

use glam::{Mat4, Vec3};

/// An opaque RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Scale each channel by `factor`, saturating at 255.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn shade(self, factor: f32) -> Self {
        let scale = |c: u8| (f32::from(c) * factor).round().clamp(0.0, 255.0) as u8;
        Self(scale(self.0), scale(self.1), scale(self.2))
    }
}

/// Head and arm colour (`#06b6d4`).
pub const ACCENT: Rgb = Rgb(0x06, 0xb6, 0xd4);
/// Torso and leg colour (`#0891b2`).
pub const BODY: Rgb = Rgb(0x08, 0x91, 0xb2);
/// Viewport clear colour (`#1f2937`).
pub const BACKGROUND: Rgb = Rgb(0x1f, 0x29, 0x37);

const SPHERE_SEGMENTS: usize = 16;
const SPHERE_RINGS: usize = 10;

/// Primitive shape of a figure part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    /// Axis-aligned box (before roll) with full edge lengths.
    Cuboid {
        /// Edge lengths along X, Y, Z.
        size: Vec3,
    },
    /// Sphere.
    Sphere {
        /// Radius.
        radius: f32,
    },
}

/// One rigid part of the figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Part {
    /// Shape and dimensions.
    pub shape: Shape,
    /// Centre position.
    pub position: Vec3,
    /// Rotation about the Z axis in radians.
    pub roll: f32,
    /// Surface colour.
    pub color: Rgb,
}

/// A flat quad ready for rasterisation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Corners in cycle order.
    pub corners: [Vec3; 4],
    /// Outward unit normal.
    pub normal: Vec3,
    /// Surface colour.
    pub color: Rgb,
}

impl Face {
    /// Average of the four corners.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.corners.iter().copied().sum::<Vec3>() / 4.0
    }
}

/// A static scene: tessellated faces over a solid background.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    faces: Vec<Face>,
    background: Rgb,
}

impl Scene {
    /// Tessellate `parts` into a scene.
    #[must_use]
    pub fn from_parts(parts: &[Part], background: Rgb) -> Self {
        let faces = parts.iter().flat_map(tessellate).collect();
        Self { faces, background }
    }

    /// The default humanoid reference figure.
    #[must_use]
    pub fn reference_figure() -> Self {
        Self::from_parts(&humanoid_parts(), BACKGROUND)
    }

    /// All faces.
    #[must_use]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Clear colour.
    #[must_use]
    pub const fn background(&self) -> Rgb {
        self.background
    }
}

/// Head, torso, two arms, two legs.
#[must_use]
pub fn humanoid_parts() -> Vec<Part> {
    let limb_roll = std::f32::consts::PI / 8.0;
    vec![
        Part {
            shape: Shape::Sphere { radius: 0.3 },
            position: Vec3::new(0.0, 1.6, 0.0),
            roll: 0.0,
            color: ACCENT,
        },
        Part {
            shape: Shape::Cuboid {
                size: Vec3::new(0.8, 1.2, 0.4),
            },
            position: Vec3::new(0.0, 0.5, 0.0),
            roll: 0.0,
            color: BODY,
        },
        Part {
            shape: Shape::Cuboid {
                size: Vec3::new(0.2, 0.8, 0.2),
            },
            position: Vec3::new(-0.6, 0.6, 0.0),
            roll: limb_roll,
            color: ACCENT,
        },
        Part {
            shape: Shape::Cuboid {
                size: Vec3::new(0.2, 0.8, 0.2),
            },
            position: Vec3::new(0.6, 0.6, 0.0),
            roll: -limb_roll,
            color: ACCENT,
        },
        Part {
            shape: Shape::Cuboid {
                size: Vec3::new(0.25, 1.0, 0.25),
            },
            position: Vec3::new(-0.25, -0.6, 0.0),
            roll: 0.0,
            color: BODY,
        },
        Part {
            shape: Shape::Cuboid {
                size: Vec3::new(0.25, 1.0, 0.25),
            },
            position: Vec3::new(0.25, -0.6, 0.0),
            roll: 0.0,
            color: BODY,
        },
    ]
}

fn tessellate(part: &Part) -> Vec<Face> {
    let transform = Mat4::from_translation(part.position) * Mat4::from_rotation_z(part.roll);
    match part.shape {
        Shape::Cuboid { size } => cuboid_faces(size / 2.0, transform, part.color),
        Shape::Sphere { radius } => sphere_faces(radius, transform, part.color),
    }
}

/// Six faces of a box with half-extents `half`.
fn cuboid_faces(half: Vec3, transform: Mat4, color: Rgb) -> Vec<Face> {
    // (normal axis, tangent u, tangent v)
    let axes = [
        (Vec3::X, Vec3::Y, Vec3::Z),
        (Vec3::NEG_X, Vec3::Y, Vec3::Z),
        (Vec3::Y, Vec3::X, Vec3::Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::X, Vec3::Y),
    ];

    axes.into_iter()
        .map(|(n, u, v)| {
            let center = n * half;
            let du = u * half;
            let dv = v * half;
            let local = [
                center - du - dv,
                center + du - dv,
                center + du + dv,
                center - du + dv,
            ];
            Face {
                corners: local.map(|p| transform.transform_point3(p)),
                normal: transform.transform_vector3(n).normalize(),
                color,
            }
        })
        .collect()
}

/// Latitude/longitude quads of a sphere. Pole rows degenerate to
/// triangles, which fill correctly.
#[allow(clippy::cast_precision_loss)]
fn sphere_faces(radius: f32, transform: Mat4, color: Rgb) -> Vec<Face> {
    let point = |ring: usize, segment: usize| {
        let polar = std::f32::consts::PI * ring as f32 / SPHERE_RINGS as f32;
        let azimuth = std::f32::consts::TAU * segment as f32 / SPHERE_SEGMENTS as f32;
        Vec3::new(
            polar.sin() * azimuth.cos(),
            polar.cos(),
            polar.sin() * azimuth.sin(),
        ) * radius
    };
    let origin = transform.transform_point3(Vec3::ZERO);

    let mut faces = Vec::with_capacity(SPHERE_RINGS * SPHERE_SEGMENTS);
    for ring in 0..SPHERE_RINGS {
        for segment in 0..SPHERE_SEGMENTS {
            let next = (segment + 1) % SPHERE_SEGMENTS;
            let corners = [
                point(ring, segment),
                point(ring + 1, segment),
                point(ring + 1, next),
                point(ring, next),
            ]
            .map(|p| transform.transform_point3(p));
            let center = corners.iter().copied().sum::<Vec3>() / 4.0;
            faces.push(Face {
                corners,
                normal: (center - origin).normalize_or_zero(),
                color,
            });
        }
    }
    faces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_figure_has_all_parts() {
        let scene = Scene::reference_figure();
        // 5 boxes × 6 faces + one sphere.
        assert_eq!(
            scene.faces().len(),
            5 * 6 + SPHERE_RINGS * SPHERE_SEGMENTS
        );
        assert_eq!(scene.background(), BACKGROUND);
    }

    #[test]
    fn cuboid_normals_point_outward() {
        let faces = cuboid_faces(Vec3::splat(0.5), Mat4::IDENTITY, BODY);
        for face in faces {
            assert!(face.center().dot(face.normal) > 0.0);
            assert!((face.normal.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn rolled_arm_stays_near_its_position() {
        let parts = humanoid_parts();
        let arm = parts[2];
        let scene = Scene::from_parts(&[arm], BACKGROUND);
        let mean = scene.faces().iter().map(Face::center).sum::<Vec3>()
            / scene.faces().len() as f32;
        assert!(mean.distance(arm.position) < 1e-4);
    }

    #[test]
    fn figure_fits_within_two_units_of_origin() {
        let scene = Scene::reference_figure();
        for face in scene.faces() {
            for corner in face.corners {
                assert!(corner.length() < 2.0, "corner {corner} too far out");
            }
        }
    }

    #[test]
    fn shade_saturates() {
        assert_eq!(Rgb(200, 10, 0).shade(2.0), Rgb(255, 20, 0));
        assert_eq!(Rgb(200, 10, 0).shade(0.0), Rgb(0, 0, 0));
    }
}
