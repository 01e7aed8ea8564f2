//! The 3D composition scene: a posable-looking humanoid reference figure
//! viewed through an orbit camera and rasterised in software.

pub mod camera;
pub mod figure;
pub mod render;
pub mod viewport;

pub use camera::{OrbitCamera, OrbitLimits};
pub use figure::{Face, Part, Rgb, Scene, Shape};
pub use render::{Frame, RenderError, Renderer, SoftwareRenderer};
pub use viewport::Viewport;
