//! multishot-core: the wizard state machine, reference scene, and
//! generation codec (sans-IO).
//!
//! A session walks through four steps:
//! aspect ratio -> 3D composition -> character upload -> generation.
//!
//! This crate has **no I/O dependencies**: it renders the reference
//! figure into in-memory PNGs, encodes and decodes generation service
//! bodies, and decides state transitions. Fetching, file reading, and
//! the browser UI live in `multishot-io` and `multishot`.

pub mod capture;
pub mod config;
pub mod gemini;
pub mod generation;
pub mod progress;
pub mod scene;
pub mod types;
pub mod upload;
pub mod wizard;

pub use capture::{CaptureError, CompositionDeck};
pub use config::{ConfigError, GenerationConfig};
pub use generation::{GENERIC_FAILURE, GenerationError, GenerationRequest, GenerationService};
pub use progress::{Stage, StageStatus, TrailEntry};
pub use scene::{OrbitCamera, RenderError, Viewport};
pub use types::{
    AspectRatio, CharacterImage, CompositionImage, EncodedImage, GeneratedImage,
    MAX_COMPOSITIONS, Size, TypesError, WizardStep,
};
pub use upload::{UploadDraft, UploadError};
pub use wizard::{
    AttemptId, Effect, GenerationJob, ResultView, SessionState, Wizard, WizardError, WizardEvent,
};
