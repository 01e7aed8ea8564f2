//! multishot-io: Browser I/O and Dioxus component library.
//!
//! Handles the canvas viewport, file uploads, Blob downloads, the
//! `fetch`-based generation client, and configuration loading, and
//! provides the step components for the multishot web application.

pub mod components;
pub mod config;
pub mod download;
pub mod gemini;
pub mod raster;

pub use components::{
    AspectRatioSelector, CompositionTool, ImageUploader, ResultDisplay, StepIndicator,
};
pub use config::load_config;
pub use gemini::GeminiClient;
