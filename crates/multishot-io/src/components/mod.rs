//! Dioxus UI components for multishot.
//!
//! One component per wizard step, plus the progress trail shown above
//! them.

mod aspect_ratio;
mod composition;
mod results;
mod step_indicator;
mod upload;

pub use aspect_ratio::AspectRatioSelector;
pub use composition::CompositionTool;
pub use results::ResultDisplay;
pub use step_indicator::StepIndicator;
pub use upload::ImageUploader;
