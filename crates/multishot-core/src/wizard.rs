//! The wizard state machine.
//!
//! [`Wizard`] owns the [`SessionState`] and applies [`WizardEvent`]s to it
//! one at a time. Starting generation is returned to the caller as an
//! [`Effect`] so the I/O happens outside this crate:
//!
//! ```rust
//! # use multishot_core::wizard::{Effect, Wizard, WizardEvent};
//! # use multishot_core::{AspectRatio, CharacterImage, CompositionImage};
//! # fn run() -> Result<(), multishot_core::WizardError> {
//! let mut wizard = Wizard::new();
//! wizard.apply(WizardEvent::AspectRatioSelected(AspectRatio::Landscape))?;
//! wizard.apply(WizardEvent::CompositionsConfirmed(vec![
//!     CompositionImage::from_png(vec![1]),
//! ]))?;
//! let effect = wizard.apply(WizardEvent::CharacterUploaded(
//!     CharacterImage::new("image/png", vec![2]),
//! ))?;
//! let Effect::StartGeneration(job) = effect else { unreachable!() };
//!
//! // ... run job.request against the service, then:
//! wizard.apply(WizardEvent::GenerationFinished {
//!     attempt: job.attempt,
//!     outcome: Ok(vec![]),
//! })?;
//! assert!(!wizard.state().loading);
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```
//!
//! Every generation attempt gets a fresh [`AttemptId`]. The counter
//! survives [`WizardEvent::Reset`], so a completion from before a reset
//! can never match the current attempt and is discarded.

use std::fmt;

use crate::generation::{GenerationError, GenerationRequest};
use crate::types::{
    AspectRatio, CharacterImage, CompositionImage, GeneratedImage, MAX_COMPOSITIONS, WizardStep,
};

/// Error recorded when generation is started without its inputs.
pub const MISSING_INPUTS: &str = "Character image and at least one composition are required.";

/// Identifier of one generation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttemptId(u64);

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Aggregate UI state for one pass through the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Current step.
    pub step: WizardStep,
    /// Chosen output ratio (defaults to 1:1).
    pub aspect_ratio: AspectRatio,
    /// Confirmed snapshots, in capture order.
    pub compositions: Vec<CompositionImage>,
    /// Uploaded reference photo.
    pub character: Option<CharacterImage>,
    /// Service output, in response order.
    pub generated: Vec<GeneratedImage>,
    /// A generation request is in flight.
    pub loading: bool,
    /// User-visible error message.
    pub error: Option<String>,
}

/// What the result view should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultView<'a> {
    /// Indeterminate progress.
    Loading,
    /// Error message with a start-over action.
    Failed(&'a str),
    /// Gallery of generated images (possibly empty).
    Gallery(&'a [GeneratedImage]),
}

impl<'a> ResultView<'a> {
    /// Pick the view for the given inputs. Loading takes precedence over
    /// an error, which takes precedence over results.
    #[must_use]
    pub const fn select(
        loading: bool,
        error: Option<&'a str>,
        generated: &'a [GeneratedImage],
    ) -> Self {
        match (loading, error) {
            (true, _) => Self::Loading,
            (false, Some(error)) => Self::Failed(error),
            (false, None) => Self::Gallery(generated),
        }
    }
}

impl SessionState {
    /// The result view for this session.
    #[must_use]
    pub fn result_view(&self) -> ResultView<'_> {
        ResultView::select(self.loading, self.error.as_deref(), &self.generated)
    }
}

/// Input to the state machine.
#[derive(Debug, Clone)]
pub enum WizardEvent {
    /// The user picked an aspect ratio.
    AspectRatioSelected(AspectRatio),
    /// The user confirmed the captured snapshots.
    CompositionsConfirmed(Vec<CompositionImage>),
    /// The user submitted a character image.
    CharacterUploaded(CharacterImage),
    /// A generation attempt finished.
    GenerationFinished {
        /// The attempt this completion belongs to.
        attempt: AttemptId,
        /// The service result.
        outcome: Result<Vec<GeneratedImage>, GenerationError>,
    },
    /// Start over with a fresh session.
    Reset,
}

impl WizardEvent {
    /// Short event name for logs and errors.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AspectRatioSelected(_) => "aspect ratio selected",
            Self::CompositionsConfirmed(_) => "compositions confirmed",
            Self::CharacterUploaded(_) => "character uploaded",
            Self::GenerationFinished { .. } => "generation finished",
            Self::Reset => "reset",
        }
    }
}

/// Work the host must perform after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Nothing to do.
    None,
    /// Call the generation service and report back with
    /// [`WizardEvent::GenerationFinished`] carrying `job.attempt`.
    StartGeneration(GenerationJob),
}

/// A generation request tagged with its attempt id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationJob {
    /// Attempt identifier to echo back on completion.
    pub attempt: AttemptId,
    /// The service request.
    pub request: GenerationRequest,
}

/// Events rejected by the state machine. State is unchanged whenever one
/// of these is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WizardError {
    /// The event does not apply to the current step.
    #[error("unexpected event '{event}' at step '{step}'")]
    UnexpectedEvent {
        /// Current step.
        step: WizardStep,
        /// The rejected event's name.
        event: &'static str,
    },

    /// Confirmed snapshot count outside `1..=MAX_COMPOSITIONS`.
    #[error("expected 1 to {MAX_COMPOSITIONS} compositions, got {0}")]
    InvalidCompositionCount(usize),

    /// A generation attempt is already running.
    #[error("generation attempt {0} is already in flight")]
    GenerationInFlight(AttemptId),

    /// A completion for an attempt that is no longer current.
    #[error("discarding result of stale generation attempt {0}")]
    StaleAttempt(AttemptId),
}

/// The wizard controller.
#[derive(Debug, Default)]
pub struct Wizard {
    state: SessionState,
    last_attempt: u64,
    in_flight: Option<AttemptId>,
}

impl Wizard {
    /// A wizard at the first step with default state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current session state.
    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    /// The attempt currently awaiting completion, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<AttemptId> {
        self.in_flight
    }

    /// Apply one event.
    ///
    /// # Errors
    ///
    /// See [`WizardError`]; the session is left untouched on error.
    pub fn apply(&mut self, event: WizardEvent) -> Result<Effect, WizardError> {
        let step = self.state.step;
        let name = event.name();
        tracing::debug!(%step, event = name, "applying wizard event");

        match (step, event) {
            (WizardStep::SelectAspectRatio, WizardEvent::AspectRatioSelected(ratio)) => {
                self.state.aspect_ratio = ratio;
                self.state.step = WizardStep::CreateComposition;
                Ok(Effect::None)
            }

            (WizardStep::CreateComposition, WizardEvent::CompositionsConfirmed(images)) => {
                if images.is_empty() || images.len() > MAX_COMPOSITIONS {
                    return Err(WizardError::InvalidCompositionCount(images.len()));
                }
                self.state.compositions = images;
                self.state.step = WizardStep::UploadImage;
                Ok(Effect::None)
            }

            (WizardStep::UploadImage, WizardEvent::CharacterUploaded(image)) => {
                if let Some(attempt) = self.in_flight {
                    return Err(WizardError::GenerationInFlight(attempt));
                }
                self.state.character = Some(image);
                self.state.step = WizardStep::GenerateImages;
                Ok(self.begin_generation())
            }

            (_, WizardEvent::GenerationFinished { attempt, outcome }) => {
                self.finish_generation(attempt, outcome)?;
                Ok(Effect::None)
            }

            (_, WizardEvent::Reset) => {
                if let Some(attempt) = self.in_flight {
                    tracing::info!(%attempt, "reset while generation in flight; result will be discarded");
                }
                self.state = SessionState::default();
                self.in_flight = None;
                Ok(Effect::None)
            }

            (step, _) => {
                tracing::warn!(%step, event = name, "ignoring unexpected wizard event");
                Err(WizardError::UnexpectedEvent { step, event: name })
            }
        }
    }

    /// Validate inputs and either record an error (back to upload) or
    /// tag a new attempt and hand it to the host.
    fn begin_generation(&mut self) -> Effect {
        let character = match self.state.character.clone() {
            Some(c) if !self.state.compositions.is_empty() => c,
            _ => {
                tracing::warn!("generation requested without required inputs");
                self.state.error = Some(MISSING_INPUTS.to_owned());
                self.state.step = WizardStep::UploadImage;
                return Effect::None;
            }
        };

        self.last_attempt += 1;
        let attempt = AttemptId(self.last_attempt);
        self.in_flight = Some(attempt);

        self.state.loading = true;
        self.state.error = None;
        self.state.generated.clear();
        self.state.step = WizardStep::ShowResults;

        tracing::info!(
            %attempt,
            compositions = self.state.compositions.len(),
            "starting generation"
        );

        Effect::StartGeneration(GenerationJob {
            attempt,
            request: GenerationRequest {
                character,
                compositions: self.state.compositions.clone(),
                aspect_ratio: self.state.aspect_ratio,
            },
        })
    }

    fn finish_generation(
        &mut self,
        attempt: AttemptId,
        outcome: Result<Vec<GeneratedImage>, GenerationError>,
    ) -> Result<(), WizardError> {
        if self.in_flight != Some(attempt) {
            tracing::debug!(%attempt, "discarding stale generation result");
            return Err(WizardError::StaleAttempt(attempt));
        }
        self.in_flight = None;
        self.state.loading = false;

        match outcome {
            Ok(images) => {
                tracing::info!(%attempt, images = images.len(), "generation succeeded");
                self.state.generated = images;
                self.state.error = None;
            }
            Err(e) => {
                tracing::warn!(%attempt, "generation failed: {e}");
                self.state.error = Some(e.user_message());
            }
        }
        Ok(())
    }
}
