//! Progress trail shown by the step indicator.
//!
//! The indicator shows four stages. [`WizardStep::GenerateImages`] and
//! [`WizardStep::ShowResults`] share the final "Generate" stage.

use crate::types::WizardStep;

/// A visual stage of the progress trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Aspect ratio selection.
    Ratio,
    /// Composition capture.
    Compose,
    /// Character upload.
    Upload,
    /// Generation and results.
    Generate,
}

impl Stage {
    /// All stages in display order.
    pub const ALL: [Self; 4] = [Self::Ratio, Self::Compose, Self::Upload, Self::Generate];

    /// Short display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ratio => "Ratio",
            Self::Compose => "Compose",
            Self::Upload => "Upload",
            Self::Generate => "Generate",
        }
    }

    /// The wizard step this stage starts at.
    #[must_use]
    pub const fn step(self) -> WizardStep {
        match self {
            Self::Ratio => WizardStep::SelectAspectRatio,
            Self::Compose => WizardStep::CreateComposition,
            Self::Upload => WizardStep::UploadImage,
            Self::Generate => WizardStep::GenerateImages,
        }
    }
}

/// Completion status of one trail entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    /// The wizard has moved past this stage.
    Completed,
    /// The wizard is at this stage.
    Current,
    /// Not reached yet.
    Pending,
}

/// One entry of the progress trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailEntry {
    /// Which stage.
    pub stage: Stage,
    /// Its status relative to the current step.
    pub status: StageStatus,
}

/// Map the current step onto the four-stage trail.
#[must_use]
pub fn trail(current: WizardStep) -> Vec<TrailEntry> {
    let effective = if current == WizardStep::ShowResults {
        WizardStep::GenerateImages
    } else {
        current
    };

    Stage::ALL
        .into_iter()
        .map(|stage| {
            let status = match effective.cmp(&stage.step()) {
                std::cmp::Ordering::Greater => StageStatus::Completed,
                std::cmp::Ordering::Equal => StageStatus::Current,
                std::cmp::Ordering::Less => StageStatus::Pending,
            };
            TrailEntry { stage, status }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses(step: WizardStep) -> Vec<StageStatus> {
        trail(step).into_iter().map(|e| e.status).collect()
    }

    #[test]
    fn first_step_is_current_rest_pending() {
        assert_eq!(
            statuses(WizardStep::SelectAspectRatio),
            [
                StageStatus::Current,
                StageStatus::Pending,
                StageStatus::Pending,
                StageStatus::Pending
            ]
        );
    }

    #[test]
    fn upload_marks_prior_stages_completed() {
        assert_eq!(
            statuses(WizardStep::UploadImage),
            [
                StageStatus::Completed,
                StageStatus::Completed,
                StageStatus::Current,
                StageStatus::Pending
            ]
        );
    }

    #[test]
    fn show_results_shares_the_generate_stage() {
        assert_eq!(
            statuses(WizardStep::ShowResults),
            statuses(WizardStep::GenerateImages)
        );
        assert_eq!(
            statuses(WizardStep::ShowResults).last(),
            Some(&StageStatus::Current)
        );
    }

    #[test]
    fn exactly_one_stage_is_current() {
        for step in WizardStep::ALL {
            let current = statuses(step)
                .into_iter()
                .filter(|s| *s == StageStatus::Current)
                .count();
            assert_eq!(current, 1, "step {step} should have one current stage");
        }
    }
}
