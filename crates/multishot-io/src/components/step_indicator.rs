//! Four-stage progress trail across the top of the wizard.

use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdCamera, LdCheck, LdShapes, LdUpload, LdWandSparkles};
use multishot_core::WizardStep;
use multishot_core::progress::{Stage, StageStatus, TrailEntry, trail};

/// Props for the [`StepIndicator`] component.
#[derive(Props, Clone, PartialEq, Eq)]
pub struct StepIndicatorProps {
    /// The wizard's current step.
    current: WizardStep,
}

/// Stage icons in circles joined by connector lines; completed stages
/// show a check mark instead.
#[component]
pub fn StepIndicator(props: StepIndicatorProps) -> Element {
    let entries = trail(props.current);
    let last = entries.len().saturating_sub(1);

    rsx! {
        nav { class: "step-indicator", aria_label: "Progress",
            ol { class: "step-trail",
                for (i, entry) in entries.into_iter().enumerate() {
                    {render_entry(entry, i < last)}
                }
            }
        }
    }
}

fn render_entry(entry: TrailEntry, connector: bool) -> Element {
    let status_class = match entry.status {
        StageStatus::Completed => "completed",
        StageStatus::Current => "current",
        StageStatus::Pending => "pending",
    };
    let label = entry.stage.label();

    rsx! {
        li { class: "step-entry {status_class}",
            "aria-current": if entry.status == StageStatus::Current { "step" } else { "false" },
            div { class: "step-circle",
                if entry.status == StageStatus::Completed {
                    Icon { icon: LdCheck, width: 16, height: 16 }
                } else {
                    {stage_icon(entry.stage)}
                }
            }
            span { class: "step-label", "{label}" }
            if connector {
                div { class: "step-connector" }
            }
        }
    }
}

fn stage_icon(stage: Stage) -> Element {
    match stage {
        Stage::Ratio => rsx! { Icon { icon: LdCamera, width: 18, height: 18 } },
        Stage::Compose => rsx! { Icon { icon: LdShapes, width: 18, height: 18 } },
        Stage::Upload => rsx! { Icon { icon: LdUpload, width: 18, height: 18 } },
        Stage::Generate => rsx! { Icon { icon: LdWandSparkles, width: 18, height: 18 } },
    }
}
