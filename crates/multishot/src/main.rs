use dioxus::logger::tracing::{self, Level};
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::LdShapes;
use multishot_core::{Effect, GenerationJob, GenerationService, Wizard, WizardEvent, WizardStep};
use multishot_io::{
    AspectRatioSelector, CompositionTool, GeminiClient, ImageUploader, ResultDisplay,
    StepIndicator, load_config,
};

fn main() {
    if let Err(e) = dioxus::logger::init(Level::INFO) {
        web_sys::console::warn_1(&format!("logger already initialised: {e}").into());
    }
    dioxus::launch(app);
}

/// Root application component.
///
/// Owns the [`Wizard`] and is the only place events are applied to it.
/// Every callback goes through `dispatch`, so updates are applied one at
/// a time in arrival order.
fn app() -> Element {
    // --- Application state ---
    let mut wizard = use_signal(Wizard::new);
    let client = use_signal(|| GeminiClient::new(load_config()));

    // --- Event dispatch ---
    let mut dispatch = move |event: WizardEvent| {
        let outcome = wizard.write().apply(event);
        match outcome {
            Ok(Effect::None) => {}
            Ok(Effect::StartGeneration(job)) => {
                run_generation(wizard, client.peek().clone(), job);
            }
            Err(e) => tracing::warn!("{e}"),
        }
    };

    let state = wizard.read().state().clone();

    // --- Layout ---
    rsx! {
        // Stylesheet, copied from site/app.css by build.rs.
        style { dangerous_inner_html: include_str!(env!("APP_CSS_PATH")) }

        div { class: "app",
            header { class: "app-header",
                div { class: "brand",
                    Icon { icon: LdShapes, width: 28, height: 28 }
                    h1 { "multishot" }
                }
                p { class: "tagline",
                    "Pose a reference figure, capture the angles, and re-render your character from each one."
                }
            }

            StepIndicator { current: state.step }

            main { class: "app-main",
                {match state.step {
                    WizardStep::SelectAspectRatio => rsx! {
                        AspectRatioSelector {
                            on_select: move |ratio| dispatch(WizardEvent::AspectRatioSelected(ratio)),
                        }
                    },
                    WizardStep::CreateComposition => rsx! {
                        CompositionTool {
                            aspect_ratio: state.aspect_ratio,
                            on_complete: move |images| dispatch(WizardEvent::CompositionsConfirmed(images)),
                        }
                    },
                    WizardStep::UploadImage => rsx! {
                        if let Some(ref err) = state.error {
                            p { class: "error-banner", "{err}" }
                        }
                        ImageUploader {
                            on_upload: move |image| dispatch(WizardEvent::CharacterUploaded(image)),
                        }
                    },
                    WizardStep::GenerateImages | WizardStep::ShowResults => rsx! {
                        ResultDisplay {
                            loading: state.loading,
                            error: state.error.clone(),
                            images: state.generated.clone(),
                            on_reset: move |()| dispatch(WizardEvent::Reset),
                        }
                    },
                }}
            }
        }
    }
}

/// Call the generation service for `job` and report the outcome back to
/// the wizard. A completion for an attempt that is no longer current is
/// rejected by the wizard and only logged.
fn run_generation(mut wizard: Signal<Wizard>, client: GeminiClient, job: GenerationJob) {
    let GenerationJob { attempt, request } = job;
    spawn(async move {
        let outcome = client.generate(request).await;
        let finished = WizardEvent::GenerationFinished { attempt, outcome };
        if let Err(e) = wizard.write().apply(finished) {
            tracing::debug!("{e}");
        }
    });
}
