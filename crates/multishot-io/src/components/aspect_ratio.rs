//! Aspect ratio picker shown at the start of a session.

use dioxus::prelude::*;
use multishot_core::AspectRatio;

/// Props for the [`AspectRatioSelector`] component.
#[derive(Props, Clone, PartialEq)]
pub struct AspectRatioSelectorProps {
    /// Called with the chosen ratio.
    on_select: EventHandler<AspectRatio>,
}

/// Three cards, one per ratio, each with an outline box drawn at that
/// ratio.
#[component]
pub fn AspectRatioSelector(props: AspectRatioSelectorProps) -> Element {
    rsx! {
        section { class: "panel",
            h2 { class: "panel-title", "Choose an aspect ratio" }
            p { class: "panel-subtitle",
                "Every composition and generated image will use this shape."
            }
            div { class: "ratio-grid",
                for ratio in AspectRatio::ALL {
                    {render_card(ratio, props.on_select)}
                }
            }
        }
    }
}

fn render_card(ratio: AspectRatio, on_select: EventHandler<AspectRatio>) -> Element {
    let size = ratio.viewport_size();
    let (w, h) = (size.width, size.height);

    rsx! {
        button {
            class: "ratio-card",
            onclick: move |_| on_select.call(ratio),
            aria_label: "{ratio.label()} {ratio}",
            div { class: "ratio-frame",
                div {
                    class: "ratio-outline",
                    style: "aspect-ratio: {w} / {h};",
                }
            }
            span { class: "ratio-label", "{ratio.label()}" }
            span { class: "ratio-tag", "{ratio}" }
            span { class: "ratio-hint", "{ratio.hint()}" }
        }
    }
}
