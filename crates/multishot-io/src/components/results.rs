//! Result view: progress, failure, or the generated gallery.

use dioxus::logger::tracing;
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdDownload, LdRefreshCw};
use multishot_core::{GeneratedImage, ResultView};

use crate::{download, raster};

/// Props for the [`ResultDisplay`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ResultDisplayProps {
    /// A generation request is in flight.
    loading: bool,
    /// Failure message, if the last attempt failed.
    error: Option<String>,
    /// Generated images in response order.
    images: Vec<GeneratedImage>,
    /// Start a new session.
    on_reset: EventHandler<()>,
}

/// Shows exactly one of: a spinner, an error with "Start Over", or the
/// gallery with per-image downloads and "Start a New Project".
#[component]
pub fn ResultDisplay(props: ResultDisplayProps) -> Element {
    let on_reset = props.on_reset;

    match ResultView::select(props.loading, props.error.as_deref(), &props.images) {
        ResultView::Loading => rsx! {
            section { class: "panel center",
                div { class: "spinner", role: "progressbar", aria_label: "Generating" }
                h2 { class: "panel-title", "Generating Your Images..." }
                p { class: "panel-subtitle",
                    "This can take a minute. Each composition is rendered in turn."
                }
            }
        },

        ResultView::Failed(message) => rsx! {
            section { class: "panel center",
                h2 { class: "panel-title error-text", "Generation Failed" }
                p { class: "error-detail", "{message}" }
                button {
                    class: "btn btn-primary",
                    onclick: move |_| on_reset.call(()),
                    Icon { icon: LdRefreshCw, width: 18, height: 18 }
                    "Start Over"
                }
            }
        },

        ResultView::Gallery(images) => rsx! {
            section { class: "panel",
                h2 { class: "panel-title", "Your generated images" }
                div { class: "gallery",
                    for (i, image) in images.iter().enumerate() {
                        GalleryTile { key: "{i}", index: i, image: image.clone() }
                    }
                }
                div { class: "button-row",
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| on_reset.call(()),
                        Icon { icon: LdRefreshCw, width: 18, height: 18 }
                        "Start a New Project"
                    }
                }
            }
        },
    }
}

/// One gallery tile with a hover-revealed download button.
///
/// The Blob URL is created once per tile and revoked when the tile is
/// destroyed, whether or not the image ever finished loading.
#[component]
fn GalleryTile(index: usize, image: GeneratedImage) -> Element {
    let number = index + 1;
    let blob_url = use_signal(|| {
        raster::image_to_blob_url(image.image()).map_err(|e| e.to_string())
    });

    use_drop(move || {
        if let Ok(ref url) = *blob_url.peek() {
            raster::revoke_blob_url(url);
        }
    });

    let on_download = move |_| {
        if let Err(e) = download::download_generated(&image, index) {
            tracing::warn!("download of image {number} failed: {e}");
        }
    };

    let body = match &*blob_url.read() {
        Ok(url) => rsx! {
            img { src: "{url}", alt: "Generated image {number}" }
        },
        Err(e) => rsx! {
            p { class: "error-text", "Cannot display image {number}: {e}" }
        },
    };

    rsx! {
        figure { class: "gallery-tile",
            {body}
            button {
                class: "download-button",
                title: "Download",
                aria_label: "Download image {number}",
                onclick: on_download,
                Icon { icon: LdDownload, width: 18, height: 18 }
            }
        }
    }
}
