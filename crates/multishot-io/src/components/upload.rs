//! Character photo uploader with drag-and-drop, preview, and submit.

use dioxus::html::{FileData, HasFileData};
use dioxus::logger::tracing;
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdUpload, LdWandSparkles};
use multishot_core::upload::resolve_mime;
use multishot_core::{CharacterImage, UploadDraft, UploadError};

use crate::raster;

/// Props for the [`ImageUploader`] component.
#[derive(Props, Clone, PartialEq)]
pub struct ImageUploaderProps {
    /// Called once with the chosen photo when the user asks to generate.
    on_upload: EventHandler<CharacterImage>,
}

/// File picker restricted to images, with an inline preview and a
/// "Generate Images" button that is enabled only once a valid image is
/// loaded.
#[component]
pub fn ImageUploader(props: ImageUploaderProps) -> Element {
    let on_upload = props.on_upload;
    let mut draft = use_signal(UploadDraft::new);
    let mut dragging = use_signal(|| false);
    let mut preview_url = use_signal(|| Option::<String>::None);

    // Revoke the preview URL when the component is destroyed.
    use_drop(move || {
        if let Some(ref url) = *preview_url.peek() {
            raster::revoke_blob_url(url);
        }
    });

    // Validate, read, and store the first file from a list. Shared by
    // the picker and drag-and-drop paths.
    let process_files = move |files: Vec<FileData>| async move {
        let Some(file) = files.first() else {
            return;
        };
        let name = file.name();
        let mime = resolve_mime(&name, file.content_type().as_deref());

        if let Some(old) = preview_url.take() {
            raster::revoke_blob_url(&old);
        }
        if draft.write().begin_read(&name, &mime).is_err() {
            return;
        }

        let bytes = match file.read_bytes().await {
            Ok(bytes) => bytes.to_vec(),
            Err(e) => {
                tracing::warn!("failed to read {name}: {e}");
                draft.write().fail(&UploadError::Read(e.to_string()));
                return;
            }
        };

        if draft.write().select(&name, &mime, bytes).is_err() {
            return;
        }
        if let Some(image) = draft.peek().preview() {
            match raster::image_to_blob_url(image.image()) {
                Ok(url) => preview_url.set(Some(url)),
                Err(e) => tracing::warn!("preview unavailable: {e}"),
            }
        }
    };

    let handle_files = move |evt: FormEvent| async move {
        process_files(evt.files()).await;
    };

    let handle_drop = move |evt: DragEvent| async move {
        evt.prevent_default();
        dragging.set(false);
        process_files(evt.files()).await;
    };

    let on_generate = move |_| {
        if let Some(image) = draft.write().submit() {
            on_upload.call(image);
        }
    };

    let zone_class = if dragging() { "drop-zone dragging" } else { "drop-zone" };
    let draft_ref = draft.read();
    let can_submit = draft_ref.can_submit();

    rsx! {
        section { class: "panel",
            h2 { class: "panel-title", "Upload your character" }
            p { class: "panel-subtitle",
                "This photo is re-rendered from each of your captured angles."
            }

            label {
                class: "{zone_class}",
                ondragover: move |evt| {
                    evt.prevent_default();
                    dragging.set(true);
                },
                ondragleave: move |_| dragging.set(false),
                ondrop: handle_drop,

                input {
                    r#type: "file",
                    accept: "image/*",
                    class: "hidden",
                    onchange: handle_files,
                }

                if let Some(ref url) = preview_url() {
                    img { class: "upload-preview", src: "{url}", alt: "Character preview" }
                } else {
                    div { class: "drop-zone-empty",
                        Icon { icon: LdUpload, width: 40, height: 40 }
                        p { "Click to upload or drag and drop" }
                        p { class: "hint", "PNG, JPG, GIF up to 10MB" }
                    }
                }
            }

            if let Some(err) = draft_ref.error() {
                p { class: "error-text", "{err}" }
            }

            div { class: "button-row",
                button {
                    class: "btn btn-accent",
                    disabled: !can_submit,
                    onclick: on_generate,
                    Icon { icon: LdWandSparkles, width: 18, height: 18 }
                    "Generate Images"
                }
            }
        }
    }
}
