//! Composition step: orbit the reference figure and capture snapshots.
//!
//! The viewport is rendered in software and blitted onto a `<canvas>`
//! after every camera change. Left-drag orbits, the wheel zooms, and
//! there is no pan.

use dioxus::html::input_data::MouseButton;
use dioxus::html::{InteractionLocation, PointerInteraction};
use dioxus::logger::tracing;
use dioxus::prelude::*;
use dioxus_free_icons::Icon;
use dioxus_free_icons::icons::ld_icons::{LdCamera, LdCheck};
use multishot_core::{AspectRatio, CompositionDeck, CompositionImage, MAX_COMPOSITIONS, Viewport};

use crate::raster;

/// Element id of the viewport canvas.
const CANVAS_ID: &str = "composition-canvas";

/// Props for the [`CompositionTool`] component.
#[derive(Props, Clone, PartialEq)]
pub struct CompositionToolProps {
    /// Shape of the viewport and of every snapshot.
    aspect_ratio: AspectRatio,
    /// Called with the captured snapshots, in capture order.
    on_complete: EventHandler<Vec<CompositionImage>>,
}

/// Interactive viewport with capture, thumbnails, and confirm.
#[component]
pub fn CompositionTool(props: CompositionToolProps) -> Element {
    let aspect_ratio = props.aspect_ratio;
    let on_complete = props.on_complete;

    let mut viewport = use_signal(move || Viewport::new(aspect_ratio));
    let mut deck = use_signal(CompositionDeck::new);
    let mut drag_from = use_signal(|| Option::<(f64, f64)>::None);
    let mut error = use_signal(|| Option::<String>::None);
    // One Blob URL per captured snapshot, parallel to the deck. Kept for
    // the life of the component and revoked when it is destroyed.
    let mut thumbnails = use_signal(Vec::<Option<String>>::new);

    use_drop(move || {
        for url in thumbnails.peek().iter().flatten() {
            raster::revoke_blob_url(url);
        }
    });

    // First frame, once the canvas is mounted.
    use_effect(move || redraw(viewport));

    let on_pointer_down = move |evt: PointerEvent| {
        if evt.trigger_button() == Some(MouseButton::Primary) {
            let p = evt.client_coordinates();
            drag_from.set(Some((p.x, p.y)));
        }
    };

    #[allow(clippy::cast_possible_truncation)]
    let on_pointer_move = move |evt: PointerEvent| {
        let Some((x0, y0)) = *drag_from.peek() else {
            return;
        };
        let p = evt.client_coordinates();
        drag_from.set(Some((p.x, p.y)));

        let scale = raster::css_to_canvas_scale(CANVAS_ID).unwrap_or(1.0);
        viewport
            .write()
            .orbit((p.x - x0) as f32 * scale, (p.y - y0) as f32 * scale);
        redraw(viewport);
    };

    let end_drag = move |_: PointerEvent| drag_from.set(None);

    #[allow(clippy::cast_possible_truncation)]
    let on_wheel = move |evt: WheelEvent| {
        evt.prevent_default();
        viewport.write().zoom(evt.delta().strip_units().y as f32);
        redraw(viewport);
    };

    let on_capture = move |_| {
        let shot = viewport.write().capture();
        match shot {
            Ok(image) => {
                let url = raster::image_to_blob_url(image.image());
                match deck.write().capture(image) {
                    Ok(count) => {
                        tracing::info!(count, "composition captured");
                        let url = url
                            .inspect_err(|e| tracing::warn!("thumbnail {count} unavailable: {e}"))
                            .ok();
                        thumbnails.write().push(url);
                        error.set(None);
                    }
                    Err(e) => {
                        if let Ok(url) = url {
                            raster::revoke_blob_url(&url);
                        }
                        error.set(Some(e.to_string()));
                    }
                }
            }
            Err(e) => {
                tracing::warn!("capture failed: {e}");
                error.set(Some(format!("Could not capture the view: {e}")));
            }
        }
    };

    let on_confirm = move |_| match deck.take().confirm() {
        Ok(images) => on_complete.call(images),
        Err(e) => error.set(Some(e.to_string())),
    };

    let deck_ref = deck.read();
    let urls = thumbnails.read();
    let count = deck_ref.len();
    let can_capture = deck_ref.can_capture();
    let can_confirm = deck_ref.can_confirm();
    let size = aspect_ratio.viewport_size();
    let (w, h) = (size.width, size.height);

    rsx! {
        section { class: "panel",
            h2 { class: "panel-title", "Create your compositions" }
            p { class: "panel-subtitle",
                "Drag to rotate the figure and scroll to zoom. Capture up to {MAX_COMPOSITIONS} camera angles."
            }

            div { class: "viewport-frame",
                canvas {
                    id: CANVAS_ID,
                    class: "viewport-canvas",
                    width: "{w}",
                    height: "{h}",
                    style: "aspect-ratio: {w} / {h};",
                    onpointerdown: on_pointer_down,
                    onpointermove: on_pointer_move,
                    onpointerup: end_drag,
                    onpointerleave: end_drag,
                    onwheel: on_wheel,
                    oncontextmenu: move |evt| evt.prevent_default(),
                }
            }

            if let Some(ref err) = error() {
                p { class: "error-text", "{err}" }
            }

            div { class: "button-row",
                button {
                    class: "btn btn-primary",
                    disabled: !can_capture,
                    onclick: on_capture,
                    Icon { icon: LdCamera, width: 18, height: 18 }
                    "Capture Composition ({count}/{MAX_COMPOSITIONS})"
                }
            }

            div { class: "thumbnail-row",
                for (i, slot) in deck_ref.slots().enumerate() {
                    {render_slot(i, slot.map(|_| urls.get(i).and_then(Option::as_deref)), w, h)}
                }
            }

            div { class: "button-row",
                button {
                    class: "btn btn-accent",
                    disabled: !can_confirm,
                    onclick: on_confirm,
                    Icon { icon: LdCheck, width: 18, height: 18 }
                    "Confirm Compositions"
                }
            }
        }
    }
}

/// Render the current frame onto the canvas.
fn redraw(mut viewport: Signal<Viewport>) {
    let mut viewport = viewport.write();
    match viewport.render() {
        Ok(frame) => {
            if let Err(e) = raster::blit_frame(CANVAS_ID, frame) {
                tracing::warn!("viewport blit failed: {e}");
            }
        }
        Err(e) => tracing::warn!("viewport render failed: {e}"),
    }
}

/// A captured thumbnail or a dashed placeholder. `Some(None)` is a
/// snapshot whose thumbnail could not be created.
fn render_slot(index: usize, slot: Option<Option<&str>>, w: u32, h: u32) -> Element {
    let number = index + 1;
    match slot {
        None => rsx! {
            div { class: "thumbnail placeholder", style: "aspect-ratio: {w} / {h};",
                "{number}"
            }
        },
        Some(None) => rsx! {
            div { class: "thumbnail placeholder", style: "aspect-ratio: {w} / {h};", "!" }
        },
        Some(Some(url)) => rsx! {
            img {
                class: "thumbnail",
                style: "aspect-ratio: {w} / {h};",
                src: "{url}",
                alt: "Composition {number}",
            }
        },
    }
}
