// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Enhance page: upload an image, tune the sliders, enhance, compare and
// download.

use std::sync::Arc;

use dioxus::prelude::*;

use retouch_core::human_errors::humanize_error;
use retouch_core::types::{BRIGHTNESS, CONTRAST, DENOISE, ParamRange, SHARPNESS};
use retouch_core::ImageFormatKind;
use retouch_image::DOWNLOAD_FILE_NAME;

use crate::services::app_services::AppServices;
use crate::state::{AppState, SessionStage, Status};

#[component]
pub fn Enhance() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();

    let stage = state.read().session.stage();
    let enhancing = state.read().session.is_enhancing();
    let busy = enhancing || state.read().status.is_working();
    let params = state.read().params;
    let original = state
        .read()
        .session
        .original()
        .map(|u| (format!("{}, {}", u.file_name, u.format.mime_type()), u.preview_url.clone()));
    let enhanced = state.read().session.enhancement().map(|e| {
        let p = e.params;
        let caption = format!(
            "brightness {:.1}, contrast {:.1}, sharpness {:.1}, denoise {}",
            p.brightness, p.contrast, p.sharpness, p.denoise_strength
        );
        (caption, e.preview_url.clone())
    });
    let status = state.read().status.clone();

    rsx! {
        div {
            h1 { "Image Enhancement" }
            p { style: "color: #666;", "Upload a JPEG or PNG, adjust the sliders, then enhance." }

            // Upload
            button {
                style: "width: 100%; padding: 16px; border-radius: 12px; border: 2px dashed #007aff; color: #007aff; background: white; font-size: 16px; margin: 16px 0;",
                disabled: busy,
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let Some(path) = rfd::FileDialog::new()
                            .add_filter("Images", &ImageFormatKind::EXTENSIONS)
                            .pick_file()
                        else {
                            return;
                        };
                        state.write().status = Status::Working("Loading image...");
                        let svc = svc.clone();
                        spawn(async move {
                            match svc.open_upload(path).await {
                                Ok(upload) => {
                                    let mut st = state.write();
                                    st.session.upload(upload);
                                    st.status = Status::Idle;
                                }
                                Err(e) => {
                                    tracing::warn!(error = %e, "upload rejected");
                                    state.write().status = Status::Failed(humanize_error(&e));
                                }
                            }
                        });
                    }
                },
                if stage == SessionStage::NoImage { "Upload an image" } else { "Choose a different image" }
            }

            if stage == SessionStage::NoImage {
                p { style: "text-align: center; color: #aaa; margin: 48px 0;",
                    "No image uploaded yet."
                }
            } else {
                // Sliders
                section { style: "margin: 16px 0;",
                    ParamSlider {
                        range: BRIGHTNESS,
                        value: params.brightness,
                        on_change: move |v: f32| { state.write().params.brightness = v; },
                    }
                    ParamSlider {
                        range: CONTRAST,
                        value: params.contrast,
                        on_change: move |v: f32| { state.write().params.contrast = v; },
                    }
                    ParamSlider {
                        range: SHARPNESS,
                        value: params.sharpness,
                        on_change: move |v: f32| { state.write().params.sharpness = v; },
                    }
                    ParamSlider {
                        range: DENOISE,
                        value: f32::from(params.denoise_strength),
                        on_change: move |v: f32| { state.write().params.denoise_strength = v.round() as u8; },
                    }
                    div { style: "display: flex; gap: 8px; margin-top: 8px;",
                        button {
                            style: "flex: 1; padding: 8px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 14px;",
                            onclick: move |_| {
                                let defaults = state.read().config.default_parameters;
                                state.write().params = defaults;
                            },
                            "Reset sliders"
                        }
                        button {
                            style: "flex: 1; padding: 8px; border-radius: 8px; border: 1px solid #ccc; background: white; font-size: 14px;",
                            onclick: {
                                let svc = svc.clone();
                                move |_| {
                                    let mut config = state.read().config.clone();
                                    config.default_parameters = state.read().params.clamped();
                                    match svc.save_config(&config) {
                                        Ok(saved) => {
                                            let mut st = state.write();
                                            st.config = saved;
                                            st.status = Status::Success("Slider positions saved as defaults.".into());
                                        }
                                        Err(e) => {
                                            tracing::error!(error = %e, "failed to save defaults");
                                            state.write().status = Status::Failed(humanize_error(&e));
                                        }
                                    }
                                }
                            },
                            "Save as defaults"
                        }
                    }
                }

                // Trigger
                button {
                    style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px;",
                    disabled: busy,
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let Some(ticket) = state.write().session.start_enhance() else {
                                return;
                            };
                            let params = state.read().params.clamped();
                            state.write().status = Status::Working("Enhancing...");
                            tracing::info!(?params, "enhancement triggered");

                            let svc = svc.clone();
                            spawn(async move {
                                let outcome = svc.enhance(ticket.image, params).await;
                                let mut st = state.write();
                                match outcome {
                                    Ok(result) => {
                                        if st.session.complete_enhance(ticket.generation, result) {
                                            st.status = Status::Success("Enhanced image ready!".into());
                                        }
                                    }
                                    Err(e) => {
                                        tracing::error!(error = %e, "enhancement failed");
                                        st.session.fail_enhance(ticket.generation);
                                        st.status = Status::Failed(humanize_error(&e));
                                    }
                                }
                            });
                        }
                    },
                    if enhancing { "Enhancing..." } else { "Enhance Image" }
                }
            }

            {status_line(&status)}

            // Side-by-side previews
            if let Some((label, url)) = original {
                div { style: "display: flex; gap: 16px; margin-top: 16px;",
                    figure { style: "flex: 1; margin: 0;",
                        img { src: "{url}", style: "width: 100%; border-radius: 4px;" }
                        figcaption { style: "color: #666; font-size: 14px; text-align: center;",
                            "Original ({label})"
                        }
                    }
                    if let Some((caption, url)) = enhanced {
                        figure { style: "flex: 1; margin: 0;",
                            img { src: "{url}", style: "width: 100%; border-radius: 4px;" }
                            figcaption { style: "color: #666; font-size: 14px; text-align: center;",
                                "Enhanced ({caption})"
                            }
                        }
                    }
                }
            }

            // Download
            if stage == SessionStage::Enhanced {
                button {
                    style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #34c759; color: white; font-size: 16px; margin-top: 16px;",
                    disabled: busy,
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let Some(image) = state
                                .read()
                                .session
                                .enhancement()
                                .map(|e| Arc::clone(&e.image))
                            else {
                                return;
                            };
                            let Some(path) = rfd::FileDialog::new()
                                .set_file_name(DOWNLOAD_FILE_NAME)
                                .add_filter("JPEG", &["jpg", "jpeg"])
                                .save_file()
                            else {
                                return;
                            };
                            state.write().status = Status::Working("Saving...");
                            let svc = svc.clone();
                            spawn(async move {
                                let outcome = svc.save_download(image, path.clone()).await;
                                state.write().status = match outcome {
                                    Ok(_) => Status::Success(format!("Saved to {}", path.display())),
                                    Err(e) => {
                                        tracing::error!(error = %e, "download failed");
                                        Status::Failed(humanize_error(&e))
                                    }
                                };
                            });
                        }
                    },
                    "Download Enhanced Image"
                }
            }
        }
    }
}

#[component]
fn ParamSlider(range: ParamRange, value: f32, on_change: EventHandler<f32>) -> Element {
    let shown = if range.step >= 1.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    };
    rsx! {
        div { style: "padding: 8px 0; border-bottom: 1px solid #f0f0f0;",
            div { style: "display: flex; justify-content: space-between;",
                span { "{range.label}" }
                span { style: "color: #666;", "{shown}" }
            }
            input {
                r#type: "range",
                style: "width: 100%;",
                min: "{range.min}",
                max: "{range.max}",
                step: "{range.step}",
                value: "{value}",
                oninput: move |evt| {
                    if let Ok(v) = evt.value().parse::<f32>() {
                        on_change.call(range.clamp(v));
                    }
                },
            }
        }
    }
}

fn status_line(status: &Status) -> Element {
    match status {
        Status::Idle => rsx! {},
        Status::Working(msg) => rsx! {
            p { style: "margin-top: 8px; color: #666; font-size: 14px; text-align: center;", "{msg}" }
        },
        Status::Success(msg) => rsx! {
            p { style: "margin-top: 8px; color: #34c759; font-size: 14px; text-align: center;", "{msg}" }
        },
        Status::Failed(human) => {
            let color = human.severity.color();
            rsx! {
                div { style: "margin-top: 8px; padding: 12px; border-radius: 8px; border: 1px solid {color};",
                    p { style: "margin: 0; font-weight: bold; color: {color};", "{human.message}" }
                    p { style: "margin: 4px 0 0; color: #666; font-size: 14px;", "{human.suggestion}" }
                    if let Some(hint) = human.retry_hint() {
                        p { style: "margin: 4px 0 0; color: #999; font-size: 13px;", "{hint}" }
                    }
                }
            }
        }
    }
}
