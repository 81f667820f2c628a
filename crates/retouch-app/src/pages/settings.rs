// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Settings page — persistent app configuration.

use dioxus::prelude::*;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Settings() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut save_msg = use_signal(|| Option::<String>::None);

    let defaults = state.read().config.default_parameters;
    let defaults_summary = format!(
        "Brightness {:.1}, contrast {:.1}, sharpness {:.1}, denoise {}.",
        defaults.brightness, defaults.contrast, defaults.sharpness, defaults.denoise_strength
    );

    rsx! {
        div {
            h1 { "Settings" }

            section { style: "margin: 16px 0;",
                h3 { "Output" }
                NumberRow {
                    label: "Download JPEG quality (1-100)",
                    value: u32::from(state.read().config.jpeg_quality),
                    on_change: move |v: u32| {
                        state.write().config.jpeg_quality = v.clamp(1, 100) as u8;
                    },
                }
                NumberRow {
                    label: "Preview size (longest edge, px)",
                    value: state.read().config.preview_max_dimension,
                    on_change: move |v: u32| {
                        state.write().config.preview_max_dimension = v.max(64);
                    },
                }
            }

            section { style: "margin: 16px 0;",
                h3 { "Slider defaults" }
                p { style: "color: #666; font-size: 14px;",
                    "{defaults_summary} Change these with \"Save as defaults\" on the Enhance page."
                }
            }

            // Save button
            button {
                style: "width: 100%; padding: 12px; border-radius: 8px; border: none; background: #007aff; color: white; font-size: 16px; margin-top: 8px;",
                onclick: {
                    let svc = svc.clone();
                    move |_| {
                        let config = state.read().config.clone();
                        match svc.save_config(&config) {
                            Ok(saved) => {
                                state.write().config = saved;
                                save_msg.set(Some("Settings saved.".into()));
                            }
                            Err(e) => {
                                tracing::error!(error = %e, "failed to save settings");
                                save_msg.set(Some(format!("Save failed: {e}")));
                            }
                        }
                    }
                },
                "Save Settings"
            }
            if let Some(ref msg) = *save_msg.read() {
                p { style: "color: #34c759; font-size: 14px; text-align: center; margin-top: 8px;",
                    "{msg}"
                }
            }

            section { style: "margin: 24px 0;",
                h3 { "About" }
                p { style: "color: #666; font-size: 14px;",
                    "Retouch v0.1.0"
                    br {}
                    "Interactive Image Enhancement"
                    br {}
                    "PMPL-1.0-or-later"
                }
            }
        }
    }
}

#[component]
fn NumberRow(label: &'static str, value: u32, on_change: EventHandler<u32>) -> Element {
    rsx! {
        div { style: "display: flex; justify-content: space-between; align-items: center; padding: 12px 0; border-bottom: 1px solid #f0f0f0;",
            span { "{label}" }
            input {
                r#type: "number",
                style: "width: 80px; padding: 4px 8px; border: 1px solid #ccc; border-radius: 4px; text-align: right;",
                value: "{value}",
                onchange: move |evt| {
                    if let Ok(v) = evt.value().parse::<u32>() {
                        on_change.call(v);
                    }
                },
            }
        }
    }
}
