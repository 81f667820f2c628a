// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// 8-bit CIE L*a*b* packing for the denoiser.
//
// Channel values are taken as linear RGB (no sRGB transfer curve) and
// converted to D65 Lab with `palette`. Encoding: L is scaled from 0..100 to
// 0..255, a and b are offset by 128.

use palette::white_point::D65;
use palette::{IntoColor, Lab, LinSrgb};

type LabD65 = Lab<D65, f32>;

const L_SCALE: f32 = 255.0 / 100.0;
const AB_OFFSET: f32 = 128.0;

/// Convert one `[b, g, r]` pixel to encoded `[L, a, b]`.
pub fn bgr_to_lab(bgr: [u8; 3]) -> [u8; 3] {
    let [b, g, r] = bgr.map(|c| f32::from(c) / 255.0);
    let lab: LabD65 = LinSrgb::new(r, g, b).into_color();
    [
        saturate(lab.l * L_SCALE),
        saturate(lab.a + AB_OFFSET),
        saturate(lab.b + AB_OFFSET),
    ]
}

/// Convert one encoded `[L, a, b]` pixel back to `[b, g, r]`.
pub fn lab_to_bgr(lab: [u8; 3]) -> [u8; 3] {
    let lab = LabD65::new(
        f32::from(lab[0]) / L_SCALE,
        f32::from(lab[1]) - AB_OFFSET,
        f32::from(lab[2]) - AB_OFFSET,
    );
    let rgb: LinSrgb = lab.into_color();
    [rgb.blue, rgb.green, rgb.red].map(|c| saturate(c.clamp(0.0, 1.0) * 255.0))
}

fn saturate(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
