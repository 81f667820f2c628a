// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Non-local-means filter over interleaved 8-bit planes.
//
// Rather than comparing patches pixel by pixel, the filter walks every offset
// in the search window once. For a fixed offset it builds the per-pixel
// squared-difference image, turns it into a summed-area table, and reads each
// patch distance back with four lookups. Cost is O(search_area * pixels)
// regardless of the template size.

use tracing::{debug, instrument};

/// Weights smaller than this are treated as zero.
const WEIGHT_THRESHOLD: f64 = 0.001;

/// Denoise `src`, an interleaved `width * height * channels` buffer.
///
/// Each output pixel is the weighted mean of the pixels in its
/// `search_window` neighbourhood, with weight
/// `exp(-d2 / (h^2 * channels))` where `d2` is the squared difference between
/// the two `template_window` patches, averaged over the patch area and summed
/// over channels. Both windows must be odd. Pixels outside the image are
/// mirrored about the image edge.
#[instrument(skip(src), fields(len = src.len()))]
pub fn nl_means(
    src: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    h: f32,
    template_window: usize,
    search_window: usize,
) -> Vec<u8> {
    if h <= 0.0 || width == 0 || height == 0 || channels == 0 {
        return src.to_vec();
    }

    let template_radius = template_window / 2;
    let search_radius = search_window / 2;
    let pad = template_radius + search_radius;
    let padded = pad_reflect(src, width, height, channels, pad);
    let padded_width = width + 2 * pad;

    // The difference image covers every pixel any template around an image
    // pixel can touch.
    let diff_width = width + 2 * template_radius;
    let diff_height = height + 2 * template_radius;
    let mut diff = vec![0u32; diff_width * diff_height];

    let patch_area = (template_window * template_window) as f64;
    let denom = f64::from(h) * f64::from(h) * channels as f64;

    let mut weight_sums = vec![0f64; width * height];
    let mut accum = vec![0f64; width * height * channels];

    let radius = search_radius as isize;
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            for v in 0..diff_height {
                let row = v + search_radius;
                let shifted_row = (row as isize + dy) as usize;
                for u in 0..diff_width {
                    let col = u + search_radius;
                    let shifted_col = (col as isize + dx) as usize;
                    let a = (row * padded_width + col) * channels;
                    let b = (shifted_row * padded_width + shifted_col) * channels;
                    diff[v * diff_width + u] = squared_distance(
                        &padded[a..a + channels],
                        &padded[b..b + channels],
                    );
                }
            }

            let table = summed_area_table(&diff, diff_width, diff_height);

            for y in 0..height {
                for x in 0..width {
                    let ssd = box_sum(&table, diff_width, x, y, template_window);
                    let weight = (-(ssd as f64 / patch_area) / denom).exp();
                    if weight < WEIGHT_THRESHOLD {
                        continue;
                    }

                    let qy = (y + pad) as isize + dy;
                    let qx = (x + pad) as isize + dx;
                    let q = (qy as usize * padded_width + qx as usize) * channels;
                    let p = y * width + x;

                    weight_sums[p] += weight;
                    for c in 0..channels {
                        accum[p * channels + c] += weight * f64::from(padded[q + c]);
                    }
                }
            }
        }
    }

    debug!(width, height, channels, "Non-local means pass complete");

    // The zero offset always contributes weight 1, so every sum is >= 1.
    accum
        .iter()
        .enumerate()
        .map(|(i, &sum)| {
            let value = sum / weight_sums[i / channels];
            value.round().clamp(0.0, 255.0) as u8
        })
        .collect()
}

/// Sum of squared per-channel differences between two pixels.
fn squared_distance(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(&p, &q)| {
            let d = i32::from(p) - i32::from(q);
            (d * d) as u32
        })
        .sum()
}

/// Copy `src` into a buffer enlarged by `pad` pixels on every side, filling
/// the border by mirroring around the edge pixel (`dcb|abcd|cba`, the edge
/// itself is not repeated).
fn pad_reflect(src: &[u8], width: usize, height: usize, channels: usize, pad: usize) -> Vec<u8> {
    let padded_width = width + 2 * pad;
    let padded_height = height + 2 * pad;
    let mut out = vec![0u8; padded_width * padded_height * channels];

    for py in 0..padded_height {
        let sy = reflect_index(py as isize - pad as isize, height);
        for px in 0..padded_width {
            let sx = reflect_index(px as isize - pad as isize, width);
            let from = (sy * width + sx) * channels;
            let to = (py * padded_width + px) * channels;
            out[to..to + channels].copy_from_slice(&src[from..from + channels]);
        }
    }

    out
}

/// Map a possibly out-of-range coordinate into `0..len` by reflection about
/// the first and last samples. Padding wider than the image folds repeatedly.
fn reflect_index(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let i = i.rem_euclid(period);
    if i >= len as isize {
        (period - i) as usize
    } else {
        i as usize
    }
}

/// Compute the summed-area table of `values`.
///
/// `table[y * (width+1) + x]` holds the sum of all values in the rectangle
/// [0, 0) to (x, y), exclusive on both axes, so the table has a zero-padded
/// first row and column.
fn summed_area_table(values: &[u32], width: usize, height: usize) -> Vec<u64> {
    let stride = width + 1;
    let mut table = vec![0u64; stride * (height + 1)];

    for y in 0..height {
        let mut row_sum: u64 = 0;
        for x in 0..width {
            row_sum += u64::from(values[y * width + x]);
            table[(y + 1) * stride + (x + 1)] = row_sum + table[y * stride + (x + 1)];
        }
    }

    table
}

/// Sum over the `size x size` square whose top-left corner is (x, y).
fn box_sum(table: &[u64], width: usize, x: usize, y: usize, size: usize) -> u64 {
    let stride = width + 1;
    let (x2, y2) = (x + size, y + size);
    table[y2 * stride + x2] + table[y * stride + x] - table[y * stride + x2] - table[y2 * stride + x]
}
