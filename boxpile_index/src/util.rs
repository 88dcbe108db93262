// Copyright 2025 the Boxpile Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// `floor(value / cell_size)` as a cell index, saturating outside the `i32` range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn floor_cell(value: f64, cell_size: f64) -> i32 {
    debug_assert!(cell_size > 0.0, "cell size must be strictly positive");
    let t = value / cell_size;
    let coord = t as i32;

    // The cast truncates towards zero; step down for negative fractions.
    if t < 0.0 && f64::from(coord) > t {
        coord.saturating_sub(1)
    } else {
        coord
    }
}

/// `ceil(value / cell_size)` as a cell index, saturating outside the `i32` range.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Cell indices are intentionally i32; out-of-range values are saturated."
)]
#[inline]
pub(crate) fn ceil_cell(value: f64, cell_size: f64) -> i32 {
    debug_assert!(cell_size > 0.0, "cell size must be strictly positive");
    let t = value / cell_size;
    let coord = t as i32;

    // The cast truncates towards zero; step up for positive fractions.
    if t > 0.0 && f64::from(coord) < t {
        coord.saturating_add(1)
    } else {
        coord
    }
}
