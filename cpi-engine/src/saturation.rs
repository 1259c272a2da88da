// Copyright (c) 2026 The CPI Project Developers
// SPDX-License-Identifier: MIT
// Project: CPI
// Module: cpi-engine::saturation

//! Coolant saturation-temperature lookup.
//!
//! A fixed physical reference table, clamped at both ends and linearly
//! interpolated between calibration points. The lookup is a total
//! function: every `f64` input, including NaN, maps to a temperature.

#![allow(clippy::float_arithmetic)]

/// Calibration points as `(pressure_bar, temp_c)`, strictly increasing
/// in pressure. Within ±2 °C of the true saturation curve at each point.
const SATURATION_TABLE: [(f64, f64); 6] = [
    (1.0, 100.0),
    (10.0, 180.0),
    (20.0, 212.0),
    (40.0, 252.0),
    (70.0, 285.0),
    (100.0, 311.0),
];

/// Saturation temperature in °C for the given pressure in bar.
///
/// Inputs at or below the first table pressure clamp to the first table
/// temperature, inputs at or above the last clamp to the last. NaN falls
/// through every bracket test and resolves to the last table temperature.
pub fn saturation_temp(pressure_bar: f64) -> f64 {
    let (first_pressure, first_temp) = SATURATION_TABLE[0];
    if pressure_bar <= first_pressure {
        return first_temp;
    }
    for pair in SATURATION_TABLE.windows(2) {
        let (p0, t0) = pair[0];
        let (p1, t1) = pair[1];
        if pressure_bar <= p1 {
            return t0 + (pressure_bar - p0) / (p1 - p0) * (t1 - t0);
        }
    }
    SATURATION_TABLE[SATURATION_TABLE.len() - 1].1
}
