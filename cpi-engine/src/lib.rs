// Copyright (c) 2026 The CPI Project Developers
// SPDX-License-Identifier: MIT
// Project: CPI
// Module: cpi-engine

//! Safety-interlock decision engine for a coolant pump.
//!
//! The crate is a pure decision core: it maps one sensor reading and an
//! optional operator command to a pump state. There is no I/O, no clock,
//! and no mutation of shared state; every public function returns
//! synchronously and is safe to call concurrently against a shared
//! read-only [`SafetyConfig`].
//!
//! The two supporting algorithms live in their own modules:
//! [`saturation`] (pressure to saturation-temperature interpolation) and
//! [`auth`] (operator command authentication).

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![deny(clippy::todo, clippy::unimplemented)]

pub mod auth;
pub mod evaluate;
pub mod model;
pub mod requirement_ids;
pub mod saturation;

pub use evaluate::{evaluate, InterlockEngine};
pub use model::{
    CommandAction, EvaluationResult, OperatorCommand, SafetyConfig, SensorReading, TripReason,
};
pub use saturation::saturation_temp;
