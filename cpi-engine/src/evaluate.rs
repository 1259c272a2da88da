// Copyright (c) 2026 The CPI Project Developers
// SPDX-License-Identifier: MIT
// Project: CPI
// Module: cpi-engine::evaluate

//! The safety evaluation engine.
//!
//! Fixed-order decision rules over one sensor reading, an optional
//! operator command, and a read-only [`SafetyConfig`]. Pure,
//! deterministic, and total: no input combination returns an error.

use crate::auth;
use crate::model::{
    CommandAction, EvaluationResult, OperatorCommand, SafetyConfig, SensorReading, TripReason,
};
use crate::saturation::saturation_temp;

/// Evaluate one input triple against the configured interlocks.
///
/// First matching rule wins:
///
/// 1. valid authenticated `Shutdown` command → `OperatorShutdown`;
/// 2. pressure below minimum → `LowPressure`;
/// 3. temperature above the hard clamp → `HighTempClamp`;
/// 4. subcooling margin to saturation not met → `LowSubcooling`;
/// 5. otherwise the pump stays on (`Normal`).
///
/// An invalid command (unauthorized user or bad integrity code) is a
/// no-op, not an error: evaluation continues at rule 2 on the same call
/// and produces exactly the result the command-free call would. Sensor
/// values are not sanity-checked here; out-of-range and NaN inputs run
/// through the ordinary rules.
pub fn evaluate(
    temperature_c: f64,
    pressure_bar: f64,
    command: Option<&OperatorCommand>,
    config: &SafetyConfig,
) -> EvaluationResult {
    if let Some(cmd) = command {
        if auth::is_valid(cmd, config.authorized_users()) && cmd.action == CommandAction::Shutdown
        {
            return EvaluationResult::trip(TripReason::OperatorShutdown);
        }
        // Rejected or non-shutdown commands fall through to the sensor rules.
    }

    if pressure_bar < config.min_pressure_bar() {
        return EvaluationResult::trip(TripReason::LowPressure);
    }
    if temperature_c > config.max_temp_clamp_c() {
        return EvaluationResult::trip(TripReason::HighTempClamp);
    }

    let tsat = saturation_temp(pressure_bar);
    if temperature_c >= tsat - config.subcool_margin_c() {
        return EvaluationResult::trip(TripReason::LowSubcooling);
    }

    EvaluationResult::normal()
}

/// An engine instance owning one shared, read-only configuration.
///
/// The configuration cannot change for the lifetime of the instance, so
/// an `InterlockEngine` may be shared (for example behind an `Arc`) and
/// evaluated from any number of threads without locking.
#[derive(Debug, Clone)]
pub struct InterlockEngine {
    config: SafetyConfig,
}

impl InterlockEngine {
    /// Create an engine around a constructed configuration.
    pub fn new(config: SafetyConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine evaluates against.
    pub fn config(&self) -> &SafetyConfig {
        &self.config
    }

    /// Evaluate one reading and optional command.
    pub fn evaluate(
        &self,
        reading: SensorReading,
        command: Option<&OperatorCommand>,
    ) -> EvaluationResult {
        evaluate(
            reading.temperature_c,
            reading.pressure_bar,
            command,
            &self.config,
        )
    }
}

impl Default for InterlockEngine {
    fn default() -> Self {
        Self::new(SafetyConfig::default())
    }
}
