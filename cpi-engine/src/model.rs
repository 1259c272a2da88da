// Copyright (c) 2026 The CPI Project Developers
// SPDX-License-Identifier: MIT
// Project: CPI
// Module: cpi-engine::model

//! Shared data-model types for the interlock engine.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single sensor sample supplied to one evaluation call.
///
/// Ephemeral: carries no identity and is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    /// Coolant temperature in degrees Celsius.
    pub temperature_c: f64,
    /// Coolant pressure in bar.
    pub pressure_bar: f64,
}

/// Action requested by an operator command.
///
/// Serialized as the literal action string; unrecognized strings are
/// preserved as [`CommandAction::Other`] because the integrity code is
/// computed over the exact payload text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CommandAction {
    /// Request an immediate pump shutdown.
    Shutdown,
    /// Explicit no-op action.
    None,
    /// Any other action text.
    Other(String),
}

impl CommandAction {
    /// The literal action string, as used in the integrity-code payload.
    pub fn as_str(&self) -> &str {
        match self {
            CommandAction::Shutdown => "Shutdown",
            CommandAction::None => "None",
            CommandAction::Other(text) => text,
        }
    }
}

impl From<String> for CommandAction {
    fn from(text: String) -> Self {
        match text.as_str() {
            "Shutdown" => CommandAction::Shutdown,
            "None" => CommandAction::None,
            _ => CommandAction::Other(text),
        }
    }
}

impl From<CommandAction> for String {
    fn from(action: CommandAction) -> Self {
        action.as_str().to_string()
    }
}

impl fmt::Display for CommandAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An operator command presented alongside a sensor reading.
///
/// Treated as untrusted input: it is authenticated by [`crate::auth`] and
/// silently ignored when the check fails. Never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorCommand {
    /// Identity the command claims to come from (case-sensitive).
    pub user_id: String,
    /// Requested action.
    pub action: CommandAction,
    /// Two-hex-digit integrity code over `user_id + "|" + action`.
    pub integrity_code: String,
}

impl OperatorCommand {
    /// Build a command carrying a freshly computed integrity code.
    ///
    /// This is the one place demonstration fixtures and tests obtain
    /// well-formed commands, so the checksum definition cannot drift
    /// between producer and checker.
    pub fn signed(user_id: impl Into<String>, action: CommandAction) -> Self {
        let user_id = user_id.into();
        let integrity_code = crate::auth::integrity_code(&user_id, action.as_str());
        Self {
            user_id,
            action,
            integrity_code,
        }
    }
}

/// Interlock thresholds and the set of authorized operators.
///
/// Immutable after construction: all fields are private and only read
/// accessors exist, so a constructed instance can be shared by reference
/// across any number of concurrent evaluations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    subcool_margin_c: f64,
    min_pressure_bar: f64,
    max_temp_clamp_c: f64,
    authorized_users: BTreeSet<String>,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            subcool_margin_c: 25.0,
            min_pressure_bar: 70.0,
            max_temp_clamp_c: 335.0,
            authorized_users: ["operatorA".to_string()].into_iter().collect(),
        }
    }
}

impl SafetyConfig {
    /// Construct a configuration with explicit thresholds and operators.
    pub fn new(
        subcool_margin_c: f64,
        min_pressure_bar: f64,
        max_temp_clamp_c: f64,
        authorized_users: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            subcool_margin_c,
            min_pressure_bar,
            max_temp_clamp_c,
            authorized_users: authorized_users.into_iter().collect(),
        }
    }

    /// Required temperature buffer below saturation, in °C.
    pub fn subcool_margin_c(&self) -> f64 {
        self.subcool_margin_c
    }

    /// Minimum allowed coolant pressure, in bar.
    pub fn min_pressure_bar(&self) -> f64 {
        self.min_pressure_bar
    }

    /// Hard temperature clamp, in °C.
    pub fn max_temp_clamp_c(&self) -> f64 {
        self.max_temp_clamp_c
    }

    /// Operators allowed to issue commands.
    pub fn authorized_users(&self) -> &BTreeSet<String> {
        &self.authorized_users
    }
}

/// Why the engine decided the pump state it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TripReason {
    /// All checks passed; pump stays on.
    Normal,
    /// Pressure below the configured minimum.
    LowPressure,
    /// Temperature above the hard clamp.
    HighTempClamp,
    /// Subcooling margin to the saturation temperature not met.
    LowSubcooling,
    /// Authenticated operator shutdown command.
    OperatorShutdown,
}

impl fmt::Display for TripReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TripReason::Normal => "Normal",
            TripReason::LowPressure => "LowPressure",
            TripReason::HighTempClamp => "HighTempClamp",
            TripReason::LowSubcooling => "LowSubcooling",
            TripReason::OperatorShutdown => "OperatorShutdown",
        };
        write!(f, "{name}")
    }
}

/// Outcome of one evaluation call.
///
/// Invariant: `emergency == !pump_on`. The fields are private and the
/// only constructors are [`EvaluationResult::normal`] and
/// [`EvaluationResult::trip`], so the invariant cannot be violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationResult {
    pump_on: bool,
    emergency: bool,
    reason: TripReason,
}

impl EvaluationResult {
    /// The single pump-on state: no emergency, reason `Normal`.
    pub fn normal() -> Self {
        Self {
            pump_on: true,
            emergency: false,
            reason: TripReason::Normal,
        }
    }

    /// A shutdown state for the given reason.
    pub fn trip(reason: TripReason) -> Self {
        Self {
            pump_on: false,
            emergency: true,
            reason,
        }
    }

    /// Whether the pump is commanded on.
    pub fn pump_on(&self) -> bool {
        self.pump_on
    }

    /// Whether the emergency flag is raised.
    pub fn emergency(&self) -> bool {
        self.emergency
    }

    /// The rule that produced this result.
    pub fn reason(&self) -> TripReason {
        self.reason
    }
}

impl fmt::Display for EvaluationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pump_on={} emergency={} reason={}",
            self.pump_on, self.emergency, self.reason
        )
    }
}
