// Copyright (c) 2026 The CPI Project Developers
// SPDX-License-Identifier: MIT
// Project: CPI
// Module: cpi-engine::requirement_ids

//! The requirement identifiers demonstrated by this engine.
//!
//! Kept in one place so tests and demonstration fixtures tag evidence
//! with the same ids the registry declares.

/// Pump trips when pressure falls below the configured minimum.
pub const LOW_PRESSURE_TRIP: &str = "REQ-001";
/// Pump trips when temperature exceeds the hard clamp.
pub const HIGH_TEMP_CLAMP_TRIP: &str = "REQ-002";
/// Pump trips when the subcooling margin to saturation is not met.
pub const LOW_SUBCOOLING_TRIP: &str = "REQ-003";
/// Pump stays on when every interlock check passes.
pub const NORMAL_OPERATION: &str = "REQ-004";
/// An authenticated operator shutdown always shuts the pump down.
pub const OPERATOR_SHUTDOWN: &str = "REQ-005";
/// Commands carry an integrity checksum over the literal payload.
pub const COMMAND_INTEGRITY: &str = "REQ-006";
/// A rejected command is a transparent no-op, never an error.
pub const REJECTED_COMMAND_FALLTHROUGH: &str = "REQ-007";
/// Configuration is immutable after construction and safely shared.
pub const CONFIG_IMMUTABLE: &str = "REQ-008";

/// All engine requirement ids in registry order.
pub const ALL: [&str; 8] = [
    LOW_PRESSURE_TRIP,
    HIGH_TEMP_CLAMP_TRIP,
    LOW_SUBCOOLING_TRIP,
    NORMAL_OPERATION,
    OPERATOR_SHUTDOWN,
    COMMAND_INTEGRITY,
    REJECTED_COMMAND_FALLTHROUGH,
    CONFIG_IMMUTABLE,
];
