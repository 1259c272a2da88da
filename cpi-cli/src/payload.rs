//! Wire shapes for the JSON evaluation adapter.
//!
//! Field casing matches the original controller wire format: camelCase
//! sensor fields on the way in, PascalCase command and result fields.
//! The adapter guarantees the engine is only ever handed well-typed
//! values; a malformed payload fails hard at this boundary.

use serde::{Deserialize, Serialize};

use cpi_engine::{CommandAction, EvaluationResult, OperatorCommand, TripReason};

/// One evaluation request as received on stdin.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EvaluationRequest {
    /// Coolant temperature in °C.
    pub temperature_c: f64,
    /// Coolant pressure in bar.
    pub pressure_bar: f64,
    /// Optional operator command.
    #[serde(default)]
    pub command: Option<CommandPayload>,
}

/// Operator command as carried on the wire.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase", deny_unknown_fields)]
pub struct CommandPayload {
    /// Claimed operator identity.
    pub user_id: String,
    /// Requested action text.
    pub action: String,
    /// Presented integrity code.
    pub checksum: String,
}

impl From<CommandPayload> for OperatorCommand {
    fn from(payload: CommandPayload) -> Self {
        OperatorCommand {
            user_id: payload.user_id,
            action: CommandAction::from(payload.action),
            integrity_code: payload.checksum,
        }
    }
}

/// One evaluation result as emitted on stdout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EvaluationResponse {
    /// Whether the pump is commanded on.
    pub pump_on: bool,
    /// Whether the emergency flag is raised.
    pub emergency: bool,
    /// The rule that produced the result.
    pub reason: TripReason,
}

impl From<EvaluationResult> for EvaluationResponse {
    fn from(result: EvaluationResult) -> Self {
        Self {
            pump_on: result.pump_on(),
            emergency: result.emergency(),
            reason: result.reason(),
        }
    }
}
