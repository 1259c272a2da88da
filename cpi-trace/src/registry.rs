//! Requirement registry loading and validation.
//!
//! The registry is an externally authored TOML file: a `[metadata]`
//! block plus repeated `[[requirement]]` entries. Declared order is
//! preserved; it is the matrix grouping order, and the full set is the
//! denominator for coverage.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{TraceError, TraceResult};

/// Registry metadata block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryMetadata {
    /// Project the requirements belong to.
    pub project: String,
    /// Registry revision.
    pub version: String,
}

/// A single registered requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requirement {
    /// Unique `REQ-NNN` identifier.
    pub id: String,
    /// Human-readable description.
    pub description: String,
}

/// Ordered, immutable requirement registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequirementRegistry {
    /// Registry metadata.
    pub metadata: RegistryMetadata,
    /// Requirements in declared order.
    #[serde(rename = "requirement")]
    pub requirements: Vec<Requirement>,
}

fn id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^REQ-\d{3}$").expect("static pattern"))
}

impl RequirementRegistry {
    /// Load and validate a registry from a TOML file.
    pub fn load(path: &Path) -> TraceResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TraceError::Registry(format!("failed to read {}: {e}", path.display()))
        })?;
        let registry: Self = toml::from_str(&content).map_err(|e| {
            TraceError::Registry(format!("failed to parse {}: {e}", path.display()))
        })?;
        registry.validate()?;
        Ok(registry)
    }

    /// Check id shape and uniqueness.
    fn validate(&self) -> TraceResult<()> {
        let mut seen = std::collections::BTreeSet::new();
        for req in &self.requirements {
            if !id_pattern().is_match(&req.id) {
                return Err(TraceError::Registry(format!(
                    "malformed requirement id '{}' (expected REQ-NNN)",
                    req.id
                )));
            }
            if !seen.insert(req.id.as_str()) {
                return Err(TraceError::Registry(format!(
                    "duplicate requirement id '{}'",
                    req.id
                )));
            }
        }
        Ok(())
    }

    /// The interlock engine's built-in requirement catalogue, used for
    /// self-contained demonstration runs.
    pub fn builtin() -> Self {
        use cpi_engine::requirement_ids as ids;
        let describe = |id: &str| -> &'static str {
            match id {
                ids::LOW_PRESSURE_TRIP => {
                    "The pump shall shut down when coolant pressure falls below the configured \
                     minimum."
                },
                ids::HIGH_TEMP_CLAMP_TRIP => {
                    "The pump shall shut down when coolant temperature exceeds the hard clamp."
                },
                ids::LOW_SUBCOOLING_TRIP => {
                    "The pump shall shut down when the subcooling margin to the saturation \
                     temperature is not met."
                },
                ids::NORMAL_OPERATION => {
                    "The pump shall remain on when every interlock check passes."
                },
                ids::OPERATOR_SHUTDOWN => {
                    "An authenticated operator shutdown command shall always shut the pump down."
                },
                ids::COMMAND_INTEGRITY => {
                    "Operator commands shall carry an integrity checksum over the literal payload."
                },
                ids::REJECTED_COMMAND_FALLTHROUGH => {
                    "A rejected command shall be ignored transparently; evaluation continues with \
                     the sensor-based checks."
                },
                _ => {
                    "The safety configuration shall be immutable after construction and safely \
                     shareable across concurrent evaluations."
                },
            }
        };
        Self {
            metadata: RegistryMetadata {
                project: "Coolant Pump Interlock".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            requirements: ids::ALL
                .iter()
                .map(|&id| Requirement {
                    id: id.to_string(),
                    description: describe(id).to_string(),
                })
                .collect(),
        }
    }

    /// Write a starter registry file.
    pub fn init_sample(path: &Path) -> TraceResult<()> {
        let sample = toml::to_string_pretty(&Self::builtin())
            .map_err(|e| TraceError::Registry(format!("failed to render sample: {e}")))?;
        std::fs::write(path, sample).map_err(|e| {
            TraceError::Registry(format!("failed to write {}: {e}", path.display()))
        })
    }

    /// Number of registered requirements.
    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    /// Whether the registry declares no requirements.
    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Whether the given id is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.requirements.iter().any(|r| r.id == id)
    }
}
