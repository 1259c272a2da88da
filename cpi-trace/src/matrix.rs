//! Traceability matrix construction.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::evidence::{EvidenceSource, Outcome, TestEvidence};
use crate::registry::RequirementRegistry;

/// One (requirement, test) pairing in the traceability matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceabilityRow {
    /// Requirement the evidence tags.
    pub requirement_id: String,
    /// Producing format.
    pub source: EvidenceSource,
    /// Normalized test name.
    pub test_name: String,
    /// Recorded outcome.
    pub outcome: Outcome,
}

fn row_for(id: &str, evidence: &TestEvidence) -> TraceabilityRow {
    TraceabilityRow {
        requirement_id: id.to_string(),
        source: evidence.source,
        test_name: evidence.test_name.clone(),
        outcome: evidence.outcome,
    }
}

/// Join registry and evidence into traceability rows.
///
/// One row per requirement id each evidence item tags. Rows are grouped
/// by requirement in the registry's declared order, evidence arrival
/// order within a requirement; outcomes are never reordered. Ids tagged
/// by evidence but absent from the registry are appended after the
/// registered groups in sorted id order; they appear in the matrix but
/// never in the coverage denominator. A requirement with no matching
/// evidence produces zero rows.
pub fn build_matrix(
    registry: &RequirementRegistry,
    evidence: &[TestEvidence],
) -> Vec<TraceabilityRow> {
    let mut rows = Vec::new();
    for requirement in &registry.requirements {
        for item in evidence {
            if item.requirement_ids.contains(&requirement.id) {
                rows.push(row_for(&requirement.id, item));
            }
        }
    }

    let unregistered: BTreeSet<&String> = evidence
        .iter()
        .flat_map(|item| &item.requirement_ids)
        .filter(|id| !registry.contains(id))
        .collect();
    for id in unregistered {
        for item in evidence {
            if item.requirement_ids.contains(id) {
                rows.push(row_for(id, item));
            }
        }
    }

    rows
}
