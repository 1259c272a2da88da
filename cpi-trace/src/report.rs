//! Validation report generation.
//!
//! Aggregates traceability rows into per-requirement rollups and overall
//! totals, and renders the human-readable artifacts: the matrix listing,
//! the validation report, and a normalized result listing in
//! conventional JUnit XML shape.

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::evidence::{EvidenceSource, Outcome, TestEvidence};
use crate::matrix::TraceabilityRow;
use crate::registry::RequirementRegistry;

/// Aggregate outcome for one requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverallOutcome {
    /// At least one contributing test, none failed, at least one passed.
    Passed,
    /// At least one contributing test failed.
    Failed,
    /// No contributing evidence, or nothing but skipped evidence.
    Unknown,
}

impl fmt::Display for OverallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OverallOutcome::Passed => "Passed",
            OverallOutcome::Failed => "Failed",
            OverallOutcome::Unknown => "Unknown",
        };
        write!(f, "{name}")
    }
}

/// Per-requirement aggregate with its contributing rows.
#[derive(Debug, Clone, Serialize)]
pub struct RequirementRollup {
    /// Requirement this rollup covers.
    pub requirement_id: String,
    /// Aggregate outcome per the rollup rule.
    pub overall: OverallOutcome,
    /// Contributing rows in arrival order.
    pub contributing: Vec<TraceabilityRow>,
}

/// Coverage and outcome totals over the whole registry.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ValidationTotals {
    /// Registered requirements (the coverage denominator).
    pub required: usize,
    /// Requirements with at least one contributing row.
    pub covered: usize,
    /// Rollups that passed.
    pub passed: usize,
    /// Rollups that failed.
    pub failed: usize,
    /// Rollups with no usable evidence.
    pub unknown: usize,
}

/// Full validation summary for one reporting run.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationSummary {
    /// One rollup per registered requirement, in registry order.
    pub rollups: Vec<RequirementRollup>,
    /// Overall totals.
    pub totals: ValidationTotals,
    /// Requirement ids referenced by evidence but not registered.
    pub unregistered: Vec<String>,
}

fn rollup_outcome(contributing: &[TraceabilityRow]) -> OverallOutcome {
    if contributing.is_empty() {
        return OverallOutcome::Unknown;
    }
    if contributing.iter().any(|r| r.outcome == Outcome::Failed) {
        return OverallOutcome::Failed;
    }
    if contributing.iter().any(|r| r.outcome == Outcome::Passed) {
        return OverallOutcome::Passed;
    }
    // Evidence exists but everything was skipped: nothing demonstrated.
    OverallOutcome::Unknown
}

/// Aggregate matrix rows into rollups and totals.
pub fn summarize(registry: &RequirementRegistry, rows: &[TraceabilityRow]) -> ValidationSummary {
    let mut rollups = Vec::with_capacity(registry.len());
    for requirement in &registry.requirements {
        let contributing: Vec<TraceabilityRow> = rows
            .iter()
            .filter(|r| r.requirement_id == requirement.id)
            .cloned()
            .collect();
        let overall = rollup_outcome(&contributing);
        rollups.push(RequirementRollup {
            requirement_id: requirement.id.clone(),
            overall,
            contributing,
        });
    }

    let covered = rollups.iter().filter(|r| !r.contributing.is_empty()).count();
    let count = |outcome: OverallOutcome| rollups.iter().filter(|r| r.overall == outcome).count();
    let totals = ValidationTotals {
        required: registry.len(),
        covered,
        passed: count(OverallOutcome::Passed),
        failed: count(OverallOutcome::Failed),
        unknown: count(OverallOutcome::Unknown),
    };

    let unregistered: Vec<String> = rows
        .iter()
        .map(|r| r.requirement_id.clone())
        .filter(|id| !registry.contains(id))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    ValidationSummary {
        rollups,
        totals,
        unregistered,
    }
}

impl ValidationSummary {
    /// The definitive validation verdict for this run.
    pub fn is_validated(&self) -> bool {
        self.totals.failed == 0
            && self.totals.unknown == 0
            && self.totals.covered == self.totals.required
    }

    /// The literal status line the report always ends with.
    pub fn status_line(&self) -> &'static str {
        if self.is_validated() {
            "VALIDATED"
        } else {
            "NOT VALIDATED"
        }
    }
}

/// Render the traceability matrix listing (markdown).
pub fn render_matrix(rows: &[TraceabilityRow], unregistered: &[String]) -> String {
    let mut out = String::new();
    out.push_str("# Traceability Matrix\n\n");
    out.push_str("| Requirement | Source | Test | Outcome |\n");
    out.push_str("|---|---|---|---|\n");
    if rows.is_empty() {
        out.push_str("| – | – | – | – |\n");
    }
    for row in rows {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            row.requirement_id, row.source, row.test_name, row.outcome
        ));
    }
    if !unregistered.is_empty() {
        out.push_str("\n## Unregistered requirement references\n\n");
        for id in unregistered {
            out.push_str(&format!("- {id}\n"));
        }
    }
    out
}

fn percentage(part: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

/// Render the validation report listing (markdown).
///
/// Always ends with a definitive `Overall:` status line; the verdict is
/// never left ambiguous.
pub fn render_report(summary: &ValidationSummary) -> String {
    let totals = &summary.totals;
    let mut out = String::new();

    out.push_str("# Validation Report\n\n");
    out.push_str(&format!("- **Requirements**: {}\n", totals.required));
    out.push_str(&format!(
        "- **Covered**: {} ({:.0}%)\n",
        totals.covered,
        percentage(totals.covered, totals.required)
    ));
    out.push_str(&format!(
        "- **Passed**: {} ({:.0}%)\n",
        totals.passed,
        percentage(totals.passed, totals.required)
    ));
    out.push_str(&format!("- **Failed**: {}\n", totals.failed));
    out.push_str(&format!("- **Unknown**: {}\n", totals.unknown));

    let failing: Vec<&RequirementRollup> = summary
        .rollups
        .iter()
        .filter(|r| r.overall == OverallOutcome::Failed)
        .collect();
    if !failing.is_empty() {
        out.push_str("\n## Failing Requirements\n\n");
        for rollup in failing {
            let tests: Vec<String> = rollup
                .contributing
                .iter()
                .map(|row| format!("{}:{} ({})", row.source, row.test_name, row.outcome))
                .collect();
            out.push_str(&format!("- {}: {}\n", rollup.requirement_id, tests.join("; ")));
        }
    }

    let uncovered: Vec<&RequirementRollup> = summary
        .rollups
        .iter()
        .filter(|r| r.contributing.is_empty())
        .collect();
    if !uncovered.is_empty() {
        out.push_str("\n## Uncovered Requirements\n\n");
        for rollup in uncovered {
            out.push_str(&format!("- {}\n", rollup.requirement_id));
        }
    }

    if !summary.unregistered.is_empty() {
        out.push_str("\n## Unregistered requirement references\n\n");
        for id in &summary.unregistered {
            out.push_str(&format!("- {id}\n"));
        }
    }

    out.push_str("\n## Per-Requirement Status\n\n");
    out.push_str("| Requirement | Overall | Tests |\n");
    out.push_str("|---|---|---|\n");
    for rollup in &summary.rollups {
        let tests = if rollup.contributing.is_empty() {
            "<none>".to_string()
        } else {
            rollup
                .contributing
                .iter()
                .map(|row| format!("{}:{} ({})", row.source, row.test_name, row.outcome))
                .collect::<Vec<_>>()
                .join("<br/>")
        };
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            rollup.requirement_id, rollup.overall, tests
        ));
    }

    out.push_str(&format!("\nOverall: {}\n", summary.status_line()));
    out
}

fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Render the normalized evidence listing in JUnit XML shape.
///
/// One `<testsuite>` per source format, each test's requirement tags as
/// `requirement` properties.
pub fn render_normalized_xml(evidence: &[TestEvidence]) -> String {
    let mut out = String::new();
    out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    out.push_str("<testsuites>\n");

    for source in [EvidenceSource::Trx, EvidenceSource::Junit] {
        let records: Vec<&TestEvidence> = evidence.iter().filter(|e| e.source == source).collect();
        if records.is_empty() {
            continue;
        }
        let failures = records.iter().filter(|e| e.outcome == Outcome::Failed).count();
        let skipped = records.iter().filter(|e| e.outcome == Outcome::Skipped).count();
        out.push_str(&format!(
            "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\" skipped=\"{}\">\n",
            xml_escape(&source.to_string()),
            records.len(),
            failures,
            skipped
        ));
        for record in records {
            out.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"{}\">\n",
                xml_escape(&record.test_name),
                xml_escape(&source.to_string())
            ));
            match record.outcome {
                Outcome::Failed => out.push_str("      <failure/>\n"),
                Outcome::Skipped => out.push_str("      <skipped/>\n"),
                Outcome::Passed => {},
            }
            if !record.requirement_ids.is_empty() {
                out.push_str("      <properties>\n");
                for id in &record.requirement_ids {
                    out.push_str(&format!(
                        "        <property name=\"requirement\" value=\"{}\"/>\n",
                        xml_escape(id)
                    ));
                }
                out.push_str("      </properties>\n");
            }
            out.push_str("    </testcase>\n");
        }
        out.push_str("  </testsuite>\n");
    }

    out.push_str("</testsuites>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Requirement, RegistryMetadata};
    use std::collections::BTreeSet;

    fn registry(ids: &[&str]) -> RequirementRegistry {
        RequirementRegistry {
            metadata: RegistryMetadata {
                project: "test".to_string(),
                version: "0".to_string(),
            },
            requirements: ids
                .iter()
                .map(|id| Requirement {
                    id: (*id).to_string(),
                    description: String::new(),
                })
                .collect(),
        }
    }

    fn row(id: &str, name: &str, outcome: Outcome) -> TraceabilityRow {
        TraceabilityRow {
            requirement_id: id.to_string(),
            source: EvidenceSource::Junit,
            test_name: name.to_string(),
            outcome,
        }
    }

    #[test]
    fn rollup_rule() {
        assert_eq!(rollup_outcome(&[]), OverallOutcome::Unknown);
        assert_eq!(
            rollup_outcome(&[row("REQ-001", "a", Outcome::Passed)]),
            OverallOutcome::Passed
        );
        assert_eq!(
            rollup_outcome(&[
                row("REQ-001", "a", Outcome::Passed),
                row("REQ-001", "b", Outcome::Failed),
            ]),
            OverallOutcome::Failed
        );
        // All-skipped evidence demonstrates nothing.
        assert_eq!(
            rollup_outcome(&[row("REQ-001", "a", Outcome::Skipped)]),
            OverallOutcome::Unknown
        );
        assert_eq!(
            rollup_outcome(&[
                row("REQ-001", "a", Outcome::Skipped),
                row("REQ-001", "b", Outcome::Passed),
            ]),
            OverallOutcome::Passed
        );
    }

    #[test]
    fn totals_and_coverage() {
        let registry = registry(&["REQ-001", "REQ-002", "REQ-003"]);
        let rows = [
            row("REQ-001", "a", Outcome::Passed),
            row("REQ-002", "b", Outcome::Failed),
        ];
        let summary = summarize(&registry, &rows);
        assert_eq!(summary.totals.required, 3);
        assert_eq!(summary.totals.covered, 2);
        assert_eq!(summary.totals.passed, 1);
        assert_eq!(summary.totals.failed, 1);
        assert_eq!(summary.totals.unknown, 1);
        // covered + uncovered always reconciles with the denominator.
        assert_eq!(
            summary.totals.covered + (summary.totals.required - summary.totals.covered),
            summary.totals.required
        );
        assert!(!summary.is_validated());
        assert_eq!(summary.status_line(), "NOT VALIDATED");
    }

    #[test]
    fn validated_only_when_everything_covered_and_passing() {
        let registry = registry(&["REQ-001", "REQ-002"]);
        let rows = [
            row("REQ-001", "a", Outcome::Passed),
            row("REQ-002", "b", Outcome::Passed),
        ];
        let summary = summarize(&registry, &rows);
        assert!(summary.is_validated());
        assert_eq!(summary.status_line(), "VALIDATED");
    }

    #[test]
    fn unregistered_ids_are_surfaced_not_counted() {
        let registry = registry(&["REQ-001"]);
        let rows = [
            row("REQ-001", "a", Outcome::Passed),
            row("REQ-099", "x", Outcome::Failed),
        ];
        let summary = summarize(&registry, &rows);
        assert_eq!(summary.unregistered, ["REQ-099"]);
        assert_eq!(summary.totals.required, 1);
        assert_eq!(summary.totals.failed, 0);
        assert!(summary.is_validated());
    }

    #[test]
    fn report_lists_failures_and_uncovered() {
        let registry = registry(&["REQ-001", "REQ-002"]);
        let rows = [row("REQ-001", "test_trip", Outcome::Failed)];
        let summary = summarize(&registry, &rows);
        let report = render_report(&summary);
        assert!(report.contains("## Failing Requirements"));
        assert!(report.contains("REQ-001: JUnit:test_trip (Failed)"));
        assert!(report.contains("## Uncovered Requirements"));
        assert!(report.contains("- REQ-002"));
        assert!(report.contains("| REQ-002 | Unknown | <none> |"));
        assert!(report.ends_with("Overall: NOT VALIDATED\n"));
    }

    #[test]
    fn matrix_listing_has_one_line_per_row() {
        let rows = [
            row("REQ-001", "a", Outcome::Passed),
            row("REQ-001", "b", Outcome::Skipped),
        ];
        let listing = render_matrix(&rows, &[]);
        assert!(listing.contains("| REQ-001 | JUnit | a | Passed |"));
        assert!(listing.contains("| REQ-001 | JUnit | b | Skipped |"));
        // Header, separator, two rows, title and blank line.
        assert_eq!(listing.lines().filter(|l| l.starts_with('|')).count(), 4);
    }

    #[test]
    fn normalized_xml_escapes_and_groups_by_source() {
        let evidence = [TestEvidence {
            test_name: "checks <&> quoting".to_string(),
            requirement_ids: ["REQ-001".to_string()].into_iter().collect::<BTreeSet<_>>(),
            outcome: Outcome::Failed,
            source: EvidenceSource::Trx,
        }];
        let xml = render_normalized_xml(&evidence);
        assert!(xml.contains("<testsuite name=\"TRX\" tests=\"1\" failures=\"1\" skipped=\"0\">"));
        assert!(xml.contains("checks &lt;&amp;&gt; quoting"));
        assert!(xml.contains("<failure/>"));
        assert!(xml.contains("<property name=\"requirement\" value=\"REQ-001\"/>"));
    }
}
