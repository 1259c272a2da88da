//! End-to-end runs of the reporting pipeline over filesystem fixtures.

use std::path::Path;

use cpi_trace::pipeline::{
    run_pipeline, PipelineOptions, MATRIX_ARTIFACT, REPORT_ARTIFACT, RESULTS_ARTIFACT,
};

const REGISTRY: &str = r#"
[metadata]
project = "Coolant Pump Interlock"
version = "0.1.0"

[[requirement]]
id = "REQ-001"
description = "Low pressure trip"

[[requirement]]
id = "REQ-002"
description = "High temperature clamp trip"

[[requirement]]
id = "REQ-003"
description = "Subcooling margin trip"
"#;

const JUNIT_RESULTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<testsuite name="pytest" tests="2">
  <testcase classname="test_boundaries" name="test_low_pressure REQ-001"/>
  <testcase classname="test_fault_injection" name="test_subcool_trip REQ-003">
    <failure message="expected LowSubcooling"/>
  </testcase>
</testsuite>
"#;

const TRX_RESULTS: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<TestRun xmlns="http://microsoft.com/schemas/VisualStudio/TeamTest/2010">
  <TestDefinitions>
    <UnitTest id="id-1" name="HighTempClampTrip">
      <TestCategory>
        <TestCategoryItem TestCategory="REQ-002"/>
      </TestCategory>
    </UnitTest>
  </TestDefinitions>
  <Results>
    <UnitTestResult testId="id-1" testName="HighTempClampTrip" outcome="Passed"/>
  </Results>
</TestRun>
"#;

fn read_artifact(dir: &Path, name: &str) -> String {
    std::fs::read_to_string(dir.join(name)).unwrap()
}

#[test]
fn recorded_evidence_run_produces_complete_artifact_set() {
    let workspace = tempfile::tempdir().unwrap();
    let registry_path = workspace.path().join("requirements.toml");
    std::fs::write(&registry_path, REGISTRY).unwrap();

    let results = workspace.path().join("results");
    std::fs::create_dir(&results).unwrap();
    std::fs::write(results.join("junit_results.xml"), JUNIT_RESULTS).unwrap();
    std::fs::write(results.join("engine_results.trx"), TRX_RESULTS).unwrap();

    let outcome = run_pipeline(&PipelineOptions {
        registry_path: Some(registry_path),
        evidence_root: Some(results),
        artifact_base: workspace.path().join("artifacts"),
    })
    .unwrap();

    assert_eq!(outcome.evidence_count, 3);
    assert_eq!(outcome.summary.totals.required, 3);
    assert_eq!(outcome.summary.totals.covered, 3);
    assert_eq!(outcome.summary.totals.passed, 2);
    assert_eq!(outcome.summary.totals.failed, 1);
    assert!(!outcome.summary.is_validated());

    let matrix = read_artifact(&outcome.artifact_dir, MATRIX_ARTIFACT);
    assert!(matrix.contains("| REQ-001 | JUnit | test_low_pressure REQ-001 | Passed |"));
    assert!(matrix.contains("| REQ-002 | TRX | HighTempClampTrip | Passed |"));
    assert!(matrix.contains("| REQ-003 | JUnit | test_subcool_trip REQ-003 | Failed |"));

    let report = read_artifact(&outcome.artifact_dir, REPORT_ARTIFACT);
    assert!(report.contains("- **Requirements**: 3"));
    assert!(report.contains("## Failing Requirements"));
    assert!(report.ends_with("Overall: NOT VALIDATED\n"));

    let xml = read_artifact(&outcome.artifact_dir, RESULTS_ARTIFACT);
    assert!(xml.contains("<testsuite name=\"TRX\" tests=\"1\" failures=\"0\" skipped=\"0\">"));
    assert!(xml.contains("<testsuite name=\"JUnit\" tests=\"2\" failures=\"1\" skipped=\"0\">"));
}

#[test]
fn demonstration_run_validates_builtin_catalogue() {
    let workspace = tempfile::tempdir().unwrap();

    let outcome = run_pipeline(&PipelineOptions {
        registry_path: None,
        evidence_root: None,
        artifact_base: workspace.path().join("artifacts"),
    })
    .unwrap();

    assert_eq!(outcome.summary.totals.required, 8);
    assert_eq!(outcome.summary.totals.covered, 8);
    assert_eq!(outcome.summary.totals.failed, 0);
    assert!(outcome.summary.is_validated());

    let report = read_artifact(&outcome.artifact_dir, REPORT_ARTIFACT);
    assert!(report.ends_with("Overall: VALIDATED\n"));
}

#[test]
fn runs_never_share_a_directory() {
    // Two sequential runs may land in the same second; only the
    // same-instant collision is accepted, so retry across the boundary.
    let workspace = tempfile::tempdir().unwrap();
    let options = PipelineOptions {
        registry_path: None,
        evidence_root: None,
        artifact_base: workspace.path().join("artifacts"),
    };

    let first = run_pipeline(&options).unwrap();
    let second = loop {
        match run_pipeline(&options) {
            Ok(outcome) => break outcome,
            Err(_) => std::thread::sleep(std::time::Duration::from_millis(100)),
        }
    };
    assert_ne!(first.artifact_dir, second.artifact_dir);
    assert!(first.artifact_dir.exists());
    assert!(second.artifact_dir.exists());
}
