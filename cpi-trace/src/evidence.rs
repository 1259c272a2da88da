//! Test evidence normalization.
//!
//! Two independently produced result formats feed the pipeline: JUnit
//! XML (the scripting suite) and TRX (the engine-language suite). Each
//! format gets its own adapter and both normalize into [`TestEvidence`],
//! so the aggregation logic never branches on format.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use log::warn;
use regex::Regex;
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{TraceError, TraceResult};

/// Outcome of a single recorded test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The test passed.
    Passed,
    /// The test failed or errored.
    Failed,
    /// The test was skipped or not executed.
    Skipped,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Passed => "Passed",
            Outcome::Failed => "Failed",
            Outcome::Skipped => "Skipped",
        };
        write!(f, "{name}")
    }
}

/// Which result format a piece of evidence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceSource {
    /// JUnit XML report.
    Junit,
    /// Visual Studio TRX report.
    Trx,
}

impl fmt::Display for EvidenceSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvidenceSource::Junit => write!(f, "JUnit"),
            EvidenceSource::Trx => write!(f, "TRX"),
        }
    }
}

/// One normalized test record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestEvidence {
    /// Normalized test name.
    pub test_name: String,
    /// Requirement ids the test tags; may be empty.
    pub requirement_ids: BTreeSet<String>,
    /// Recorded outcome.
    pub outcome: Outcome,
    /// Producing format.
    pub source: EvidenceSource,
}

fn req_tag_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\bREQ-(\d{3})\b").expect("static pattern"))
}

/// Collect `REQ-NNN` tags from free text, normalized to upper case.
fn scan_requirement_ids(text: &str, ids: &mut BTreeSet<String>) {
    for cap in req_tag_pattern().captures_iter(text) {
        ids.insert(format!("REQ-{}", &cap[1]));
    }
}

/// Parse a JUnit XML report into normalized evidence.
///
/// Every `<testcase>` yields one record. Outcome comes from `skipped` /
/// `failure` / `error` child elements; parameterized names
/// (`test_x[case]`) are normalized to the bare function name.
/// Requirement tags are harvested from `requirement` properties and
/// from `REQ-NNN` matches in the name and classname.
pub fn parse_junit(xml: &str) -> TraceResult<Vec<TestEvidence>> {
    let doc = roxmltree::Document::parse(xml.trim_start_matches('\u{feff}'))
        .map_err(|e| TraceError::Evidence(format!("invalid JUnit XML: {e}")))?;

    let mut evidence = Vec::new();
    for case in doc
        .descendants()
        .filter(|n| n.tag_name().name() == "testcase")
    {
        let raw_name = case.attribute("name").unwrap_or("").trim();
        let test_name = raw_name
            .split(['[', '('])
            .next()
            .unwrap_or(raw_name)
            .trim()
            .to_string();

        let outcome = if case.children().any(|c| c.tag_name().name() == "skipped") {
            Outcome::Skipped
        } else if case
            .children()
            .any(|c| matches!(c.tag_name().name(), "failure" | "error"))
        {
            Outcome::Failed
        } else {
            Outcome::Passed
        };

        let mut requirement_ids = BTreeSet::new();
        scan_requirement_ids(raw_name, &mut requirement_ids);
        scan_requirement_ids(case.attribute("classname").unwrap_or(""), &mut requirement_ids);
        for property in case
            .descendants()
            .filter(|n| n.tag_name().name() == "property")
        {
            if property.attribute("name") == Some("requirement") {
                scan_requirement_ids(property.attribute("value").unwrap_or(""), &mut requirement_ids);
            }
        }

        evidence.push(TestEvidence {
            test_name,
            requirement_ids,
            outcome,
            source: EvidenceSource::Junit,
        });
    }
    Ok(evidence)
}

fn trx_outcome(raw: &str, test_name: &str) -> Outcome {
    match raw {
        "Passed" => Outcome::Passed,
        "Failed" | "Error" | "Aborted" | "Timeout" => Outcome::Failed,
        "NotExecuted" | "Inconclusive" => Outcome::Skipped,
        other => {
            warn!("unrecognized TRX outcome '{other}' for {test_name}; treating as Skipped");
            Outcome::Skipped
        },
    }
}

/// Parse a Visual Studio TRX report into normalized evidence.
///
/// `UnitTestResult` entries are joined to their `UnitTest` definitions
/// by `testId` to pick up `TestCategoryItem` requirement tags; `REQ-NNN`
/// matches in the test name are harvested as well.
pub fn parse_trx(xml: &str) -> TraceResult<Vec<TestEvidence>> {
    let doc = roxmltree::Document::parse(xml.trim_start_matches('\u{feff}'))
        .map_err(|e| TraceError::Evidence(format!("invalid TRX XML: {e}")))?;

    // testId -> category tags declared on the test definition.
    let mut categories: HashMap<&str, BTreeSet<String>> = HashMap::new();
    for unit in doc
        .descendants()
        .filter(|n| n.tag_name().name() == "UnitTest")
    {
        let Some(test_id) = unit.attribute("id") else {
            continue;
        };
        let mut tags = BTreeSet::new();
        for item in unit
            .descendants()
            .filter(|n| n.tag_name().name() == "TestCategoryItem")
        {
            let category = item
                .attribute("TestCategory")
                .or_else(|| item.attribute("name"))
                .unwrap_or("");
            scan_requirement_ids(category, &mut tags);
        }
        categories.insert(test_id, tags);
    }

    let mut evidence = Vec::new();
    for result in doc
        .descendants()
        .filter(|n| n.tag_name().name() == "UnitTestResult")
    {
        let test_name = result
            .attribute("testName")
            .or_else(|| result.attribute("executionId"))
            .or_else(|| result.attribute("testId"))
            .unwrap_or("Unknown")
            .trim()
            .to_string();

        let outcome = match result.attribute("outcome").or_else(|| result.attribute("result")) {
            Some(raw) => trx_outcome(raw, &test_name),
            None if result
                .descendants()
                .any(|n| n.tag_name().name() == "ErrorInfo") =>
            {
                Outcome::Failed
            },
            None => {
                warn!("TRX result without outcome for {test_name}; treating as Skipped");
                Outcome::Skipped
            },
        };

        let mut requirement_ids = result
            .attribute("testId")
            .and_then(|id| categories.get(id).cloned())
            .unwrap_or_default();
        scan_requirement_ids(&test_name, &mut requirement_ids);

        evidence.push(TestEvidence {
            test_name,
            requirement_ids,
            outcome,
            source: EvidenceSource::Trx,
        });
    }
    Ok(evidence)
}

fn format_for(path: &Path) -> Option<EvidenceSource> {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("trx") => Some(EvidenceSource::Trx),
        Some(ext) if ext.eq_ignore_ascii_case("xml") => Some(EvidenceSource::Junit),
        _ => None,
    }
}

/// Discover and parse every result file under `root`.
///
/// Files are visited in path order so evidence order is deterministic.
/// An unreadable or unparsable file is skipped with a warning rather
/// than failing the run; a requirement left without evidence surfaces as
/// `Unknown` in the rollup instead.
pub fn collect_evidence(root: &Path) -> TraceResult<Vec<TestEvidence>> {
    if !root.exists() {
        return Err(TraceError::Evidence(format!(
            "results directory {} does not exist",
            root.display()
        )));
    }

    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| format_for(path).is_some())
        .collect();
    files.sort();

    let mut evidence = Vec::new();
    for path in files {
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                warn!("skipping unreadable result file {}: {e}", path.display());
                continue;
            },
        };
        let parsed = match format_for(&path) {
            Some(EvidenceSource::Trx) => parse_trx(&content),
            _ => parse_junit(&content),
        };
        match parsed {
            Ok(mut records) => evidence.append(&mut records),
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }
    Ok(evidence)
}
