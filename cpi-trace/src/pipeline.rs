//! The batch reporting pipeline.
//!
//! Single-pass, offline: load the registry, normalize recorded evidence,
//! join, summarize, and write one immutable artifact set. Runs after the
//! test execution it summarizes, never concurrently with it.

use std::path::PathBuf;

use log::info;

use crate::artifacts::ArtifactWriter;
use crate::demo;
use crate::error::TraceResult;
use crate::evidence::collect_evidence;
use crate::matrix::build_matrix;
use crate::registry::RequirementRegistry;
use crate::report::{render_matrix, render_normalized_xml, render_report, summarize, ValidationSummary};

/// File name of the traceability matrix listing.
pub const MATRIX_ARTIFACT: &str = "traceability_matrix.md";
/// File name of the validation report listing.
pub const REPORT_ARTIFACT: &str = "validation_report.md";
/// File name of the normalized result listing.
pub const RESULTS_ARTIFACT: &str = "normalized_results.xml";

/// Inputs for one reporting run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Registry file to load; the built-in catalogue when absent.
    pub registry_path: Option<PathBuf>,
    /// Directory of recorded result files; demonstration evidence when
    /// absent (self-contained artifact mode).
    pub evidence_root: Option<PathBuf>,
    /// Base directory receiving the per-run artifact directory.
    pub artifact_base: PathBuf,
}

/// What one reporting run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The freshly created artifact directory for this run.
    pub artifact_dir: PathBuf,
    /// The computed rollups and totals.
    pub summary: ValidationSummary,
    /// Number of normalized evidence records.
    pub evidence_count: usize,
}

/// Run the full reporting pipeline once.
pub fn run_pipeline(options: &PipelineOptions) -> TraceResult<PipelineOutcome> {
    let registry = match &options.registry_path {
        Some(path) => RequirementRegistry::load(path)?,
        None => RequirementRegistry::builtin(),
    };
    info!(
        "loaded {} requirements for {}",
        registry.len(),
        registry.metadata.project
    );

    let evidence = match &options.evidence_root {
        Some(root) => collect_evidence(root)?,
        None => demo::demonstration_evidence(),
    };
    info!("normalized {} evidence records", evidence.len());

    let rows = build_matrix(&registry, &evidence);
    let summary = summarize(&registry, &rows);

    let writer = ArtifactWriter::create(&options.artifact_base)?;
    writer.write(MATRIX_ARTIFACT, &render_matrix(&rows, &summary.unregistered))?;
    writer.write(REPORT_ARTIFACT, &render_report(&summary))?;
    writer.write(RESULTS_ARTIFACT, &render_normalized_xml(&evidence))?;

    info!(
        "wrote artifacts to {} ({})",
        writer.dir().display(),
        summary.status_line()
    );

    Ok(PipelineOutcome {
        artifact_dir: writer.dir().to_path_buf(),
        summary,
        evidence_count: evidence.len(),
    })
}
