//! Traceability and validation reporting for the coolant pump interlock.
//!
//! This crate is the offline half of the system: it cross-references a
//! requirement registry against recorded test evidence and produces a
//! traceability matrix, a validation report with per-requirement
//! rollups, and a normalized result listing, all written into a fresh
//! timestamped artifact directory per run.
//!
//! # Pipeline
//!
//! 1. [`registry`] loads the ordered requirement registry (TOML).
//! 2. [`evidence`] normalizes JUnit and TRX result files into one
//!    internal record shape.
//! 3. [`matrix`] joins registry and evidence into traceability rows.
//! 4. [`report`] aggregates rows into rollups and renders the artifacts.
//! 5. [`artifacts`] writes them atomically into a per-run directory.
//!
//! The pipeline is a single-pass batch process; it has no shared mutable
//! state beyond the directory it creates.

#![forbid(unsafe_code)]

pub mod artifacts;
pub mod demo;
pub mod error;
pub mod evidence;
pub mod matrix;
pub mod pipeline;
pub mod registry;
pub mod report;

pub use error::{TraceError, TraceResult};
pub use evidence::{EvidenceSource, Outcome, TestEvidence};
pub use matrix::{build_matrix, TraceabilityRow};
pub use pipeline::{run_pipeline, PipelineOptions, PipelineOutcome};
pub use registry::{Requirement, RequirementRegistry};
pub use report::{summarize, OverallOutcome, RequirementRollup, ValidationSummary};
