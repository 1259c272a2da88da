//! Error taxonomy for the traceability pipeline.

use thiserror::Error;

/// Errors produced while building traceability artifacts.
///
/// A malformed *discovered* result file is tolerated (skipped with a
/// warning); the [`TraceError::Evidence`] variant is for inputs the
/// caller named explicitly. Artifact failures are fatal to the run so a
/// partial run is never mistaken for a complete one.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The requirement registry could not be read or parsed.
    #[error("requirement registry error: {0}")]
    Registry(String),

    /// A named test-evidence input could not be read or parsed.
    #[error("test evidence error: {0}")]
    Evidence(String),

    /// The artifact directory could not be created or written.
    #[error("artifact error: {0}")]
    Artifact(String),
}

/// Convenience result alias used throughout the crate.
pub type TraceResult<T> = Result<T, TraceError>;
