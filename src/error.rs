use std::path::PathBuf;

use thiserror::Error;

/// Conditions raised by the table model and the analysis components.
///
/// I/O and parse failures in the loader are reported through `anyhow` with
/// context instead; these variants are the ones callers branch on.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Series '{series}' cannot be estimated: {reason}")]
    DegenerateInput { series: String, reason: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}
