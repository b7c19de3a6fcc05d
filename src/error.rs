//! Error types shared by the loaders and samplers.

use std::path::PathBuf;
use thiserror::Error;

/// Problems with observation data. When loading a file, row-level variants are only
/// returned under [`Rigidity::Strict`](crate::observations::Rigidity::Strict); lenient
/// loading skips the row and records a diagnostic instead.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Unable to open file: {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Incorrect file extension: .{found} instead of .txt for file {} .", path.display())]
    Extension { path: PathBuf, found: String },
    #[error("Error - Invalid data read from line {line} : {row}")]
    InvalidRow { line: usize, row: String },
    #[error("Error - Sigma value possess invalid negative value in line {line} : {row}")]
    NegativeSigma { line: usize, row: String },
    #[error("Error - Sigma value possess invalid zero value in line {line} : {row}")]
    ZeroSigma { line: usize, row: String },
    #[error(
        "Error - Unexpected data exceeding three features x, y and sigma format in line {line} : {row}"
    )]
    ExtraData { line: usize, row: String },
    #[error(
        "Error - Mismatched observation lengths: {inputs} inputs, {outputs} outputs and {sigmas} sigmas"
    )]
    LengthMismatch {
        inputs: usize,
        outputs: usize,
        sigmas: usize,
    },
}

/// Top-level error for constructing and driving a sampler.
#[derive(Error, Debug)]
pub enum SamplerError {
    /// Invalid bins, bounds, sample count or step size. Raised at construction.
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error(transparent)]
    Data(#[from] DataError),
    /// An operation was called in the wrong lifecycle state.
    #[error("State error: {0}")]
    State(String),
}

/// Convenience type for `Result<T, SamplerError>`.
pub type SamplerResult<T> = Result<T, SamplerError>;
