use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// Error taxonomy for the comparison pipeline. Item-level extraction
/// failures are not errors; they are dropped and counted in
/// [`crate::domain::Extraction`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// The uploaded file is not valid JSON.
    #[error("not valid JSON: {0}")]
    MalformedInput(#[from] serde_json::Error),

    /// Loading or saving the snapshot failed; non-fatal for comparison.
    #[error("snapshot storage unavailable: {0}")]
    Storage(String),

    /// Writing the rendered report failed.
    #[error("could not write report: {0}")]
    Io(#[from] std::io::Error),
}
