use thiserror::Error;
use tabula_core::TabulaError;

/// Failures of the underlying text source
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Line of the source where reading failed, when known
    pub fn line(&self) -> Option<u64> {
        match self {
            SourceError::Csv(e) => e.position().map(|p| p.line()),
            SourceError::Io(_) => None,
        }
    }
}

impl From<SourceError> for TabulaError {
    fn from(e: SourceError) -> Self {
        let line = e.line();
        let err = TabulaError::invalid_data(e.to_string())
            .with_suggestion("Check that the source exists and is delimited text");
        match line {
            Some(line) => err.at_line(line),
            None => err,
        }
    }
}
