use std::io;
use std::path::PathBuf;

use gherkin_fmt_parser::ParseError;
use thiserror::Error;

/// Failures raised while transforming a single document.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The token source failed; surfaced unchanged.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// An embedded formatting command exited non-zero. The message is the
    /// command's combined stdout and stderr, verbatim.
    #[error("{output}")]
    CommandFailed { output: String },

    /// A table row carries more columns than the row that seeded the
    /// column widths.
    #[error("table row {row} has more columns than the first row")]
    RaggedTable { row: usize },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

pub type FormatResult<T> = Result<T, FormatError>;

/// A per-file failure collected during a batch run. Sibling files are
/// unaffected by it.
#[derive(Debug, Error)]
#[error("an error occurred with file \"{}\": {source}", path.display())]
pub struct BatchError {
    pub path: PathBuf,
    #[source]
    pub source: FormatError,
}
