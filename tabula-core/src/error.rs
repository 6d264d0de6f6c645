//! Structured errors
//!
//! Every fallible operation in Tabula returns a [`TabulaError`]. Validation
//! is performed before any mutation starts, so an error always means the
//! receiver was left untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error kinds (machine-readable)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A required input was absent
    ArgumentNull,
    /// An index or dimension lies outside its valid range
    ArgumentOutOfRange,
    /// A value violates a structural precondition (shape, symmetry, ...)
    InvalidArgument,
    /// Mutation attempted through a read-only view
    NotSupported,
    /// Malformed external tabular input
    InvalidData,
    /// A row or column name could not be resolved
    NameNotFound,
}

impl ErrorKind {
    /// Stable code used in serialized output and `Display`
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::ArgumentNull => "ARGUMENT_NULL",
            ErrorKind::ArgumentOutOfRange => "ARGUMENT_OUT_OF_RANGE",
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::NotSupported => "NOT_SUPPORTED",
            ErrorKind::InvalidData => "INVALID_DATA",
            ErrorKind::NameNotFound => "NAME_NOT_FOUND",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Position inside a tabular source where an error occurred
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorContext {
    /// 1-based line number in the source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u64>,

    /// 0-based column position in the record
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,

    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

/// Structured error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabulaError {
    pub kind: ErrorKind,

    /// Human-readable error message
    pub message: String,

    /// Name of the offending parameter, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub param: Option<String>,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<ErrorContext>,
}

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, TabulaError>;

impl TabulaError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            param: None,
            suggestion: None,
            context: None,
        }
    }

    /// Builder: name the offending parameter
    pub fn for_param(mut self, param: impl Into<String>) -> Self {
        self.param = Some(param.into());
        self
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set source line
    pub fn at_line(mut self, line: u64) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.line = Some(line);
        self
    }

    /// Builder: set source column
    pub fn at_column(mut self, column: usize) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.column = Some(column);
        self
    }

    /// Builder: add a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        let ctx = self.context.get_or_insert_with(ErrorContext::default);
        ctx.notes.push(note.into());
        self
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    // ========== Common Error Constructors ==========

    pub fn argument_null(param: &str) -> Self {
        Self::new(ErrorKind::ArgumentNull, format!("Value cannot be absent: {}", param))
            .for_param(param)
    }

    pub fn out_of_range(param: &str, details: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArgumentOutOfRange, details).for_param(param)
    }

    /// Index `index` is not below `bound`
    pub fn index_out_of_range(param: &str, index: usize, bound: usize) -> Self {
        Self::out_of_range(
            param,
            format!("{} {} is out of range: must be less than {}", param, index, bound),
        )
        .with_suggestion(format!("Use an index in 0..{}", bound))
    }

    pub fn invalid_argument(param: &str, details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, details).for_param(param)
    }

    pub fn dimension_mismatch(param: &str, expected: (usize, usize), got: (usize, usize)) -> Self {
        Self::invalid_argument(
            param,
            format!(
                "Dimension mismatch: expected {}×{}, got {}×{}",
                expected.0, expected.1, got.0, got.1
            ),
        )
    }

    pub fn read_only() -> Self {
        Self::new(ErrorKind::NotSupported, "Specified method is not supported: the matrix is read only")
            .with_suggestion("Mutate the wrapped matrix, or clone the view")
    }

    pub fn invalid_data(details: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidData, details)
    }

    pub fn name_not_found(param: &str, name: &str) -> Self {
        Self::new(ErrorKind::NameNotFound, format!("No index is named '{}'", name))
            .for_param(param)
            .with_suggestion("Check the row and column names set on the matrix")
    }
}

impl fmt::Display for TabulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(ref param) = self.param {
            write!(f, " (parameter: {})", param)?;
        }
        if let Some(ref ctx) = self.context {
            match (ctx.line, ctx.column) {
                (Some(line), Some(column)) => write!(f, " at line {}, column {}", line, column)?,
                (Some(line), None) => write!(f, " at line {}", line)?,
                (None, Some(column)) => write!(f, " at column {}", column)?,
                (None, None) => {}
            }
        }
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for TabulaError {}
