// ABOUTME: Error taxonomy for parsing and evaluation failures.

use thiserror::Error;

// Arity-message constants, pre-allocated to keep error construction
// allocation-free on the hot path.
pub const ARITY_ZERO: &str = "0";
pub const ARITY_ONE: &str = "1";
pub const ARITY_TWO: &str = "2";
pub const ARITY_THREE: &str = "3";
pub const ARITY_AT_LEAST_ONE: &str = "at least 1";
pub const ARITY_AT_LEAST_TWO: &str = "at least 2";

/// The error taxonomy from the interpreter's diagnostics design: every
/// fallible core operation returns `Result<T, ErrorKind>` so a host can
/// match on structured data instead of string-sniffing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorKind {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("unbound symbol: {0}")]
    Unbound(String),

    #[error("{function}: expected {expected} argument(s), got {actual}")]
    Arguments {
        function: String,
        expected: String,
        actual: usize,
    },

    #[error("{function}: expected {expected}, got {actual}")]
    WrongType {
        function: String,
        expected: String,
        actual: String,
    },

    #[error("integer literal overflows i64: {0}")]
    NumOverflow(String),

    #[error("integer literal underflows i64: {0}")]
    NumUnderflow(String),

    #[error("allocation failure")]
    Allocation,

    #[error("unknown error")]
    Unknown,
}

impl ErrorKind {
    pub fn wrong_type(function: &str, expected: &str, actual: &str) -> Self {
        ErrorKind::WrongType {
            function: function.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }

    pub fn arguments(function: &str, expected: impl Into<String>, actual: usize) -> Self {
        ErrorKind::Arguments {
            function: function.to_string(),
            expected: expected.into(),
            actual,
        }
    }

    /// The discriminant name used by the `error_type_str` embedding call.
    pub fn kind_str(&self) -> &'static str {
        match self {
            ErrorKind::Syntax(_) => "SYNTAX",
            ErrorKind::Unbound(_) => "UNBOUND",
            ErrorKind::Arguments { .. } => "ARGUMENTS",
            ErrorKind::WrongType { .. } => "WRONG_TYPE",
            ErrorKind::NumOverflow(_) => "NUM_OVERFLOW",
            ErrorKind::NumUnderflow(_) => "NUM_UNDERFLOW",
            ErrorKind::Allocation => "ALLOCATION",
            ErrorKind::Unknown => "UNKNOWN",
        }
    }
}
