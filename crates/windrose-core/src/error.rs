//! Error types for SQL parsing and transformation.
//!
//! # Error Handling Strategy
//!
//! Two error types with distinct lifecyles:
//!
//! - [`ParseError`]: the grammar library rejected the raw SQL text. Nothing
//!   reaches the transformer.
//!
//! - [`TransformError`]: the transformer rejected a well-parsed syntax node.
//!   These split into user errors (the query asks for something this core
//!   does not support, and rewriting the query fixes it) and internal
//!   invariant violations (the grammar handed us something it promised not
//!   to); [`TransformError::is_internal`] tells them apart.
//!
//! Every transform failure aborts the whole statement: no partial AST is
//! returned and the caller discards anything built so far.

use crate::types::Dialect;
use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

/// Error encountered while parsing raw SQL text.
///
/// Preserves position information when the underlying parser reports it.
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Human-readable error message.
    pub message: String,
    /// Line/column where the error occurred, if available.
    pub position: Option<(usize, usize)>,
    /// The SQL dialect being parsed when the error occurred.
    pub dialect: Option<Dialect>,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            position: None,
            dialect: None,
        }
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    /// Parses position from the sqlparser error message format,
    /// "... at Line: X, Column: Y".
    ///
    /// Coupled to the `sqlparser` crate's message format; returns `None`
    /// when the expected pattern is not found.
    fn parse_position_from_message(message: &str) -> Option<(usize, usize)> {
        static POSITION_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = POSITION_REGEX.get_or_init(|| {
            Regex::new(r"Line:\s*(\d+)\s*,\s*Column:\s*(\d+)").expect("Invalid regex pattern")
        });

        re.captures(message).and_then(|caps| {
            let line: usize = caps.get(1)?.as_str().parse().ok()?;
            let column: usize = caps.get(2)?.as_str().parse().ok()?;
            Some((line, column))
        })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Parse error")?;
        if let Some(dialect) = self.dialect {
            write!(f, " ({dialect:?})")?;
        }
        if let Some((line, column)) = self.position {
            write!(f, " at line {line}, column {column}")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl From<sqlparser::parser::ParserError> for ParseError {
    fn from(err: sqlparser::parser::ParserError) -> Self {
        let message = err.to_string();
        let position = Self::parse_position_from_message(&message);
        Self {
            message,
            position,
            dialect: None,
        }
    }
}

/// Error encountered while transforming a syntax node into the typed AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    /// Sort-within-aggregate is not supported by this core.
    #[error("ORDER BY is not implemented for aggregates")]
    AggregateOrderBy,

    /// Distinct window aggregates are not supported.
    #[error("DISTINCT is not implemented for window functions")]
    DistinctWindow,

    /// IF/IFNULL sugar called with the wrong arity.
    #[error("Wrong number of arguments to {}.", .function.to_uppercase())]
    WrongArgumentCount { function: String },

    /// An OVER clause referenced a window that was never declared.
    #[error("window \"{0}\" does not exist")]
    UnknownWindow(String),

    /// A frame cannot end before its start nor start after its end.
    #[error(
        "window frames starting with unbounded following or ending in \
         unbounded preceding make no sense"
    )]
    InvalidFrame,

    /// A syntactic construct this core does not handle.
    #[error("{0} is not supported")]
    Unsupported(String),

    /// The expression tree exceeded the configured nesting limit.
    #[error("expression is too deeply nested (maximum depth {max})")]
    TooDeeplyNested { max: usize },

    /// An upstream invariant was violated; indicates a bug in the grammar
    /// or in this core, not in the user's query.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TransformError {
    /// Whether this error signals an internal invariant violation rather
    /// than a user-correctable mistake.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
