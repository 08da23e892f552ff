//! Thin wrappers over the external grammar library.
//!
//! The transformer consumes sqlparser's syntax tree; these helpers produce
//! that tree from raw SQL text with dialect selection and structured errors.

use crate::error::ParseError;
use crate::types::Dialect;
use sqlparser::ast::Statement;
use sqlparser::parser::Parser;

/// Parse SQL using the specified dialect.
pub fn parse_sql_with_dialect(sql: &str, dialect: Dialect) -> Result<Vec<Statement>, ParseError> {
    let sqlparser_dialect = dialect.to_sqlparser_dialect();
    Parser::parse_sql(sqlparser_dialect.as_ref(), sql)
        .map_err(|err| ParseError::from(err).with_dialect(dialect))
}

/// Parse SQL using the generic dialect.
pub fn parse_sql(sql: &str) -> Result<Vec<Statement>, ParseError> {
    parse_sql_with_dialect(sql, Dialect::Generic)
}
