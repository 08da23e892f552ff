//! Common types shared across the parser and transformer.

use serde::{Deserialize, Serialize};

/// Default cap on expression nesting depth during transformation.
///
/// Transformation is a recursive descent over the raw syntax tree, so
/// pathologically nested input would otherwise exhaust the call stack.
pub const DEFAULT_MAX_EXPRESSION_DEPTH: usize = 100;

/// SQL dialect to use when parsing raw text into the grammar tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Generic,
    Ansi,
    Bigquery,
    Clickhouse,
    Databricks,
    Duckdb,
    Hive,
    Mssql,
    Mysql,
    Postgres,
    Redshift,
    Snowflake,
    Sqlite,
}

impl Dialect {
    pub fn to_sqlparser_dialect(&self) -> Box<dyn sqlparser::dialect::Dialect> {
        use sqlparser::dialect::{
            AnsiDialect, BigQueryDialect, ClickHouseDialect, DatabricksDialect, DuckDbDialect,
            GenericDialect, HiveDialect, MsSqlDialect, MySqlDialect, PostgreSqlDialect,
            RedshiftSqlDialect, SQLiteDialect, SnowflakeDialect,
        };
        match self {
            Self::Generic => Box::new(GenericDialect {}),
            Self::Ansi => Box::new(AnsiDialect {}),
            Self::Bigquery => Box::new(BigQueryDialect {}),
            Self::Clickhouse => Box::new(ClickHouseDialect {}),
            Self::Databricks => Box::new(DatabricksDialect {}),
            Self::Duckdb => Box::new(DuckDbDialect {}),
            Self::Hive => Box::new(HiveDialect {}),
            Self::Mssql => Box::new(MsSqlDialect {}),
            Self::Mysql => Box::new(MySqlDialect {}),
            Self::Postgres => Box::new(PostgreSqlDialect {}),
            Self::Redshift => Box::new(RedshiftSqlDialect {}),
            Self::Snowflake => Box::new(SnowflakeDialect {}),
            Self::Sqlite => Box::new(SQLiteDialect {}),
        }
    }
}

/// A line/column position in the source SQL text, carried through to the
/// transformed AST for later error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    /// Line number (1-indexed).
    pub line: u64,
    /// Column number (1-indexed).
    pub column: u64,
}

impl SourceLocation {
    pub fn new(line: u64, column: u64) -> Self {
        Self { line, column }
    }

    /// Extracts the starting location from a sqlparser span.
    ///
    /// sqlparser reports an empty span (line 0) for synthesized nodes; those
    /// carry no usable location.
    pub(crate) fn from_span(span: sqlparser::tokenizer::Span) -> Option<Self> {
        if span.start.line == 0 {
            return None;
        }
        Some(Self {
            line: span.start.line,
            column: span.start.column,
        })
    }
}

/// Options controlling the transformation behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    /// Maximum expression nesting depth before transformation is aborted
    /// with a dedicated "too deeply nested" error.
    #[serde(default = "default_max_expression_depth")]
    pub max_expression_depth: usize,
}

fn default_max_expression_depth() -> usize {
    DEFAULT_MAX_EXPRESSION_DEPTH
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            max_expression_depth: DEFAULT_MAX_EXPRESSION_DEPTH,
        }
    }
}
