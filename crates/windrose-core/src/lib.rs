//! Windrose core: transforms sqlparser function-call and window-function
//! syntax nodes into a typed expression AST for later binding and planning.
//!
//! The crate sits between the external grammar (the `sqlparser` crate) and a
//! query compiler's semantic stages: it classifies window functions, decodes
//! frame boundaries, resolves named-window reference chains, and expands the
//! IF/IFNULL/bare-COUNT sugar forms, producing owned AST nodes that carry no
//! references back into the parse tree. Catalog resolution, type checking
//! and evaluation are later stages' concerns.

pub mod error;
pub mod parser;
pub mod transform;
pub mod types;

// Re-export main types and functions
pub use error::{ParseError, TransformError};
pub use parser::{parse_sql, parse_sql_with_dialect};
pub use transform::{window_function_kind, SystemValueFunction, Transformer};

// Re-export types explicitly
pub use types::{
    CaseCheck,
    CaseExpr,
    ColumnExpr,
    Dialect,
    Expression,
    FunctionExpr,
    LiteralExpr,
    LiteralValue,
    NullOrder,
    OperatorExpr,
    OperatorKind,
    OrderByNode,
    OrderDirection,
    SourceLocation,
    TransformOptions,
    WindowBoundary,
    WindowExpr,
    WindowFunctionKind,
};
