//! Public types: the transformed AST, dialect selection, and options.

mod ast;
mod common;

pub use ast::{
    CaseCheck, CaseExpr, ColumnExpr, Expression, FunctionExpr, LiteralExpr, LiteralValue,
    NullOrder, OperatorExpr, OperatorKind, OrderByNode, OrderDirection, WindowBoundary,
    WindowExpr, WindowFunctionKind,
};
pub use common::{
    Dialect, SourceLocation, TransformOptions, DEFAULT_MAX_EXPRESSION_DEPTH,
};
