//! The transformed expression AST.
//!
//! These nodes are what the transformer hands back to the surrounding
//! statement compiler: a closed set of strongly typed variants, built once
//! from the raw grammar tree and never mutated afterwards. Name resolution,
//! type checking and evaluation all happen in later stages; nothing here
//! refers back into the raw syntax nodes it was built from.

use super::common::SourceLocation;
use serde::{Deserialize, Serialize};

/// A transformed expression node.
///
/// Consumers match exhaustively on this enum; adding a variant is a breaking
/// change by design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum Expression {
    Function(FunctionExpr),
    Window(WindowExpr),
    Case(CaseExpr),
    Operator(OperatorExpr),
    Column(ColumnExpr),
    Literal(LiteralExpr),
}

/// A generic function call, pending schema/function binding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionExpr {
    /// Qualifying schema, or `None` when the name was unqualified and the
    /// schema must be resolved at bind time. Never silently defaulted.
    pub schema: Option<String>,
    /// Lowercased function name; original case is not preserved.
    pub name: String,
    pub args: Vec<Expression>,
    /// Optional FILTER clause predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Box<Expression>>,
    pub distinct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

/// A window-function invocation with its fully resolved specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowExpr {
    /// Serialized as `windowKind`: the enclosing [`Expression`] enum already
    /// claims the `kind` key as its variant tag.
    #[serde(rename = "windowKind")]
    pub kind: WindowFunctionKind,
    pub schema: Option<String>,
    /// Lowercased function name.
    pub name: String,
    pub args: Vec<Expression>,
    pub partition_by: Vec<Expression>,
    pub order_by: Vec<OrderByNode>,
    pub start: WindowBoundary,
    pub end: WindowBoundary,
    /// Offset for an `ExprPreceding`/`ExprFollowing` start boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_offset: Option<Box<Expression>>,
    /// Offset for an `ExprPreceding`/`ExprFollowing` end boundary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_offset: Option<Box<Expression>>,
    /// Second argument of LEAD/LAG; unused for every other kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Box<Expression>>,
    /// Third argument of LEAD/LAG; unused for every other kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Box<Expression>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

/// The fixed set of recognized window-function kinds.
///
/// Names outside the fixed table classify as `Aggregate`: that is how
/// ordinary aggregates (`sum`, `avg`, ...) invoked with OVER become window
/// aggregates, not an error path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowFunctionKind {
    Rank,
    DenseRank,
    PercentRank,
    RowNumber,
    FirstValue,
    LastValue,
    CumeDist,
    Lead,
    Lag,
    Ntile,
    /// An aggregate function used as a window function.
    Aggregate,
}

/// One endpoint of a window frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowBoundary {
    UnboundedPreceding,
    UnboundedFollowing,
    /// `<expr> PRECEDING`; the offset lives in the window's
    /// `start_offset`/`end_offset`.
    ExprPreceding,
    /// `<expr> FOLLOWING`.
    ExprFollowing,
    CurrentRowRange,
    CurrentRowRows,
}

/// A searched CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseExpr {
    pub conditions: Vec<CaseCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub else_expr: Option<Box<Expression>>,
}

/// One WHEN/THEN pair of a CASE expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseCheck {
    pub when: Expression,
    pub then: Expression,
}

/// A built-in operator applied to its operands in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperatorExpr {
    pub op: OperatorKind,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    Coalesce,
    Not,
    IsNull,
    IsNotNull,
}

/// A column reference, unresolved against any catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnExpr {
    /// Qualifying table or alias path, joined with `.` when compound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<String>,
    pub name: String,
}

/// A literal constant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteralExpr {
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "value")]
pub enum LiteralValue {
    /// Numeric literals keep their source text; parsing into a numeric type
    /// is a binding concern.
    Number(String),
    String(String),
    Boolean(bool),
    Null,
}

/// One ORDER BY item of a window specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderByNode {
    pub expr: Expression,
    pub direction: OrderDirection,
    pub null_order: NullOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum NullOrder {
    /// No explicit NULLS FIRST/LAST; the execution default applies.
    #[default]
    Default,
    NullsFirst,
    NullsLast,
}

impl Expression {
    /// Convenience constructor for a NULL literal.
    pub fn null() -> Self {
        Self::Literal(LiteralExpr {
            value: LiteralValue::Null,
        })
    }
}
