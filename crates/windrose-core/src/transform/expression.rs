//! The general expression transformer.
//!
//! Handles the raw expression forms that appear inside function arguments,
//! FILTER clauses, partition/order lists and frame offsets. Function calls
//! recurse into the function-call transformer; every other supported variant
//! maps directly onto one of the typed AST nodes. Unsupported variants fail
//! rather than being dropped.

use super::Transformer;
use crate::error::TransformError;
use crate::types::{
    CaseCheck, CaseExpr, ColumnExpr, Expression, LiteralExpr, LiteralValue, NullOrder,
    OperatorExpr, OperatorKind, OrderByNode, OrderDirection,
};
use sqlparser::ast::{
    Expr, FunctionArg, FunctionArgExpr, OrderByExpr, UnaryOperator, Value, ValueWithSpan,
};

impl Transformer {
    /// Transforms one raw expression node into a typed AST node.
    ///
    /// Entry point for every nested expression; the depth guard lives here
    /// so that all recursion paths share one counter.
    pub fn transform_expression(&mut self, expr: &Expr) -> Result<Expression, TransformError> {
        self.descend()?;
        let result = self.transform_expression_inner(expr);
        self.ascend();
        result
    }

    fn transform_expression_inner(&mut self, expr: &Expr) -> Result<Expression, TransformError> {
        match expr {
            Expr::Identifier(ident) => Ok(Expression::Column(ColumnExpr {
                relation: None,
                name: ident.value.clone(),
            })),
            Expr::CompoundIdentifier(parts) if parts.len() >= 2 => {
                let relation = parts[..parts.len() - 1]
                    .iter()
                    .map(|part| part.value.as_str())
                    .collect::<Vec<_>>()
                    .join(".");
                let name = parts[parts.len() - 1].value.clone();
                Ok(Expression::Column(ColumnExpr {
                    relation: Some(relation),
                    name,
                }))
            }
            Expr::Value(value) => self.transform_literal(value),
            Expr::Nested(inner) => self.transform_expression(inner),
            Expr::IsNull(inner) => self.transform_unary(OperatorKind::IsNull, inner),
            Expr::IsNotNull(inner) => self.transform_unary(OperatorKind::IsNotNull, inner),
            Expr::UnaryOp {
                op: UnaryOperator::Not,
                expr: inner,
            } => self.transform_unary(OperatorKind::Not, inner),
            Expr::Case {
                operand: None,
                conditions,
                else_result,
                ..
            } => {
                let mut checks = Vec::with_capacity(conditions.len());
                for case_when in conditions {
                    checks.push(CaseCheck {
                        when: self.transform_expression(&case_when.condition)?,
                        then: self.transform_expression(&case_when.result)?,
                    });
                }
                let else_expr = match else_result {
                    Some(inner) => Some(Box::new(self.transform_expression(inner)?)),
                    None => None,
                };
                Ok(Expression::Case(CaseExpr {
                    conditions: checks,
                    else_expr,
                }))
            }
            Expr::Function(func) => self.transform_function_call(func),
            other => Err(TransformError::Unsupported(format!(
                "expression `{other}`"
            ))),
        }
    }

    fn transform_unary(
        &mut self,
        op: OperatorKind,
        inner: &Expr,
    ) -> Result<Expression, TransformError> {
        Ok(Expression::Operator(OperatorExpr {
            op,
            args: vec![self.transform_expression(inner)?],
        }))
    }

    fn transform_literal(&self, value: &ValueWithSpan) -> Result<Expression, TransformError> {
        let value = match &value.value {
            Value::Number(text, _) => LiteralValue::Number(text.clone()),
            Value::SingleQuotedString(text) | Value::DoubleQuotedString(text) => {
                LiteralValue::String(text.clone())
            }
            Value::Boolean(flag) => LiteralValue::Boolean(*flag),
            Value::Null => LiteralValue::Null,
            other => {
                return Err(TransformError::Unsupported(format!("literal `{other}`")));
            }
        };
        Ok(Expression::Literal(LiteralExpr { value }))
    }

    /// Transforms an ordered function-argument list.
    ///
    /// Wildcard arguments are eaten here, mirroring the grammar's treatment
    /// of `count(*)`: the star never survives as a child expression.
    pub fn transform_expression_list(
        &mut self,
        args: &[FunctionArg],
    ) -> Result<Vec<Expression>, TransformError> {
        let mut out = Vec::with_capacity(args.len());
        for arg in args {
            match arg {
                FunctionArg::Unnamed(FunctionArgExpr::Expr(expr)) => {
                    out.push(self.transform_expression(expr)?);
                }
                FunctionArg::Unnamed(
                    FunctionArgExpr::Wildcard | FunctionArgExpr::QualifiedWildcard(_),
                ) => {}
                FunctionArg::Named { .. } | FunctionArg::ExprNamed { .. } => {
                    return Err(TransformError::Unsupported(
                        "named function arguments".to_string(),
                    ));
                }
            }
        }
        Ok(out)
    }

    /// Transforms an ORDER BY list into (expression, direction, null-order)
    /// triples.
    pub fn transform_order_by(
        &mut self,
        order_by: &[OrderByExpr],
    ) -> Result<Vec<OrderByNode>, TransformError> {
        let mut out = Vec::with_capacity(order_by.len());
        for item in order_by {
            let direction = match item.options.asc {
                Some(false) => OrderDirection::Descending,
                _ => OrderDirection::Ascending,
            };
            let null_order = match item.options.nulls_first {
                Some(true) => NullOrder::NullsFirst,
                Some(false) => NullOrder::NullsLast,
                None => NullOrder::Default,
            };
            out.push(OrderByNode {
                expr: self.transform_expression(&item.expr)?,
                direction,
                null_order,
            });
        }
        Ok(out)
    }
}
