//! Function-call transformation: the entry point of the core.
//!
//! Owns the decision tree for one function-call syntax node: name splitting,
//! the unsupported-feature gates, the window path, and the sugar rewrites
//! (bare COUNT, IF, IFNULL) that must run before generic dispatch.

use super::window::window_function_kind;
use super::Transformer;
use crate::error::TransformError;
use crate::types::{
    CaseCheck, CaseExpr, Expression, FunctionExpr, OperatorExpr, OperatorKind, SourceLocation,
    WindowExpr, WindowFunctionKind,
};
use serde::{Deserialize, Serialize};
use sqlparser::ast::{
    self, DuplicateTreatment, FunctionArg, FunctionArgumentClause, FunctionArguments, ObjectName,
    ObjectNamePart, Spanned, WindowType,
};
#[cfg(feature = "tracing")]
use tracing::debug;

impl Transformer {
    /// Transforms one function-call syntax node into exactly one typed
    /// expression node, or fails.
    pub fn transform_function_call(
        &mut self,
        func: &ast::Function,
    ) -> Result<Expression, TransformError> {
        let (schema, name) = split_function_name(&func.name)?;
        let name = name.to_lowercase();

        if has_aggregate_order_by(func) {
            return Err(TransformError::AggregateOrderBy);
        }
        let distinct = is_distinct(func);

        if let Some(over) = &func.over {
            return self.transform_window_call(func, over, schema, name, distinct);
        }

        let args = self.transform_expression_list(function_args(func)?)?;
        let filter = match func.filter.as_deref() {
            Some(predicate) => Some(self.transform_expression(predicate)?),
            None => None,
        };

        // The wildcard of count(*) is eaten by the argument walk, so a bare
        // count arrives here with no children.
        let name = if name == "count" && args.is_empty() {
            #[cfg(feature = "tracing")]
            debug!("rewriting bare count to count_star");
            "count_star".to_string()
        } else {
            name
        };

        if name == "if" {
            let Ok([when, then, otherwise]) = <[Expression; 3]>::try_from(args) else {
                return Err(TransformError::WrongArgumentCount { function: name });
            };
            return Ok(Expression::Case(CaseExpr {
                conditions: vec![CaseCheck { when, then }],
                else_expr: Some(Box::new(otherwise)),
            }));
        }

        if name == "ifnull" {
            if args.len() != 2 {
                return Err(TransformError::WrongArgumentCount { function: name });
            }
            return Ok(Expression::Operator(OperatorExpr {
                op: OperatorKind::Coalesce,
                args,
            }));
        }

        Ok(Expression::Function(FunctionExpr {
            schema,
            name,
            args,
            filter: filter.map(Box::new),
            distinct,
            location: SourceLocation::from_span(func.span()),
        }))
    }

    fn transform_window_call(
        &mut self,
        func: &ast::Function,
        over: &WindowType,
        schema: Option<String>,
        name: String,
        distinct: bool,
    ) -> Result<Expression, TransformError> {
        if distinct {
            return Err(TransformError::DistinctWindow);
        }

        let kind = window_function_kind(&name);
        let args = self.transform_expression_list(function_args(func)?)?;

        let mut children = Vec::new();
        let mut offset = None;
        let mut default = None;
        if kind == WindowFunctionKind::Aggregate {
            children = args;
        } else {
            // Everything but a window aggregate takes at most one child;
            // the second and third arguments are the LEAD/LAG offset and
            // default. The grammar never produces more.
            let mut args = args.into_iter();
            if let Some(first) = args.next() {
                children.push(first);
            }
            if let Some(second) = args.next() {
                require_lead_or_lag(kind, &name)?;
                offset = Some(Box::new(second));
            }
            if let Some(third) = args.next() {
                require_lead_or_lag(kind, &name)?;
                default = Some(Box::new(third));
            }
            if args.next().is_some() {
                return Err(TransformError::Internal(format!(
                    "window function \"{name}\" received more than three arguments"
                )));
            }
        }

        let resolved = self.resolve_window_spec(over)?;
        let mut partition_by = Vec::with_capacity(resolved.definition.partition_by.len());
        for expr in &resolved.definition.partition_by {
            partition_by.push(self.transform_expression(expr)?);
        }
        let order_by = self.transform_order_by(&resolved.definition.order_by)?;
        let frame = self.decode_window_frame(resolved.frame.window_frame.as_ref())?;

        Ok(Expression::Window(WindowExpr {
            kind,
            schema,
            name,
            args: children,
            partition_by,
            order_by,
            start: frame.start,
            end: frame.end,
            start_offset: frame.start_offset.map(Box::new),
            end_offset: frame.end_offset.map(Box::new),
            offset,
            default,
            location: SourceLocation::from_span(func.span()),
        }))
    }

    /// Transforms a system-value-function node (CURRENT_DATE, CURRENT_USER,
    /// ...) into a zero-argument function call under its canonical name.
    ///
    /// Passes `None` through unchanged, for optional clauses.
    pub fn transform_sql_value_function(
        &self,
        node: Option<SystemValueFunction>,
    ) -> Result<Option<Expression>, TransformError> {
        let Some(node) = node else {
            return Ok(None);
        };
        Ok(Some(Expression::Function(FunctionExpr {
            schema: None,
            name: node.function_name().to_string(),
            args: Vec::new(),
            filter: None,
            distinct: false,
            location: None,
        })))
    }
}

/// Splits a qualified or unqualified function name.
///
/// Two parts yield (schema, name); one part yields the unresolved-schema
/// sentinel, never a default schema. More parts, or name parts that are not
/// plain identifiers, are not supported.
fn split_function_name(name: &ObjectName) -> Result<(Option<String>, String), TransformError> {
    let ident_value = |part: &ObjectNamePart| {
        part.as_ident()
            .map(|ident| ident.value.clone())
            .ok_or_else(|| TransformError::Unsupported(format!("function name `{name}`")))
    };
    match name.0.as_slice() {
        [function] => Ok((None, ident_value(function)?)),
        [schema, function] => Ok((Some(ident_value(schema)?), ident_value(function)?)),
        _ => Err(TransformError::Unsupported(format!(
            "function name `{name}` with more than two parts"
        ))),
    }
}

fn function_args(func: &ast::Function) -> Result<&[FunctionArg], TransformError> {
    match &func.args {
        FunctionArguments::None => Ok(&[]),
        FunctionArguments::List(list) => Ok(&list.args),
        FunctionArguments::Subquery(_) => Err(TransformError::Unsupported(
            "subquery function arguments".to_string(),
        )),
    }
}

fn is_distinct(func: &ast::Function) -> bool {
    matches!(
        &func.args,
        FunctionArguments::List(list)
            if list.duplicate_treatment == Some(DuplicateTreatment::Distinct)
    )
}

/// ORDER BY inside an aggregate call, in either the argument-list or the
/// WITHIN GROUP form.
fn has_aggregate_order_by(func: &ast::Function) -> bool {
    if !func.within_group.is_empty() {
        return true;
    }
    match &func.args {
        FunctionArguments::List(list) => list
            .clauses
            .iter()
            .any(|clause| matches!(clause, FunctionArgumentClause::OrderBy(_))),
        _ => false,
    }
}

fn require_lead_or_lag(kind: WindowFunctionKind, name: &str) -> Result<(), TransformError> {
    if matches!(kind, WindowFunctionKind::Lead | WindowFunctionKind::Lag) {
        return Ok(());
    }
    Err(TransformError::Internal(format!(
        "window function \"{name}\" received extra arguments only valid for lead/lag"
    )))
}

/// A parameterless system-value operation produced by the grammar.
///
/// The enumeration is closed, so the mapping to canonical names is total;
/// an unknown operation cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemValueFunction {
    CurrentDate,
    CurrentTime,
    CurrentTimeN,
    CurrentTimestamp,
    CurrentTimestampN,
    Localtime,
    LocaltimeN,
    Localtimestamp,
    LocaltimestampN,
    CurrentRole,
    CurrentUser,
    User,
    SessionUser,
    CurrentCatalog,
    CurrentSchema,
}

impl SystemValueFunction {
    /// The canonical lowercase function name for this operation.
    pub fn function_name(self) -> &'static str {
        match self {
            Self::CurrentDate => "current_date",
            Self::CurrentTime => "current_time",
            Self::CurrentTimeN => "current_time_n",
            Self::CurrentTimestamp => "current_timestamp",
            Self::CurrentTimestampN => "current_timestamp_n",
            Self::Localtime => "current_localtime",
            Self::LocaltimeN => "current_localtime_n",
            Self::Localtimestamp => "current_localtimestamp",
            Self::LocaltimestampN => "current_localtimestamp_n",
            Self::CurrentRole => "current_role",
            Self::CurrentUser => "current_user",
            Self::User => "user",
            Self::SessionUser => "session_user",
            Self::CurrentCatalog => "current_catalog",
            Self::CurrentSchema => "current_schema",
        }
    }
}
