//! End-to-end tests: SQL text through the parser into the transformer.

use sqlparser::ast::{SelectItem, SetExpr, Statement};
use windrose_core::{
    parse_sql_with_dialect, Dialect, Expression, NullOrder, OrderDirection, TransformError,
    Transformer, WindowBoundary, WindowFunctionKind,
};

/// Parses a single SELECT, registers its WINDOW clause declarations, and
/// transforms the first projection item. This mirrors what the surrounding
/// statement transformer does before handing function calls to the core.
fn transform_first_projection(sql: &str) -> Result<Expression, TransformError> {
    let statements =
        parse_sql_with_dialect(sql, Dialect::Generic).expect("test SQL should parse");
    let Statement::Query(query) = &statements[0] else {
        panic!("expected a query statement");
    };
    let SetExpr::Select(select) = query.body.as_ref() else {
        panic!("expected a plain select");
    };

    let mut transformer = Transformer::new();
    for declaration in &select.named_window {
        transformer.register_named_window(&declaration.0, &declaration.1)?;
    }

    let expr = match &select.projection[0] {
        SelectItem::UnnamedExpr(expr) | SelectItem::ExprWithAlias { expr, .. } => expr,
        other => panic!("expected an expression projection, got {other:?}"),
    };
    transformer.transform_expression(expr)
}

fn expect_window(result: Result<Expression, TransformError>) -> windrose_core::WindowExpr {
    match result {
        Ok(Expression::Window(win)) => win,
        other => panic!("expected a window expression, got {other:?}"),
    }
}

#[test]
fn count_star_through_full_pipeline() {
    let result = transform_first_projection("SELECT count(*) FROM t").unwrap();
    let Expression::Function(func) = result else {
        panic!("expected a function expression");
    };
    assert_eq!(func.name, "count_star");
    assert!(func.args.is_empty());
    assert!(func.location.is_some());
}

#[test]
fn window_aggregate_with_explicit_frame() {
    let win = expect_window(transform_first_projection(
        "SELECT sum(x) OVER (PARTITION BY grp ORDER BY ts ROWS BETWEEN 2 PRECEDING AND CURRENT ROW) FROM t",
    ));
    assert_eq!(win.kind, WindowFunctionKind::Aggregate);
    assert_eq!(win.name, "sum");
    assert_eq!(win.partition_by.len(), 1);
    assert_eq!(win.order_by.len(), 1);
    assert_eq!(win.start, WindowBoundary::ExprPreceding);
    assert!(win.start_offset.is_some());
    assert_eq!(win.end, WindowBoundary::CurrentRowRows);
    assert!(win.end_offset.is_none());
}

#[test]
fn window_without_frame_gets_range_defaults() {
    let win = expect_window(transform_first_projection(
        "SELECT row_number() OVER (ORDER BY ts) FROM t",
    ));
    assert_eq!(win.kind, WindowFunctionKind::RowNumber);
    assert_eq!(win.start, WindowBoundary::UnboundedPreceding);
    assert_eq!(win.end, WindowBoundary::CurrentRowRange);
}

#[test]
fn order_by_direction_and_null_order_survive() {
    let win = expect_window(transform_first_projection(
        "SELECT rank() OVER (ORDER BY a DESC NULLS FIRST, b) FROM t",
    ));
    assert_eq!(win.order_by.len(), 2);
    assert_eq!(win.order_by[0].direction, OrderDirection::Descending);
    assert_eq!(win.order_by[0].null_order, NullOrder::NullsFirst);
    assert_eq!(win.order_by[1].direction, OrderDirection::Ascending);
    assert_eq!(win.order_by[1].null_order, NullOrder::Default);
}

#[test]
fn named_window_supplies_partition_and_frame() {
    let win = expect_window(transform_first_projection(
        "SELECT sum(x) OVER w FROM t \
         WINDOW w AS (PARTITION BY grp ORDER BY ts ROWS UNBOUNDED PRECEDING)",
    ));
    assert_eq!(win.partition_by.len(), 1);
    assert_eq!(win.order_by.len(), 1);
    assert_eq!(win.start, WindowBoundary::UnboundedPreceding);
    assert_eq!(win.end, WindowBoundary::CurrentRowRows);
}

#[test]
fn reference_chain_splits_definition_and_frame_views() {
    // a carries its own ROWS frame but borrows partition/order from b;
    // b has a distinguishable RANGE default frame and its own ordering.
    let win = expect_window(transform_first_projection(
        "SELECT sum(x) OVER a FROM t \
         WINDOW b AS (PARTITION BY grp ORDER BY ts DESC), \
                a AS (b ROWS BETWEEN 1 PRECEDING AND 1 FOLLOWING)",
    ));
    // partition/order come from b
    assert_eq!(win.partition_by.len(), 1);
    assert_eq!(win.order_by.len(), 1);
    assert_eq!(win.order_by[0].direction, OrderDirection::Descending);
    // frame comes from a itself, not from b
    assert_eq!(win.start, WindowBoundary::ExprPreceding);
    assert_eq!(win.end, WindowBoundary::ExprFollowing);
    assert!(win.start_offset.is_some());
    assert!(win.end_offset.is_some());
}

#[test]
fn inline_reference_to_named_window_inherits_ordering() {
    let win = expect_window(transform_first_projection(
        "SELECT rank() OVER (b) FROM t WINDOW b AS (PARTITION BY grp ORDER BY ts)",
    ));
    assert_eq!(win.partition_by.len(), 1);
    assert_eq!(win.order_by.len(), 1);
}

#[test]
fn undeclared_window_reference_fails_by_name() {
    let err = transform_first_projection("SELECT sum(x) OVER missing FROM t").unwrap_err();
    assert_eq!(err, TransformError::UnknownWindow("missing".into()));
    assert_eq!(err.to_string(), "window \"missing\" does not exist");
}

#[test]
fn window_names_resolve_case_insensitively() {
    let win = expect_window(transform_first_projection(
        "SELECT sum(x) OVER W FROM t WINDOW w AS (PARTITION BY grp)",
    ));
    assert_eq!(win.partition_by.len(), 1);
}

#[test]
fn unbounded_frame_in_both_directions() {
    let win = expect_window(transform_first_projection(
        "SELECT sum(x) OVER (ROWS BETWEEN UNBOUNDED PRECEDING AND UNBOUNDED FOLLOWING) FROM t",
    ));
    assert_eq!(win.start, WindowBoundary::UnboundedPreceding);
    assert_eq!(win.end, WindowBoundary::UnboundedFollowing);
    assert!(win.start_offset.is_none());
    assert!(win.end_offset.is_none());
}

#[test]
fn backwards_frame_is_rejected() {
    let err = transform_first_projection(
        "SELECT sum(x) OVER (ROWS BETWEEN UNBOUNDED FOLLOWING AND UNBOUNDED FOLLOWING) FROM t",
    )
    .unwrap_err();
    assert_eq!(err, TransformError::InvalidFrame);
    assert!(!err.is_internal());
}

#[test]
fn lead_with_offset_and_default_through_sql() {
    let win = expect_window(transform_first_projection(
        "SELECT lead(x, 2, 0) OVER (ORDER BY ts) FROM t",
    ));
    assert_eq!(win.kind, WindowFunctionKind::Lead);
    assert_eq!(win.args.len(), 1);
    let offset = win.offset.expect("lead offset should be set");
    let Expression::Literal(lit) = *offset else {
        panic!("expected a literal offset");
    };
    assert_eq!(lit.value, windrose_core::LiteralValue::Number("2".into()));
    assert!(win.default.is_some());
}

#[test]
fn dense_rank_alias_matches_rank_dense() {
    let via_alias = expect_window(transform_first_projection(
        "SELECT dense_rank() OVER (ORDER BY x) FROM t",
    ));
    let via_canonical = expect_window(transform_first_projection(
        "SELECT rank_dense() OVER (ORDER BY x) FROM t",
    ));
    assert_eq!(via_alias.kind, via_canonical.kind);
    assert_eq!(via_alias.kind, WindowFunctionKind::DenseRank);
}

#[test]
fn if_sugar_through_sql() {
    let result = transform_first_projection("SELECT if(a, b, c) FROM t").unwrap();
    let Expression::Case(case) = result else {
        panic!("expected a case expression");
    };
    assert_eq!(case.conditions.len(), 1);
    let Expression::Column(when) = &case.conditions[0].when else {
        panic!("expected a column in WHEN");
    };
    assert_eq!(when.name, "a");
    let else_expr = case.else_expr.expect("else branch should be set");
    let Expression::Column(otherwise) = *else_expr else {
        panic!("expected a column in ELSE");
    };
    assert_eq!(otherwise.name, "c");
}

#[test]
fn ifnull_sugar_through_sql() {
    let result = transform_first_projection("SELECT ifnull(a, b) FROM t").unwrap();
    let Expression::Operator(op) = result else {
        panic!("expected an operator expression");
    };
    assert_eq!(op.op, windrose_core::OperatorKind::Coalesce);
    assert_eq!(op.args.len(), 2);
}

#[test]
fn transformation_is_deterministic() {
    let sql = "SELECT lag(x, 1) OVER (PARTITION BY grp ORDER BY ts \
               ROWS BETWEEN 3 PRECEDING AND CURRENT ROW) FROM t";
    let first = transform_first_projection(sql).unwrap();
    let second = transform_first_projection(sql).unwrap();
    assert_eq!(first, second);
}

#[test]
fn nested_function_arguments_transform_recursively() {
    let result = transform_first_projection("SELECT sum(ifnull(x, 0)) FROM t").unwrap();
    let Expression::Function(func) = result else {
        panic!("expected a function expression");
    };
    assert_eq!(func.name, "sum");
    assert!(matches!(func.args[0], Expression::Operator(_)));
}

#[test]
fn transformed_ast_serializes_to_json() {
    let result = transform_first_projection(
        "SELECT ntile(4) OVER (ORDER BY score) FROM results",
    )
    .unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["kind"], "window");
    assert_eq!(json["windowKind"], "ntile");
    assert_eq!(json["name"], "ntile");
    assert_eq!(json["start"], "unbounded_preceding");

    let back: Expression = serde_json::from_value(json).unwrap();
    assert_eq!(back, result);
}
