//! Transformation of raw grammar syntax nodes into the typed expression AST.
//!
//! [`Transformer`] is the statement-scoped context: it owns the named-window
//! table populated by the caller's WINDOW-clause pass, the recursion-depth
//! counter, and the options. One `Transformer` per statement; the table must
//! never be shared across statements, and dropping the transformer drops it.
//!
//! Control flow is a synchronous recursive descent. Data flows one way, raw
//! syntax node in, owned AST node out; raw nodes are never retained.

mod expression;
mod function;
mod window;

pub use function::SystemValueFunction;
pub use window::window_function_kind;

use crate::error::TransformError;
use crate::types::TransformOptions;
use sqlparser::ast::{Ident, NamedWindowExpr, WindowSpec};
use std::collections::HashMap;
#[cfg(feature = "tracing")]
use tracing::debug;

/// Statement-scoped transformation context.
pub struct Transformer {
    options: TransformOptions,
    /// Named windows declared by the statement's WINDOW clause, keyed by
    /// lowercased name. Populated before any function-call transformation
    /// runs and read-only thereafter.
    window_clauses: HashMap<String, WindowSpec>,
    depth: usize,
}

impl Transformer {
    pub fn new() -> Self {
        Self::with_options(TransformOptions::default())
    }

    pub fn with_options(options: TransformOptions) -> Self {
        Self {
            options,
            window_clauses: HashMap::new(),
            depth: 0,
        }
    }

    /// Registers a named window declared in the statement's WINDOW clause.
    ///
    /// The alias form `WINDOW a AS b` resolves `b` immediately, so the table
    /// only ever holds concrete specifications; an alias to an undeclared
    /// window fails here rather than at first use.
    pub fn register_named_window(
        &mut self,
        name: &Ident,
        window: &NamedWindowExpr,
    ) -> Result<(), TransformError> {
        let spec = match window {
            NamedWindowExpr::WindowSpec(spec) => spec.clone(),
            NamedWindowExpr::NamedWindow(target) => self.lookup_window(&target.value)?.clone(),
        };
        self.window_clauses.insert(name.value.to_lowercase(), spec);
        Ok(())
    }

    /// Case-insensitive lookup in the named-window table.
    pub(crate) fn lookup_window(&self, name: &str) -> Result<&WindowSpec, TransformError> {
        self.window_clauses
            .get(&name.to_lowercase())
            .ok_or_else(|| TransformError::UnknownWindow(name.to_string()))
    }

    /// Bumps the recursion-depth counter, failing once the configured
    /// maximum is exceeded. Paired with [`Self::ascend`].
    pub(crate) fn descend(&mut self) -> Result<(), TransformError> {
        if self.depth >= self.options.max_expression_depth {
            #[cfg(feature = "tracing")]
            debug!(depth = self.depth, "expression nesting limit reached");
            return Err(TransformError::TooDeeplyNested {
                max: self.options.max_expression_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn ascend(&mut self) {
        self.depth -= 1;
    }
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}
