//! Window specification resolution, frame decoding, and kind
//! classification.

use super::Transformer;
use crate::error::TransformError;
use crate::types::{Expression, WindowBoundary, WindowFunctionKind};
use sqlparser::ast::{
    WindowFrame, WindowFrameBound, WindowFrameUnits, WindowSpec, WindowType,
};

/// Classifies a lowercased function name into a window-function kind.
///
/// Names outside the fixed table classify as [`WindowFunctionKind::Aggregate`];
/// that fallback is how arbitrary aggregates invoked with OVER become window
/// aggregates, so it is deliberately not an error.
pub fn window_function_kind(name: &str) -> WindowFunctionKind {
    match name {
        "rank" => WindowFunctionKind::Rank,
        "rank_dense" | "dense_rank" => WindowFunctionKind::DenseRank,
        "percent_rank" => WindowFunctionKind::PercentRank,
        "row_number" => WindowFunctionKind::RowNumber,
        "first_value" | "first" => WindowFunctionKind::FirstValue,
        "last_value" | "last" => WindowFunctionKind::LastValue,
        "cume_dist" => WindowFunctionKind::CumeDist,
        "lead" => WindowFunctionKind::Lead,
        "lag" => WindowFunctionKind::Lag,
        "ntile" => WindowFunctionKind::Ntile,
        _ => WindowFunctionKind::Aggregate,
    }
}

/// The two resolved views of a window specification.
///
/// `definition` drives partition/order; `frame` drives boundary decoding.
/// They differ when the OVER clause names a declared window that itself
/// references a further window: partition/order follow the whole reference
/// chain, the frame stops at the immediately named window.
pub(crate) struct ResolvedWindow {
    pub(crate) definition: WindowSpec,
    pub(crate) frame: WindowSpec,
}

/// A decoded frame: both boundaries concrete, offsets transformed.
#[derive(Debug)]
pub(crate) struct DecodedFrame {
    pub(crate) start: WindowBoundary,
    pub(crate) end: WindowBoundary,
    pub(crate) start_offset: Option<Expression>,
    pub(crate) end_offset: Option<Expression>,
}

#[derive(Clone, Copy)]
enum FrameMode {
    Range,
    Rows,
}

impl Transformer {
    /// Resolves an OVER clause against the statement's named-window table.
    ///
    /// A named reference (`OVER w`) replaces the working specification
    /// entirely; a reference name inside the working specification then
    /// redirects partition/order inheritance, but not the frame. Missing
    /// names fail with the window's name in the message.
    pub(crate) fn resolve_window_spec(
        &self,
        over: &WindowType,
    ) -> Result<ResolvedWindow, TransformError> {
        let frame = match over {
            WindowType::NamedWindow(name) => self.lookup_window(&name.value)?.clone(),
            WindowType::WindowSpec(spec) => spec.clone(),
        };
        let definition = match &frame.window_name {
            Some(reference) => self.lookup_window(&reference.value)?.clone(),
            None => frame.clone(),
        };
        Ok(ResolvedWindow { definition, frame })
    }

    /// Decodes a frame clause into a validated boundary pair.
    ///
    /// An absent frame clause decodes to the grammar's defaults
    /// (`RANGE BETWEEN UNBOUNDED PRECEDING AND CURRENT ROW`); an absent end
    /// bound decodes the end as current-row in the frame's mode.
    pub(crate) fn decode_window_frame(
        &mut self,
        frame: Option<&WindowFrame>,
    ) -> Result<DecodedFrame, TransformError> {
        let Some(frame) = frame else {
            return Ok(DecodedFrame {
                start: WindowBoundary::UnboundedPreceding,
                end: WindowBoundary::CurrentRowRange,
                start_offset: None,
                end_offset: None,
            });
        };

        let mode = match frame.units {
            WindowFrameUnits::Range => FrameMode::Range,
            WindowFrameUnits::Rows => FrameMode::Rows,
            WindowFrameUnits::Groups => {
                return Err(TransformError::Unsupported(
                    "GROUPS window frames".to_string(),
                ));
            }
        };

        // A frame cannot start after its logical end or end before its
        // logical start, regardless of the other bound.
        if matches!(frame.start_bound, WindowFrameBound::Following(None))
            || matches!(frame.end_bound, Some(WindowFrameBound::Preceding(None)))
        {
            return Err(TransformError::InvalidFrame);
        }

        let (start, start_offset) = self.decode_bound(&frame.start_bound, mode)?;
        let (end, end_offset) = match &frame.end_bound {
            Some(bound) => self.decode_bound(bound, mode)?,
            None => (current_row_boundary(mode), None),
        };

        validate_offset(start, start_offset.as_ref())?;
        validate_offset(end, end_offset.as_ref())?;

        Ok(DecodedFrame {
            start,
            end,
            start_offset,
            end_offset,
        })
    }

    fn decode_bound(
        &mut self,
        bound: &WindowFrameBound,
        mode: FrameMode,
    ) -> Result<(WindowBoundary, Option<Expression>), TransformError> {
        match bound {
            WindowFrameBound::Preceding(None) => Ok((WindowBoundary::UnboundedPreceding, None)),
            WindowFrameBound::Following(None) => Ok((WindowBoundary::UnboundedFollowing, None)),
            WindowFrameBound::Preceding(Some(offset)) => Ok((
                WindowBoundary::ExprPreceding,
                Some(self.transform_expression(offset)?),
            )),
            WindowFrameBound::Following(Some(offset)) => Ok((
                WindowBoundary::ExprFollowing,
                Some(self.transform_expression(offset)?),
            )),
            WindowFrameBound::CurrentRow => Ok((current_row_boundary(mode), None)),
        }
    }
}

fn current_row_boundary(mode: FrameMode) -> WindowBoundary {
    match mode {
        FrameMode::Range => WindowBoundary::CurrentRowRange,
        FrameMode::Rows => WindowBoundary::CurrentRowRows,
    }
}

/// An expression-relative boundary without its offset means the grammar
/// handed us a malformed frame; that is a bug upstream, not a user mistake.
fn validate_offset(
    boundary: WindowBoundary,
    offset: Option<&Expression>,
) -> Result<(), TransformError> {
    let needs_offset = matches!(
        boundary,
        WindowBoundary::ExprPreceding | WindowBoundary::ExprFollowing
    );
    if needs_offset && offset.is_none() {
        return Err(TransformError::Internal(
            "window frame boundary is missing its offset expression".to_string(),
        ));
    }
    Ok(())
}
