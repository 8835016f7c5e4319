//! Caller overrides applied around the fitter: a forced size that skips the
//! search, and a signed adjustment added after it.

use crate::layout::fitter::{block_height, settle, FitError, FitResult};
use crate::layout::font_metrics::TextMeasure;
use crate::layout::geometry::Rect;
use crate::layout::policy::FitPolicy;
use crate::layout::wrap::{fits_within, has_explicit_breaks, split_explicit_lines, wrap_words};

/// Adjusted sizes never go below this.
pub const MIN_ADJUSTED_FONT_SIZE: f32 = 1.0;

/// Lays `text` out at exactly `font_size` with no wrapping: explicit lines are
/// kept as they are, a paragraph stays on one line.
pub fn fixed_size_layout(
    text: &str,
    rect: Rect,
    font_size: f32,
    policy: &FitPolicy,
) -> Result<FitResult, FitError> {
    policy.validate()?;
    if !font_size.is_finite() || font_size <= 0.0 {
        return Err(FitError::InvalidPolicy(format!(
            "forced font size must be a positive number, got {font_size}"
        )));
    }

    let lines: Vec<String> = if text.trim().is_empty() {
        Vec::new()
    } else if has_explicit_breaks(text) {
        split_explicit_lines(text)
            .into_iter()
            .map(|line| {
                if line.trim().is_empty() {
                    String::new()
                } else {
                    line.to_string()
                }
            })
            .collect()
    } else {
        vec![text.to_string()]
    };

    Ok(settle(font_size, lines, rect, policy))
}

/// Adds `delta` points to a fitted size.
///
/// Growing the size re-wraps every line that no longer fits the box width.
/// Shrinking keeps the lines. Overflow is re-evaluated at the new size.
///
/// Lines already truncated from `result` stay dropped: the adjusted result
/// still counts them and stays overflowed.
pub fn apply_size_adjustment<M: TextMeasure + ?Sized>(
    result: FitResult,
    delta: f32,
    rect: Rect,
    measure: &M,
    policy: &FitPolicy,
) -> Result<FitResult, FitError> {
    if !delta.is_finite() {
        return Err(FitError::InvalidPolicy(format!(
            "font size adjustment must be finite, got {delta}"
        )));
    }
    if delta == 0.0 {
        return Ok(result);
    }

    let size = (result.font_size + delta).max(MIN_ADJUSTED_FONT_SIZE);
    let dropped = result.truncated_lines;
    if delta < 0.0 {
        let adjusted = settle(size, result.lines, rect, policy);
        return Ok(carry_truncation(adjusted, dropped, policy));
    }

    let mut lines = Vec::with_capacity(result.lines.len());
    for line in result.lines {
        if line.trim().is_empty()
            || fits_within(measure.text_length(&line, size)?, rect.width())
        {
            lines.push(line);
        } else {
            lines.extend(wrap_words(
                &line,
                size,
                rect.width(),
                measure,
                &policy.bullet_indicators,
            )?);
        }
    }

    Ok(carry_truncation(settle(size, lines, rect, policy), dropped, policy))
}

fn carry_truncation(mut result: FitResult, dropped: usize, policy: &FitPolicy) -> FitResult {
    if dropped == 0 {
        return result;
    }
    result.truncated_lines += dropped;
    result.block_height = block_height(
        result.lines.len() + result.truncated_lines,
        result.font_size,
        policy,
    );
    result.overflowed = true;
    result
}
