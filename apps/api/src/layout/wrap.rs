//! Greedy, bullet-aware word wrap.
//!
//! Words are never split: a word wider than the box sits alone on its line.
//! A word starting with a bullet indicator always opens a new line.

use std::mem;

use crate::layout::font_metrics::{MeasureError, TextMeasure};

/// Slack, in points, when comparing a measured extent against a box extent.
pub const TOLERANCE: f32 = 1e-3;

pub fn fits_within(extent: f32, limit: f32) -> bool {
    extent <= limit + TOLERANCE
}

/// True if `token` starts a bullet point.
///
/// `**bold**` markers are not bullets even though `*` is an indicator.
pub fn is_bullet_token(token: &str, indicators: &[String]) -> bool {
    indicators
        .iter()
        .filter(|indicator| !indicator.is_empty())
        .any(|indicator| {
            token.starts_with(indicator.as_str()) && !is_emphasis_marker(token, indicator)
        })
}

fn is_emphasis_marker(token: &str, indicator: &str) -> bool {
    indicator == "*" && token.starts_with("**")
}

/// True if the first whitespace-delimited token of `line` is a bullet.
pub fn is_bullet_line(line: &str, indicators: &[String]) -> bool {
    line.split_whitespace()
        .next()
        .is_some_and(|first| is_bullet_token(first, indicators))
}

pub fn has_explicit_breaks(text: &str) -> bool {
    text.contains('\n')
}

/// Splits on `\n` (and `\r\n`), keeping empty entries.
pub fn split_explicit_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Wraps `text` into lines no wider than `max_width` at `size`.
///
/// Candidate lines are measured whole, joined with single spaces.
pub fn wrap_words<M: TextMeasure + ?Sized>(
    text: &str,
    size: f32,
    max_width: f32,
    measure: &M,
    bullet_indicators: &[String],
) -> Result<Vec<String>, MeasureError> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }

        if is_bullet_token(word, bullet_indicators) {
            lines.push(mem::take(&mut current));
            current.push_str(word);
            continue;
        }

        let candidate = format!("{current} {word}");
        if fits_within(measure.text_length(&candidate, size)?, max_width) {
            current = candidate;
        } else {
            lines.push(mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    Ok(lines)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
