//! Line placement: where each fitted line's baseline starts inside its box.
//!
//! Plain lines are centred. Bullet lines share one left edge: the left edge
//! the longest bullet line (by word count) would have if it were centred, so
//! bullets form a column under the centred block.

use serde::{Deserialize, Serialize};

use crate::layout::fitter::FitResult;
use crate::layout::font_metrics::{MeasureError, TextMeasure};
use crate::layout::geometry::Rect;
use crate::layout::wrap::is_bullet_line;

/// Top offset for text whose line breaks were written by the author.
pub const EXPLICIT_BREAK_TOP_OFFSET: f32 = 7.0;

/// Gap kept above the box bottom when a top-aligned block is pulled up.
pub const BOTTOM_MARGIN: f32 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAlign {
    #[default]
    Center,
    Top,
}

#[derive(Debug, Clone)]
pub struct PlacementOptions<'a> {
    pub vertical_align: VerticalAlign,
    /// The source text contained explicit line breaks.
    pub explicit_breaks: bool,
    /// Caller nudge added to the starting baseline, in points.
    pub offset_y: f32,
    pub line_height_multiplier: f32,
    pub bullet_indicators: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePlacement {
    /// Text to draw. A leading `*` bullet is shown as `•`.
    pub text: String,
    pub x: f32,
    pub baseline_y: f32,
    pub is_bullet: bool,
}

/// Computes a placement for every non-blank line of `result`.
///
/// Blank lines take up a line of height but produce no entry.
pub fn place_lines<M: TextMeasure + ?Sized>(
    result: &FitResult,
    rect: &Rect,
    measure: &M,
    options: &PlacementOptions<'_>,
) -> Result<Vec<LinePlacement>, MeasureError> {
    let size = result.font_size;
    let line_height = size * options.line_height_multiplier;
    let block = result.lines.len() as f32 * line_height;

    let bullet_left = bullet_column(result, rect, measure, options.bullet_indicators)?;

    let mut y = start_baseline(rect, block, line_height, options);
    let mut placements = Vec::with_capacity(result.lines.len());
    for line in &result.lines {
        if line.trim().is_empty() {
            y += line_height;
            continue;
        }

        let is_bullet = is_bullet_line(line, options.bullet_indicators);
        let x = match bullet_left {
            Some(left) if is_bullet => left,
            _ => rect.center_x() - measure.text_length(line, size)? / 2.0,
        };

        placements.push(LinePlacement {
            text: display_text(line, is_bullet),
            x,
            baseline_y: y,
            is_bullet,
        });
        y += line_height;
    }

    Ok(placements)
}

fn start_baseline(
    rect: &Rect,
    block: f32,
    line_height: f32,
    options: &PlacementOptions<'_>,
) -> f32 {
    let start = if options.explicit_breaks {
        rect.y0 + EXPLICIT_BREAK_TOP_OFFSET + options.offset_y
    } else {
        match options.vertical_align {
            VerticalAlign::Center => {
                rect.y0 + (rect.height() - block) / 2.0 + line_height / 2.0 + options.offset_y
            }
            VerticalAlign::Top => rect.y0 + options.offset_y,
        }
    };

    if options.vertical_align == VerticalAlign::Top && start + block > rect.y1 {
        rect.y1 - block - BOTTOM_MARGIN
    } else {
        start
    }
}

/// Left edge shared by all bullet lines, or `None` when there are none.
fn bullet_column<M: TextMeasure + ?Sized>(
    result: &FitResult,
    rect: &Rect,
    measure: &M,
    indicators: &[String],
) -> Result<Option<f32>, MeasureError> {
    let mut longest: Option<(&str, usize)> = None;
    for line in result.lines.iter().filter(|l| is_bullet_line(l, indicators)) {
        let words = line.split_whitespace().count();
        if longest.map_or(true, |(_, best)| words > best) {
            longest = Some((line.as_str(), words));
        }
    }

    match longest {
        Some((line, _)) => {
            let width = measure.text_length(line, result.font_size)?;
            Ok(Some(rect.center_x() - width / 2.0))
        }
        None => Ok(None),
    }
}

fn display_text(line: &str, is_bullet: bool) -> String {
    if is_bullet {
        if let Some(rest) = line.trim_start().strip_prefix('*') {
            return format!("\u{2022}{rest}");
        }
    }
    line.to_string()
}
