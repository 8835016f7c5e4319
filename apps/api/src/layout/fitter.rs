//! Text Fitter: picks one font size and a line decomposition for a box.
//!
//! # Strategy
//! - No explicit breaks: descend from `max_font_size` by `step`, greedily
//!   wrapping at each size, until the block height fits the box.
//! - Explicit breaks: every non-empty line is searched (by `line_step`) for
//!   the largest size at which it fits unwrapped. The smallest of those sizes
//!   is used for the whole field, so all lines share one size and author
//!   breaks are kept. Lines that still do not fit are wrapped.
//! - Nothing fits: settle at `min_font_size` and report `overflowed`.
//!
//! The fitter is pure. Diagnostics go through an injected `FitObserver`.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::layout::font_metrics::{MeasureError, TextMeasure};
use crate::layout::geometry::Rect;
use crate::layout::policy::{FitPolicy, HeightFallback};
use crate::layout::wrap::{fits_within, has_explicit_breaks, split_explicit_lines, wrap_words};

// ────────────────────────────────────────────────────────────────────────────
// Result and error types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    /// Programmer error: the policy cannot be searched with.
    #[error("invalid fit policy: {0}")]
    InvalidPolicy(String),

    #[error("text measurement failed: {0}")]
    Measurement(#[from] MeasureError),
}

/// The chosen size and the lines to draw, top to bottom.
///
/// Empty strings in `lines` are blank lines carried over from the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub font_size: f32,
    pub lines: Vec<String>,
    /// True when the block is taller than the box at the reported size.
    pub overflowed: bool,
    /// `lines × font_size × line_height_multiplier`, before any truncation.
    pub block_height: f32,
    /// Lines dropped because the policy truncates overflow.
    #[serde(default)]
    pub truncated_lines: usize,
}

impl FitResult {
    fn empty(font_size: f32) -> Self {
        FitResult {
            font_size,
            lines: Vec::new(),
            overflowed: false,
            block_height: 0.0,
            truncated_lines: 0,
        }
    }

    /// Block height as a fraction of the box height; `None` for a box with no
    /// height.
    pub fn utilization(&self, rect: &Rect) -> Option<f32> {
        let height = rect.height();
        (height > 0.0).then(|| self.block_height / height)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Observer
// ────────────────────────────────────────────────────────────────────────────

/// Hooks into the search. Every method defaults to doing nothing.
pub trait FitObserver {
    /// Largest size at which explicit line `index` fits unwrapped.
    fn on_line_minimum(&self, _index: usize, _line: &str, _font_size: f32) {}

    /// A candidate size was laid out and checked against the box height.
    fn on_candidate(&self, _font_size: f32, _line_count: usize, _block_height: f32, _fits: bool) {
    }

    /// The size the widest explicit line allows overflowed vertically.
    fn on_fallback(&self, _font_size: f32, _utilization_pct: f32) {}

    fn on_result(&self, _result: &FitResult) {}
}

pub struct NoopObserver;

impl FitObserver for NoopObserver {}

/// Forwards search events to `tracing`, tagged with the field being fitted.
pub struct TracingObserver<'a> {
    field: &'a str,
}

impl<'a> TracingObserver<'a> {
    pub fn new(field: &'a str) -> Self {
        TracingObserver { field }
    }
}

impl FitObserver for TracingObserver<'_> {
    fn on_line_minimum(&self, index: usize, line: &str, font_size: f32) {
        debug!(
            field = self.field,
            line = index + 1,
            chars = line.chars().count(),
            font_size,
            "explicit line fits unwrapped"
        );
    }

    fn on_candidate(&self, font_size: f32, line_count: usize, block_height: f32, fits: bool) {
        debug!(
            field = self.field,
            font_size,
            line_count,
            block_height,
            fits,
            "fit candidate"
        );
    }

    fn on_fallback(&self, font_size: f32, utilization_pct: f32) {
        debug!(
            field = self.field,
            font_size,
            utilization_pct,
            "height overflow at line-driven size, falling back"
        );
    }

    fn on_result(&self, result: &FitResult) {
        if result.overflowed {
            warn!(
                field = self.field,
                font_size = result.font_size,
                lines = result.lines.len(),
                block_height = result.block_height,
                truncated = result.truncated_lines,
                "text overflows its box at minimum size"
            );
        } else {
            debug!(
                field = self.field,
                font_size = result.font_size,
                lines = result.lines.len(),
                "text fitted"
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fitter
// ────────────────────────────────────────────────────────────────────────────

/// Fits `text` into `rect` with no observer attached.
pub fn fit<M: TextMeasure + ?Sized>(
    text: &str,
    rect: Rect,
    measure: &M,
    policy: &FitPolicy,
) -> Result<FitResult, FitError> {
    Fitter::new(measure).fit(text, rect, policy)
}

pub struct Fitter<'a, M: TextMeasure + ?Sized> {
    measure: &'a M,
    observer: &'a dyn FitObserver,
}

impl<'a, M: TextMeasure + ?Sized> Fitter<'a, M> {
    pub fn new(measure: &'a M) -> Self {
        Fitter {
            measure,
            observer: &NoopObserver,
        }
    }

    pub fn with_observer(mut self, observer: &'a dyn FitObserver) -> Self {
        self.observer = observer;
        self
    }

    /// Computes the font size and wrapped lines for `text` in `rect`.
    ///
    /// Content never causes an error: overflow is reported through
    /// `FitResult::overflowed`. Errors are an invalid policy or a failing
    /// measurement provider.
    pub fn fit(&self, text: &str, rect: Rect, policy: &FitPolicy) -> Result<FitResult, FitError> {
        policy.validate()?;

        let result = if text.trim().is_empty() {
            FitResult::empty(policy.max_font_size)
        } else if rect.is_degenerate() {
            self.fit_degenerate(text, rect, policy)?
        } else if has_explicit_breaks(text) {
            self.fit_explicit_lines(text, rect, policy)?
        } else {
            self.fit_paragraph(text, rect, policy)?
        };

        self.observer.on_result(&result);
        Ok(result)
    }

    /// Case A: a single paragraph, linear descent over sizes.
    fn fit_paragraph(
        &self,
        text: &str,
        rect: Rect,
        policy: &FitPolicy,
    ) -> Result<FitResult, FitError> {
        let mut last = None;

        for size in descending_sizes(policy.max_font_size, policy.min_font_size, policy.step) {
            let lines = self.wrap(text, size, rect, policy)?;
            if self.check(&lines, size, rect, policy) {
                return Ok(settle(size, lines, rect, policy));
            }
            last = Some((size, lines));
        }

        let (size, lines) = match last {
            Some(layout) => layout,
            None => (
                policy.min_font_size,
                self.wrap(text, policy.min_font_size, rect, policy)?,
            ),
        };
        Ok(settle(size, lines, rect, policy))
    }

    /// Case B: explicit line breaks, one size driven by the widest line.
    fn fit_explicit_lines(
        &self,
        text: &str,
        rect: Rect,
        policy: &FitPolicy,
    ) -> Result<FitResult, FitError> {
        let raw_lines = split_explicit_lines(text);

        let mut optimal = policy.max_font_size;
        for (index, line) in raw_lines.iter().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let size = self.largest_unwrapped_size(line, rect, policy)?;
            self.observer.on_line_minimum(index, line, size);
            optimal = optimal.min(size);
        }

        let lines = self.derive_lines(&raw_lines, optimal, rect, policy)?;
        if self.check(&lines, optimal, rect, policy) {
            return Ok(settle(optimal, lines, rect, policy));
        }

        let utilization_pct = block_height(lines.len(), optimal, policy) / rect.height() * 100.0;
        self.observer.on_fallback(optimal, utilization_pct);

        match policy.height_fallback {
            HeightFallback::Minimum => self.settle_explicit_at_minimum(&raw_lines, rect, policy),
            HeightFallback::BinarySearch {
                readability_floor,
                relaxed_floor,
                relaxed_utilization_pct,
            } => {
                let floor = if utilization_pct > relaxed_utilization_pct {
                    relaxed_floor
                } else {
                    readability_floor
                };
                self.search_height(&raw_lines, floor, optimal, rect, policy)
            }
        }
    }

    /// Largest size, stepping down from the top of the range, at which `line`
    /// fits the box width unwrapped. Clamped to `min_font_size`.
    fn largest_unwrapped_size(
        &self,
        line: &str,
        rect: Rect,
        policy: &FitPolicy,
    ) -> Result<f32, FitError> {
        for size in descending_sizes(policy.max_font_size, policy.min_font_size, policy.line_step)
        {
            if fits_within(self.measure.text_length(line, size)?, rect.width()) {
                return Ok(size);
            }
        }
        Ok(policy.min_font_size)
    }

    /// Keeps each explicit line verbatim when it fits at `size`, wraps it
    /// otherwise. Blank lines stay blank.
    fn derive_lines(
        &self,
        raw_lines: &[&str],
        size: f32,
        rect: Rect,
        policy: &FitPolicy,
    ) -> Result<Vec<String>, FitError> {
        let mut lines = Vec::with_capacity(raw_lines.len());
        for line in raw_lines {
            if line.trim().is_empty() {
                lines.push(String::new());
            } else if fits_within(self.measure.text_length(line, size)?, rect.width()) {
                lines.push(line.to_string());
            } else {
                lines.extend(self.wrap(line, size, rect, policy)?);
            }
        }
        Ok(lines)
    }

    fn settle_explicit_at_minimum(
        &self,
        raw_lines: &[&str],
        rect: Rect,
        policy: &FitPolicy,
    ) -> Result<FitResult, FitError> {
        let size = policy.min_font_size;
        let lines = self.derive_lines(raw_lines, size, rect, policy)?;
        self.check(&lines, size, rect, policy);
        Ok(settle(size, lines, rect, policy))
    }

    /// Largest size in `[floor, optimal]` whose layout fits the box height,
    /// found by bisection down to `line_step` resolution. Drops to the
    /// minimum size when even the floor overflows.
    fn search_height(
        &self,
        raw_lines: &[&str],
        floor: f32,
        optimal: f32,
        rect: Rect,
        policy: &FitPolicy,
    ) -> Result<FitResult, FitError> {
        let floor = floor.clamp(policy.min_font_size, optimal);
        let floor_lines = self.derive_lines(raw_lines, floor, rect, policy)?;
        if !self.check(&floor_lines, floor, rect, policy) {
            return self.settle_explicit_at_minimum(raw_lines, rect, policy);
        }

        let (mut low, mut high) = (floor, optimal);
        let mut best = (floor, floor_lines);
        while high - low > policy.line_step {
            let mid = (low + high) / 2.0;
            let lines = self.derive_lines(raw_lines, mid, rect, policy)?;
            if self.check(&lines, mid, rect, policy) {
                low = mid;
                best = (mid, lines);
            } else {
                high = mid;
            }
        }

        let (size, lines) = best;
        Ok(settle(size, lines, rect, policy))
    }

    /// Best-effort layout for a box with no usable area.
    fn fit_degenerate(
        &self,
        text: &str,
        rect: Rect,
        policy: &FitPolicy,
    ) -> Result<FitResult, FitError> {
        let size = policy.min_font_size;
        let lines = if has_explicit_breaks(text) {
            self.derive_lines(&split_explicit_lines(text), size, rect, policy)?
        } else {
            self.wrap(text, size, rect, policy)?
        };
        Ok(FitResult {
            font_size: size,
            block_height: block_height(lines.len(), size, policy),
            lines,
            overflowed: true,
            truncated_lines: 0,
        })
    }

    fn wrap(
        &self,
        text: &str,
        size: f32,
        rect: Rect,
        policy: &FitPolicy,
    ) -> Result<Vec<String>, MeasureError> {
        wrap_words(
            text,
            size,
            rect.width(),
            self.measure,
            &policy.bullet_indicators,
        )
    }

    /// Reports the candidate to the observer and returns whether it fits.
    fn check(&self, lines: &[String], size: f32, rect: Rect, policy: &FitPolicy) -> bool {
        let height = block_height(lines.len(), size, policy);
        let fits = fits_within(height, rect.height());
        self.observer.on_candidate(size, lines.len(), height, fits);
        fits
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Internal helpers
// ────────────────────────────────────────────────────────────────────────────

pub(crate) fn block_height(line_count: usize, size: f32, policy: &FitPolicy) -> f32 {
    line_count as f32 * size * policy.line_height_multiplier
}

/// Builds the final result for a layout at `size`, truncating overflow when
/// the policy asks for it.
pub(crate) fn settle(size: f32, lines: Vec<String>, rect: Rect, policy: &FitPolicy) -> FitResult {
    let height = block_height(lines.len(), size, policy);
    let result = FitResult {
        font_size: size,
        overflowed: !fits_within(height, rect.height()),
        lines,
        block_height: height,
        truncated_lines: 0,
    };
    truncate_overflow(result, rect, policy)
}

/// Cuts an overflowing result to `floor(box height / min_font_size)` lines
/// when the policy truncates. `block_height` keeps the untruncated height and
/// lines already dropped stay counted.
pub fn truncate_overflow(mut result: FitResult, rect: Rect, policy: &FitPolicy) -> FitResult {
    if !result.overflowed || !policy.truncate_overflow || rect.is_degenerate() {
        return result;
    }

    let max_lines = (rect.height() / policy.min_font_size).floor() as usize;
    if result.lines.len() > max_lines {
        result.truncated_lines += result.lines.len() - max_lines;
        result.lines.truncate(max_lines);
    }
    result
}

/// `max, max - step, ...` down to and always ending on `min`.
fn descending_sizes(max: f32, min: f32, step: f32) -> impl Iterator<Item = f32> {
    // The epsilon keeps an exact multiple of `step` from yielding `min` twice.
    let steps = ((max - min) / step - 1e-4).ceil().max(0.0) as usize;
    (0..=steps).map(move |i| (max - i as f32 * step).max(min))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::layout::font_metrics::{get_metrics, FontFamily};

    /// Every character is `advance` em wide, so widths are easy to compute by
    /// hand: width = chars × advance × size.
    struct Mono(f32);

    impl TextMeasure for Mono {
        fn text_length(&self, text: &str, size: f32) -> Result<f32, MeasureError> {
            Ok(text.chars().count() as f32 * self.0 * size)
        }
    }

    struct Broken;

    impl TextMeasure for Broken {
        fn text_length(&self, _text: &str, _size: f32) -> Result<f32, MeasureError> {
            Err(MeasureError::UnknownFont("missing".to_string()))
        }
    }

    #[derive(Default)]
    struct Recorder {
        line_minimums: RefCell<Vec<(usize, f32)>>,
        candidates: RefCell<Vec<f32>>,
        fallbacks: RefCell<Vec<f32>>,
        results: RefCell<usize>,
    }

    impl FitObserver for Recorder {
        fn on_line_minimum(&self, index: usize, _line: &str, font_size: f32) {
            self.line_minimums.borrow_mut().push((index, font_size));
        }
        fn on_candidate(&self, font_size: f32, _: usize, _: f32, _: bool) {
            self.candidates.borrow_mut().push(font_size);
        }
        fn on_fallback(&self, font_size: f32, _: f32) {
            self.fallbacks.borrow_mut().push(font_size);
        }
        fn on_result(&self, _result: &FitResult) {
            *self.results.borrow_mut() += 1;
        }
    }

    const LONG_SENTENCE: &str = "This is a very long sentence that cannot possibly fit on one \
        line at any reasonable size and must wrap across several lines to remain legible";

    // ── search range ────────────────────────────────────────────────────────

    #[test]
    fn test_descending_sizes_ends_on_min() {
        let sizes: Vec<f32> = descending_sizes(20.0, 16.0, 1.0).collect();
        assert_eq!(sizes, vec![20.0, 19.0, 18.0, 17.0, 16.0]);

        let sizes: Vec<f32> = descending_sizes(20.0, 17.5, 1.0).collect();
        assert_eq!(sizes, vec![20.0, 19.0, 18.0, 17.5]);

        let sizes: Vec<f32> = descending_sizes(12.0, 12.0, 0.5).collect();
        assert_eq!(sizes, vec![12.0]);
    }

    // ── degenerate input ────────────────────────────────────────────────────

    #[test]
    fn test_empty_text_returns_max_size_and_no_lines() {
        let policy = FitPolicy::new(4.0, 20.0);
        for text in ["", "   ", "\n\n"] {
            let result = fit(text, Rect::from_size(100.0, 50.0), &Mono(0.5), &policy).unwrap();
            assert_eq!(result.font_size, 20.0);
            assert!(result.lines.is_empty());
            assert!(!result.overflowed);
        }
    }

    #[test]
    fn test_invalid_policy_fails_fast() {
        let policy = FitPolicy::new(10.0, 5.0);
        let err = fit("text", Rect::from_size(100.0, 50.0), &Mono(0.5), &policy).unwrap_err();
        assert!(matches!(err, FitError::InvalidPolicy(_)));
    }

    #[test]
    fn test_measurement_failure_propagates() {
        let policy = FitPolicy::new(4.0, 20.0);
        let err = fit("two words", Rect::from_size(100.0, 50.0), &Broken, &policy).unwrap_err();
        assert!(matches!(err, FitError::Measurement(_)));

        let err = fit("a\nb", Rect::from_size(100.0, 50.0), &Broken, &policy).unwrap_err();
        assert!(matches!(err, FitError::Measurement(_)));
    }

    #[test]
    fn test_zero_width_box_overflows_at_min() {
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit("one two three", Rect::from_size(0.0, 50.0), &Mono(0.5), &policy).unwrap();
        assert_eq!(result.font_size, 4.0);
        assert!(result.overflowed);
        assert_eq!(result.lines, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_negative_height_box_overflows_at_min() {
        let policy = FitPolicy::new(4.0, 20.0).with_truncation(true);
        let rect = Rect::new(0.0, 100.0, 200.0, 90.0);
        let result = fit("A\n\nB", rect, &Mono(0.5), &policy).unwrap();
        assert_eq!(result.font_size, 4.0);
        assert!(result.overflowed);
        assert_eq!(result.lines, vec!["A", "", "B"], "nothing is dropped");
    }

    #[test]
    fn test_oversized_single_word_terminates() {
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit(
            "Supercalifragilistic",
            Rect::from_size(10.0, 100.0),
            &Mono(0.5),
            &policy,
        )
        .unwrap();
        assert_eq!(result.lines, vec!["Supercalifragilistic"]);
        assert!(!result.overflowed, "one line fits the height");
    }

    // ── case A: single paragraph ────────────────────────────────────────────

    #[test]
    fn test_short_text_keeps_max_size() {
        let policy = FitPolicy::new(4.0, 20.0);
        let metrics = get_metrics(&FontFamily::Helvetica);
        let result = fit("Hello World", Rect::from_size(200.0, 50.0), metrics, &policy).unwrap();
        assert_eq!(result.font_size, 20.0);
        assert_eq!(result.lines, vec!["Hello World"]);
        assert!(!result.overflowed);
        assert!((result.block_height - 24.0).abs() < 1e-3);
    }

    #[test]
    fn test_long_sentence_shrinks_until_height_fits() {
        let policy = FitPolicy::new(8.0, 20.0);
        let rect = Rect::from_size(100.0, 60.0);
        let metrics = get_metrics(&FontFamily::TimesRoman);
        let result = fit(LONG_SENTENCE, rect, metrics, &policy).unwrap();

        assert!(result.font_size < 20.0);
        assert!(!result.overflowed);
        let height = result.lines.len() as f32 * result.font_size * 1.2;
        assert!(height <= rect.height() + 1e-3, "height {height} exceeds box");

        // One step larger must not have fitted.
        let larger = wrap_words(
            LONG_SENTENCE,
            result.font_size + 1.0,
            rect.width(),
            metrics,
            &policy.bullet_indicators,
        )
        .unwrap();
        assert!(larger.len() as f32 * (result.font_size + 1.0) * 1.2 > rect.height());
    }

    #[test]
    fn test_line_count_grows_as_box_narrows() {
        let policy = FitPolicy::new(8.0, 8.0);
        let metrics = get_metrics(&FontFamily::TimesRoman);
        let wide = fit(LONG_SENTENCE, Rect::from_size(300.0, 500.0), metrics, &policy).unwrap();
        let narrow = fit(LONG_SENTENCE, Rect::from_size(100.0, 500.0), metrics, &policy).unwrap();
        assert!(narrow.lines.len() > wide.lines.len());
    }

    #[test]
    fn test_width_invariant_holds_for_every_line() {
        let policy = FitPolicy::new(4.0, 20.0);
        let rect = Rect::from_size(120.0, 80.0);
        let metrics = get_metrics(&FontFamily::TimesBold);
        let result = fit(LONG_SENTENCE, rect, metrics, &policy).unwrap();
        for line in &result.lines {
            let width = metrics.text_length(line, result.font_size).unwrap();
            let single_word = line.split_whitespace().count() == 1;
            assert!(
                width <= rect.width() + 1e-3 || single_word,
                "line {line:?} is {width}pt wide"
            );
        }
    }

    #[test]
    fn test_narrower_box_never_increases_size() {
        let policy = FitPolicy::new(4.0, 20.0);
        let metrics = get_metrics(&FontFamily::Helvetica);
        let mut previous = f32::INFINITY;
        for width in [400.0, 300.0, 220.0, 160.0, 120.0, 90.0, 60.0] {
            let result = fit(LONG_SENTENCE, Rect::from_size(width, 60.0), metrics, &policy).unwrap();
            assert!(
                result.font_size <= previous,
                "width {width} gave {} after {previous}",
                result.font_size
            );
            previous = result.font_size;
        }
    }

    #[test]
    fn test_fit_is_idempotent() {
        let policy = FitPolicy::new(4.0, 20.0);
        let rect = Rect::from_size(150.0, 40.0);
        let metrics = get_metrics(&FontFamily::TimesBold);
        let first = fit(LONG_SENTENCE, rect, metrics, &policy).unwrap();
        let second = fit(LONG_SENTENCE, rect, metrics, &policy).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_bullets_start_new_lines_in_paragraph() {
        let policy = FitPolicy::new(4.0, 10.0);
        let result = fit(
            "* First bullet point here * Second bullet point here",
            Rect::from_size(1000.0, 100.0),
            &Mono(0.5),
            &policy,
        )
        .unwrap();
        assert_eq!(
            result.lines,
            vec!["* First bullet point here", "* Second bullet point here"]
        );
    }

    #[test]
    fn test_overflow_at_min_without_truncation_bleeds() {
        // 5-char words at 4pt are 10pt wide; the 12pt box holds one per line.
        let text = "alpha bravo delta gamma kilos lemon mango nylon omega pearl";
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit(text, Rect::from_size(12.0, 5.0), &Mono(0.5), &policy).unwrap();
        assert_eq!(result.font_size, 4.0);
        assert!(result.overflowed);
        assert_eq!(result.lines.len(), 10);
        assert_eq!(result.truncated_lines, 0);
    }

    #[test]
    fn test_overflow_at_min_with_truncation_cuts_lines() {
        let text = "alpha bravo delta gamma kilos lemon mango nylon omega pearl";
        let policy = FitPolicy::new(4.0, 20.0).with_truncation(true);
        let result = fit(text, Rect::from_size(12.0, 5.0), &Mono(0.5), &policy).unwrap();
        assert!(result.overflowed);
        assert_eq!(result.lines, vec!["alpha"]);
        assert_eq!(result.truncated_lines, 9);
        assert!((result.block_height - 48.0).abs() < 1e-3);
    }

    #[test]
    fn test_fits_exactly_at_min_is_not_overflow() {
        // 2 lines × 4pt × 1.2 = 9.6pt.
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit("alpha bravo", Rect::from_size(12.0, 9.6), &Mono(0.5), &policy).unwrap();
        assert_eq!(result.font_size, 4.0);
        assert!(!result.overflowed);
    }

    // ── case B: explicit line breaks ────────────────────────────────────────

    #[test]
    fn test_longest_line_dictates_size_for_whole_field() {
        let text = "ISO 9001:2015 Certification Body With An Extremely Long Legal Name\nShort line";
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit(text, Rect::from_size(200.0, 100.0), &Mono(0.5), &policy).unwrap();

        // 66 chars × 0.5em: 6pt → 198pt is the largest half-point step that fits.
        assert_eq!(result.font_size, 6.0);
        assert_eq!(
            result.lines,
            vec![
                "ISO 9001:2015 Certification Body With An Extremely Long Legal Name",
                "Short line"
            ]
        );
        assert!(!result.overflowed);
    }

    #[test]
    fn test_blank_lines_are_preserved() {
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit("A\n\nB", Rect::from_size(100.0, 100.0), &Mono(0.5), &policy).unwrap();
        assert_eq!(result.lines, vec!["A", "", "B"]);
        assert_eq!(result.font_size, 20.0);
    }

    #[test]
    fn test_crlf_breaks_are_honoured() {
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit("A\r\nB", Rect::from_size(100.0, 100.0), &Mono(0.5), &policy).unwrap();
        assert_eq!(result.lines, vec!["A", "B"]);
    }

    #[test]
    fn test_bullet_lines_stay_separate() {
        let text = "* First bullet point here\n* Second bullet point here";
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit(text, Rect::from_size(150.0, 100.0), &Mono(0.5), &policy).unwrap();
        assert_eq!(
            result.lines,
            vec!["* First bullet point here", "* Second bullet point here"]
        );
    }

    #[test]
    fn test_line_too_long_at_min_is_wrapped() {
        // 56 chars are 224pt wide even at the 8pt minimum.
        let long_line = "alpha beta gamma delta epsilon zeta eta theta iota kappa";
        let text = format!("{long_line}\nend");
        let policy = FitPolicy::new(8.0, 20.0);
        let result = fit(&text, Rect::from_size(100.0, 200.0), &Mono(0.5), &policy).unwrap();

        assert_eq!(result.font_size, 8.0);
        assert!(result.lines.len() > 2);
        assert_eq!(result.lines.last().map(String::as_str), Some("end"));
        for line in &result.lines {
            assert!(line.chars().count() as f32 * 0.5 * 8.0 <= 100.0 + 1e-3);
        }
    }

    #[test]
    fn test_height_overflow_falls_back_to_min() {
        // At 20pt: 4 lines × 24pt = 96pt > 20pt. At 4pt: 19.2pt fits.
        let policy = FitPolicy::new(4.0, 20.0);
        let result = fit("A\nB\nC\nD", Rect::from_size(100.0, 20.0), &Mono(0.5), &policy).unwrap();
        assert_eq!(result.font_size, 4.0);
        assert_eq!(result.lines, vec!["A", "B", "C", "D"]);
        assert!(!result.overflowed);
    }

    #[test]
    fn test_height_overflow_binary_search_finds_largest_fit() {
        // Four lines fit while 4.8 × size ≤ 60, i.e. size ≤ 12.5.
        let policy = FitPolicy::new(4.0, 20.0).with_height_fallback(HeightFallback::binary_search());
        let result = fit("A\nB\nC\nD", Rect::from_size(100.0, 60.0), &Mono(0.5), &policy).unwrap();
        assert!(
            result.font_size > 12.0 && result.font_size <= 12.5,
            "got {}",
            result.font_size
        );
        assert!(!result.overflowed);
    }

    #[test]
    fn test_binary_search_drops_to_min_when_floor_overflows() {
        // Relaxed floor 7pt still needs 33.6pt; only the 4pt minimum fits 20pt.
        let policy = FitPolicy::new(4.0, 20.0).with_height_fallback(HeightFallback::binary_search());
        let result = fit("A\nB\nC\nD", Rect::from_size(100.0, 20.0), &Mono(0.5), &policy).unwrap();
        assert_eq!(result.font_size, 4.0);
        assert!(!result.overflowed);
    }

    #[test]
    fn test_binary_search_keeps_readability_floor_below_relaxed_threshold() {
        // 4 lines at 12pt need 57.6pt in a 50pt box: 115% utilisation, so
        // the 10pt floor applies. Sizes up to 50 / 4.8 = 10.42pt fit.
        let recorder = Recorder::default();
        let policy = FitPolicy::new(4.0, 12.0).with_height_fallback(HeightFallback::binary_search());
        let metrics = Mono(0.5);
        let result = Fitter::new(&metrics)
            .with_observer(&recorder)
            .fit("A\nB\nC\nD", Rect::from_size(100.0, 50.0), &policy)
            .unwrap();

        assert!(result.font_size >= 10.0, "got {}", result.font_size);
        assert!(!result.overflowed);
        let candidates = recorder.candidates.borrow();
        assert_eq!(candidates[0], 12.0);
        assert_eq!(candidates[1], 10.0, "floor is checked first");
    }

    #[test]
    fn test_binary_search_readability_floor_overflow_drops_to_min() {
        // 128% utilisation keeps the 10pt floor, which needs 48pt > 45pt.
        // The relaxed 7pt floor would have fitted, but does not apply.
        let policy = FitPolicy::new(4.0, 12.0).with_height_fallback(HeightFallback::binary_search());
        let result = fit("A\nB\nC\nD", Rect::from_size(100.0, 45.0), &Mono(0.5), &policy).unwrap();
        assert_eq!(result.font_size, 4.0);
        assert!(!result.overflowed);
    }

    #[test]
    fn test_binary_search_floor_clamps_to_optimal() {
        // The 10-char line caps the size at 40 / 5 = 8pt, under the 10pt floor.
        // The floor is clamped to 8pt, still overflows (38.4pt > 30pt) and
        // the field settles at the minimum.
        let recorder = Recorder::default();
        let policy = FitPolicy::new(4.0, 20.0).with_height_fallback(HeightFallback::binary_search());
        let metrics = Mono(0.5);
        let result = Fitter::new(&metrics)
            .with_observer(&recorder)
            .fit("ABCDEFGHIJ\nB\nC\nD", Rect::from_size(40.0, 30.0), &policy)
            .unwrap();

        assert_eq!(result.font_size, 4.0);
        assert_eq!(result.lines, vec!["ABCDEFGHIJ", "B", "C", "D"]);
        assert!(!result.overflowed);
        assert_eq!(*recorder.candidates.borrow(), vec![8.0, 8.0, 4.0]);
    }

    #[test]
    fn test_explicit_lines_overflow_at_min_with_truncation() {
        let policy = FitPolicy::new(4.0, 20.0).with_truncation(true);
        let result = fit(
            "A\nB\nC\nD\nE",
            Rect::from_size(100.0, 10.0),
            &Mono(0.5),
            &policy,
        )
        .unwrap();
        assert!(result.overflowed);
        assert_eq!(result.font_size, 4.0);
        // floor(10 / 4) = 2
        assert_eq!(result.lines, vec!["A", "B"]);
        assert_eq!(result.truncated_lines, 3);
    }

    // ── observer ────────────────────────────────────────────────────────────

    #[test]
    fn test_observer_sees_line_minimums_and_result() {
        let recorder = Recorder::default();
        let policy = FitPolicy::new(4.0, 20.0);
        let metrics = Mono(0.5);
        let result = Fitter::new(&metrics)
            .with_observer(&recorder)
            .fit("Header\n\nBody text", Rect::from_size(100.0, 100.0), &policy)
            .unwrap();

        assert_eq!(result.lines, vec!["Header", "", "Body text"]);
        let minimums = recorder.line_minimums.borrow();
        assert_eq!(minimums.len(), 2, "blank line has no constraint");
        assert_eq!(minimums[0].0, 0);
        assert_eq!(minimums[1].0, 2);
        assert_eq!(*recorder.results.borrow(), 1);
        assert!(recorder.fallbacks.borrow().is_empty());
    }

    #[test]
    fn test_observer_sees_fallback() {
        let recorder = Recorder::default();
        let policy = FitPolicy::new(4.0, 20.0);
        let metrics = Mono(0.5);
        Fitter::new(&metrics)
            .with_observer(&recorder)
            .fit("A\nB\nC\nD", Rect::from_size(100.0, 20.0), &policy)
            .unwrap();
        assert_eq!(*recorder.fallbacks.borrow(), vec![20.0]);
        assert_eq!(recorder.candidates.borrow().last().copied(), Some(4.0));
    }

    #[test]
    fn test_observer_sees_result_for_blank_text() {
        let recorder = Recorder::default();
        let policy = FitPolicy::new(4.0, 20.0);
        let metrics = Mono(0.5);
        let result = Fitter::new(&metrics)
            .with_observer(&recorder)
            .fit("  \n ", Rect::from_size(100.0, 100.0), &policy)
            .unwrap();
        assert!(result.lines.is_empty());
        assert_eq!(*recorder.results.borrow(), 1);
    }
}
