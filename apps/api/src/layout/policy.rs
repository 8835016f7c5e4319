//! Fit policy: the caller-tunable knobs of the text fitter.
//!
//! A policy is plain data. Call sites that lay out different template variants
//! build different policies (mostly a different line-height multiplier) and
//! share one fitter.

use serde::{Deserialize, Serialize};

use crate::layout::fitter::FitError;
use crate::layout::placement::VerticalAlign;

/// Prefixes that mark a word as the start of a bullet point.
pub const DEFAULT_BULLET_INDICATORS: [&str; 6] = ["•", ">", "→", "▪", "▫", "*"];

/// Smallest accepted search step, in points.
pub const MIN_STEP: f32 = 0.01;

/// Largest accepted `max_font_size`, in points.
pub const MAX_FONT_SIZE: f32 = 1000.0;

/// Most candidate sizes a linear search may visit.
pub const MAX_SEARCH_STEPS: usize = 4096;

const DEFAULT_STEP: f32 = 1.0;
const DEFAULT_LINE_STEP: f32 = 0.5;
const DEFAULT_LINE_HEIGHT_MULTIPLIER: f32 = 1.2;

// ────────────────────────────────────────────────────────────────────────────
// Height fallback
// ────────────────────────────────────────────────────────────────────────────

/// What to do when text with explicit line breaks overflows vertically at the
/// size its widest line dictates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeightFallback {
    /// Drop straight to `min_font_size`.
    #[default]
    Minimum,
    /// Search downwards from the optimal size for the largest size that fits,
    /// never going below a readability floor. The floor relaxes when the text
    /// is far too tall for the box.
    BinarySearch {
        readability_floor: f32,
        relaxed_floor: f32,
        /// Utilisation (block height / box height, in percent) above which
        /// `relaxed_floor` replaces `readability_floor`.
        relaxed_utilization_pct: f32,
    },
}

impl HeightFallback {
    pub fn binary_search() -> Self {
        HeightFallback::BinarySearch {
            readability_floor: 10.0,
            relaxed_floor: 7.0,
            relaxed_utilization_pct: 134.8,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Template variants
// ────────────────────────────────────────────────────────────────────────────

/// Certificate template families. They differ in line spacing and in where a
/// text block sits inside its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateVariant {
    #[default]
    Standard,
    Large,
    Logo,
}

impl TemplateVariant {
    /// Maps a template name such as `large_other_eco` onto its family.
    pub fn from_template_name(name: &str) -> Self {
        let name = name.trim().to_ascii_lowercase();
        if name.starts_with("large") {
            TemplateVariant::Large
        } else if name.starts_with("logo") {
            TemplateVariant::Logo
        } else {
            TemplateVariant::Standard
        }
    }

    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            TemplateVariant::Standard => 1.2,
            TemplateVariant::Large | TemplateVariant::Logo => 1.1,
        }
    }

    pub fn vertical_align(&self) -> VerticalAlign {
        match self {
            TemplateVariant::Large => VerticalAlign::Top,
            TemplateVariant::Standard | TemplateVariant::Logo => VerticalAlign::Center,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fit policy
// ────────────────────────────────────────────────────────────────────────────

/// Configuration for one `fit` call.
///
/// `max_font_size` is where the search starts; `min_font_size` is the floor
/// that is used (and reported as overflowed) when nothing larger fits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitPolicy {
    pub min_font_size: f32,
    pub max_font_size: f32,
    #[serde(default = "default_line_height_multiplier")]
    pub line_height_multiplier: f32,
    #[serde(default = "default_bullet_indicators")]
    pub bullet_indicators: Vec<String>,
    /// Decrement for the paragraph (no explicit breaks) search.
    #[serde(default = "default_step")]
    pub step: f32,
    /// Decrement for the per-line search when explicit breaks are present.
    #[serde(default = "default_line_step")]
    pub line_step: f32,
    #[serde(default)]
    pub height_fallback: HeightFallback,
    /// Cut overflowing output to `floor(box height / min_font_size)` lines.
    #[serde(default)]
    pub truncate_overflow: bool,
}

fn default_line_height_multiplier() -> f32 {
    DEFAULT_LINE_HEIGHT_MULTIPLIER
}

fn default_bullet_indicators() -> Vec<String> {
    DEFAULT_BULLET_INDICATORS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_step() -> f32 {
    DEFAULT_STEP
}

fn default_line_step() -> f32 {
    DEFAULT_LINE_STEP
}

impl FitPolicy {
    pub fn new(min_font_size: f32, max_font_size: f32) -> Self {
        FitPolicy {
            min_font_size,
            max_font_size,
            line_height_multiplier: DEFAULT_LINE_HEIGHT_MULTIPLIER,
            bullet_indicators: default_bullet_indicators(),
            step: DEFAULT_STEP,
            line_step: DEFAULT_LINE_STEP,
            height_fallback: HeightFallback::Minimum,
            truncate_overflow: false,
        }
    }

    pub fn for_variant(variant: TemplateVariant, min_font_size: f32, max_font_size: f32) -> Self {
        FitPolicy::new(min_font_size, max_font_size)
            .with_line_height_multiplier(variant.line_height_multiplier())
    }

    pub fn with_line_height_multiplier(mut self, multiplier: f32) -> Self {
        self.line_height_multiplier = multiplier;
        self
    }

    pub fn with_bullet_indicators<I, S>(mut self, indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.bullet_indicators = indicators.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_height_fallback(mut self, fallback: HeightFallback) -> Self {
        self.height_fallback = fallback;
        self
    }

    pub fn with_truncation(mut self, truncate_overflow: bool) -> Self {
        self.truncate_overflow = truncate_overflow;
        self
    }

    /// Rejects policies the fitter cannot search with.
    pub fn validate(&self) -> Result<(), FitError> {
        let numbers = [
            ("min_font_size", self.min_font_size),
            ("max_font_size", self.max_font_size),
            ("line_height_multiplier", self.line_height_multiplier),
            ("step", self.step),
            ("line_step", self.line_step),
        ];
        for (name, value) in numbers {
            if !value.is_finite() || value <= 0.0 {
                return Err(FitError::InvalidPolicy(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if self.min_font_size > self.max_font_size {
            return Err(FitError::InvalidPolicy(format!(
                "min_font_size ({}) exceeds max_font_size ({})",
                self.min_font_size, self.max_font_size
            )));
        }
        if self.max_font_size > MAX_FONT_SIZE {
            return Err(FitError::InvalidPolicy(format!(
                "max_font_size ({}) exceeds {MAX_FONT_SIZE}pt",
                self.max_font_size
            )));
        }
        if self.step < MIN_STEP || self.line_step < MIN_STEP {
            return Err(FitError::InvalidPolicy(format!(
                "search steps must be at least {MIN_STEP}pt"
            )));
        }
        let range = self.max_font_size - self.min_font_size;
        for (name, step) in [("step", self.step), ("line_step", self.line_step)] {
            if range / step > MAX_SEARCH_STEPS as f32 {
                return Err(FitError::InvalidPolicy(format!(
                    "{name} {step}pt over {range}pt needs more than {MAX_SEARCH_STEPS} candidates"
                )));
            }
        }
        if let HeightFallback::BinarySearch {
            readability_floor,
            relaxed_floor,
            relaxed_utilization_pct,
        } = self.height_fallback
        {
            for (name, value) in [
                ("readability_floor", readability_floor),
                ("relaxed_floor", relaxed_floor),
                ("relaxed_utilization_pct", relaxed_utilization_pct),
            ] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(FitError::InvalidPolicy(format!(
                        "{name} must be a positive number, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Service-wide defaults
// ────────────────────────────────────────────────────────────────────────────

/// Policy settings shared by every field a service instance lays out.
#[derive(Debug, Clone, PartialEq)]
pub struct PolicyDefaults {
    pub min_font_size: f32,
    pub truncate_overflow: bool,
    pub height_fallback: HeightFallback,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        PolicyDefaults {
            min_font_size: 4.0,
            truncate_overflow: false,
            height_fallback: HeightFallback::Minimum,
        }
    }
}

impl PolicyDefaults {
    pub fn policy(&self, variant: TemplateVariant, max_font_size: f32) -> FitPolicy {
        FitPolicy::for_variant(variant, self.min_font_size, max_font_size)
            .with_height_fallback(self.height_fallback)
            .with_truncation(self.truncate_overflow)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
