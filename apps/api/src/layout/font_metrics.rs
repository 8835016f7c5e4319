//! Static font-metric tables for the certificate typefaces.
//!
//! Character widths are in em units (relative to font size), taken from the
//! base-14 AFM metrics every PDF viewer ships for these faces. Kerning is
//! ignored, so a measured width can be off by a fraction of a point on long
//! lines; the fitter's width tolerance absorbs that.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Measurement contract
// ────────────────────────────────────────────────────────────────────────────

/// Failure to measure text. The fitter cannot recover from these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeasureError {
    #[error("unknown font: {0}")]
    UnknownFont(String),

    #[error("font size must be finite and non-negative, got {0}")]
    InvalidSize(f32),

    #[error("measured width of {text:?} is not finite")]
    NonFiniteWidth { text: String },
}

/// A font measurement provider: the rendered width of `text` at `size` points.
///
/// Implementations must be deterministic for fixed inputs. They are shared
/// read-only, so anything backed by a non-thread-safe library should be
/// handed out per call or per thread by the caller.
pub trait TextMeasure {
    fn text_length(&self, text: &str, size: f32) -> Result<f32, MeasureError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// The faces the certificate templates are set in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    #[serde(rename = "Times-Roman")]
    TimesRoman,
    /// Default face for certificate body fields.
    #[serde(rename = "Times-Bold")]
    TimesBold,
    #[serde(rename = "Helvetica")]
    Helvetica,
    #[serde(rename = "Helvetica-Bold")]
    HelveticaBold,
}

impl FontFamily {
    /// Resolves a caller-supplied font name.
    ///
    /// Accepts the PostScript names (`Times-Bold`) case-insensitively, plus the
    /// four-letter base-14 aliases PDF toolkits use (`tibo`, `helv`, ...).
    pub fn from_name(name: &str) -> Result<Self, MeasureError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "times-roman" | "times" | "tiro" => Ok(FontFamily::TimesRoman),
            "times-bold" | "tibo" => Ok(FontFamily::TimesBold),
            "helvetica" | "helv" => Ok(FontFamily::Helvetica),
            "helvetica-bold" | "hebo" => Ok(FontFamily::HelveticaBold),
            _ => Err(MeasureError::UnknownFont(name.to_string())),
        }
    }

    pub fn postscript_name(&self) -> &'static str {
        match self {
            FontFamily::TimesRoman => "Times-Roman",
            FontFamily::TimesBold => "Times-Bold",
            FontFamily::Helvetica => "Helvetica",
            FontFamily::HelveticaBold => "Helvetica-Bold",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)` at 1em, covering
/// 0x20 (space) through 0x7E (~).
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [f32; 95],
    /// Width of U+2022 BULLET, the glyph scope bullets are displayed with.
    pub bullet_width: f32,
    /// Fallback width for other non-ASCII characters.
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    ///
    /// Non-ASCII characters other than `•` fall back to `average_char_width`.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else if c == '\u{2022}' {
                    self.bullet_width
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    pub fn space_width(&self) -> f32 {
        self.widths[0]
    }
}

impl TextMeasure for FontMetricTable {
    fn text_length(&self, text: &str, size: f32) -> Result<f32, MeasureError> {
        if !size.is_finite() || size < 0.0 {
            return Err(MeasureError::InvalidSize(size));
        }
        let width = self.measure_str(text) * size;
        if !width.is_finite() {
            return Err(MeasureError::NonFiniteWidth {
                text: text.to_string(),
            });
        }
        Ok(width)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static TIMES_ROMAN_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::TimesRoman,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    bullet_width: 0.350,
    average_char_width: 0.47,
};

static TIMES_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::TimesBold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.555, 0.500, 0.500, 1.000, 0.833, 0.278, 0.333, 0.333, 0.500, 0.570, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.570, 0.570, 0.570, 0.500, 0.930,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.778, 0.389, 0.500, 0.778, 0.667, 0.944,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.611, 0.778, 0.722, 0.556, 0.667, 0.722, 0.722, 1.000, 0.722, 0.722, 0.667,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.581, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.500, 0.556, 0.444, 0.556, 0.444, 0.333, 0.500, 0.556, 0.278, 0.333, 0.556, 0.278, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.500, 0.556, 0.556, 0.444, 0.389, 0.333, 0.556, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.394, 0.220, 0.394, 0.520,
    ],
    bullet_width: 0.350,
    average_char_width: 0.50,
};

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Helvetica,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    bullet_width: 0.350,
    average_char_width: 0.52,
};

static HELVETICA_BOLD_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::HelveticaBold,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611, 0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    bullet_width: 0.350,
    average_char_width: 0.56,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::TimesRoman => &TIMES_ROMAN_TABLE,
        FontFamily::TimesBold => &TIMES_BOLD_TABLE,
        FontFamily::Helvetica => &HELVETICA_TABLE,
        FontFamily::HelveticaBold => &HELVETICA_BOLD_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
