//! Certificate layout: fits every field of one certificate and collects the
//! overflow warnings the generation report shows.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::certificate::fields::{CertificateField, FieldInput};
use crate::layout::adjust::{apply_size_adjustment, fixed_size_layout};
use crate::layout::wrap::has_explicit_breaks;
use crate::layout::{
    place_lines, truncate_overflow, FitError, FitResult, Fitter, LinePlacement, PlacementOptions,
    PolicyDefaults, Rect, TemplateVariant, TextMeasure, TracingObserver,
};

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutRequest {
    #[serde(default)]
    pub variant: TemplateVariant,
    /// Template name such as `large_other_eco`. Overrides `variant` when set.
    #[serde(default)]
    pub template: Option<String>,
    pub font: String,
    pub fields: Vec<FieldInput>,
}

impl LayoutRequest {
    pub fn resolved_variant(&self) -> TemplateVariant {
        self.template
            .as_deref()
            .map(TemplateVariant::from_template_name)
            .unwrap_or(self.variant)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldLayout {
    pub field: CertificateField,
    pub fit: FitResult,
    pub placements: Vec<LinePlacement>,
}

/// A field whose text is taller than its box even at the smallest size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverflowWarning {
    pub field: CertificateField,
    pub font_size: f32,
    /// Block height as a percentage of box height; `None` for a box with no
    /// height.
    pub utilization_pct: Option<f32>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LayoutReport {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub variant: TemplateVariant,
    pub fields: Vec<FieldLayout>,
    pub overflow_warnings: Vec<OverflowWarning>,
}

// ────────────────────────────────────────────────────────────────────────────
// Layout
// ────────────────────────────────────────────────────────────────────────────

/// Lays out every field in `request` with one font.
///
/// Overflow never fails the request; it shows up in `overflow_warnings`.
pub fn layout_certificate<M: TextMeasure + ?Sized>(
    request: &LayoutRequest,
    measure: &M,
    defaults: &PolicyDefaults,
) -> Result<LayoutReport, FitError> {
    let variant = request.resolved_variant();
    let mut fields = Vec::with_capacity(request.fields.len());
    let mut overflow_warnings = Vec::new();

    for input in &request.fields {
        let layout = layout_field(input, variant, measure, defaults)?;
        if let Some(warning) = overflow_warning(input.field, &layout.fit, &input.rect) {
            warn!(field = input.field.label(), "{}", warning.message);
            overflow_warnings.push(warning);
        }
        fields.push(layout);
    }

    info!(
        fields = fields.len(),
        warnings = overflow_warnings.len(),
        variant = ?variant,
        "certificate layout complete"
    );

    Ok(LayoutReport {
        id: Uuid::new_v4(),
        generated_at: Utc::now(),
        variant,
        fields,
        overflow_warnings,
    })
}

fn layout_field<M: TextMeasure + ?Sized>(
    input: &FieldInput,
    variant: TemplateVariant,
    measure: &M,
    defaults: &PolicyDefaults,
) -> Result<FieldLayout, FitError> {
    let policy = input.policy(variant, defaults);
    // Truncation runs once, after the adjustment has settled the final size.
    let search = policy.clone().with_truncation(false);

    let fit = if input.force_font_size {
        fixed_size_layout(&input.text, input.rect, search.max_font_size, &search)?
    } else {
        let observer = TracingObserver::new(input.field.label());
        Fitter::new(measure)
            .with_observer(&observer)
            .fit(&input.text, input.rect, &search)?
    };
    let fit = apply_size_adjustment(
        fit,
        input.font_size_adjustment,
        input.rect,
        measure,
        &search,
    )?;
    let fit = truncate_overflow(fit, input.rect, &policy);

    let options = PlacementOptions {
        vertical_align: variant.vertical_align(),
        explicit_breaks: has_explicit_breaks(&input.text),
        offset_y: input.offset_y,
        line_height_multiplier: policy.line_height_multiplier,
        bullet_indicators: &policy.bullet_indicators,
    };
    let placements = place_lines(&fit, &input.rect, measure, &options)?;

    Ok(FieldLayout {
        field: input.field,
        fit,
        placements,
    })
}

/// Builds the report entry for an overflowing field.
pub fn overflow_warning(
    field: CertificateField,
    fit: &FitResult,
    rect: &Rect,
) -> Option<OverflowWarning> {
    if !fit.overflowed {
        return None;
    }

    let utilization_pct = fit.utilization(rect).map(|u| u * 100.0);
    let message = match utilization_pct {
        Some(pct) => format!(
            "{} text exceeded box by {:.0}%",
            field.label(),
            (pct - 100.0).max(0.0)
        ),
        None => format!("{} box has no usable area", field.label()),
    };

    Some(OverflowWarning {
        field,
        font_size: fit.font_size,
        utilization_pct,
        message,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
