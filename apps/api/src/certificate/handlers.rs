//! Axum route handlers for the fitting API.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::certificate::report::{layout_certificate, LayoutReport, LayoutRequest};
use crate::errors::AppError;
use crate::layout::{
    get_metrics, FitError, FitPolicy, FitResult, Fitter, FontFamily, Rect, TemplateVariant,
    TracingObserver,
};
use crate::state::AppState;

/// Starting size for ad-hoc fits that bring no policy.
pub const DEFAULT_MAX_FONT_SIZE: f32 = 20.0;

#[derive(Debug, Deserialize)]
pub struct FitRequestBody {
    pub text: String,
    pub rect: Rect,
    pub font: String,
    #[serde(default)]
    pub variant: TemplateVariant,
    /// Replaces the service defaults entirely when present.
    pub policy: Option<FitPolicy>,
}

/// POST /api/v1/fit
///
/// Fits one string into one box.
pub async fn handle_fit(
    State(state): State<AppState>,
    Json(request): Json<FitRequestBody>,
) -> Result<Json<FitResult>, AppError> {
    let font = FontFamily::from_name(&request.font).map_err(FitError::from)?;
    info!(font = font.postscript_name(), chars = request.text.chars().count(), "fit requested");
    let policy = request
        .policy
        .unwrap_or_else(|| state.defaults.policy(request.variant, DEFAULT_MAX_FONT_SIZE));

    let result = tokio::task::spawn_blocking(move || {
        let observer = TracingObserver::new("fit");
        Fitter::new(get_metrics(&font))
            .with_observer(&observer)
            .fit(&request.text, request.rect, &policy)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in fit: {e}")))??;

    Ok(Json(result))
}

/// POST /api/v1/certificates/layout
///
/// Fits and places every field of one certificate and reports overflow.
pub async fn handle_certificate_layout(
    State(state): State<AppState>,
    Json(request): Json<LayoutRequest>,
) -> Result<Json<LayoutReport>, AppError> {
    if request.fields.is_empty() {
        return Err(AppError::Validation("fields cannot be empty".to_string()));
    }
    let font = FontFamily::from_name(&request.font).map_err(FitError::from)?;
    info!(
        font = font.postscript_name(),
        fields = request.fields.len(),
        "certificate layout requested"
    );
    let defaults = state.defaults.clone();

    let report = tokio::task::spawn_blocking(move || {
        layout_certificate(&request, get_metrics(&font), &defaults)
    })
    .await
    .map_err(|e| {
        AppError::Internal(anyhow::anyhow!(
            "spawn_blocking failed in certificate layout: {e}"
        ))
    })??;

    Ok(Json(report))
}
