// Text fitting: font-size search, word wrap, and line placement for
// certificate template boxes. Pure and synchronous; handlers run it inside
// tokio::task::spawn_blocking.

pub mod adjust;
pub mod fitter;
pub mod font_metrics;
pub mod geometry;
pub mod placement;
pub mod policy;
pub mod wrap;

// Re-export the public API consumed by the certificate module and handlers.
pub use fitter::{
    fit, truncate_overflow, FitError, FitObserver, FitResult, Fitter, TracingObserver,
};
pub use font_metrics::{get_metrics, FontFamily, MeasureError, TextMeasure};
pub use geometry::Rect;
pub use placement::{place_lines, LinePlacement, PlacementOptions, VerticalAlign};
pub use policy::{FitPolicy, HeightFallback, PolicyDefaults, TemplateVariant};
