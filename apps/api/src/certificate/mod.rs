// Certificate callers of the text fitter: typed field records, per-field
// layout, and the overflow report.

pub mod fields;
pub mod handlers;
pub mod report;
