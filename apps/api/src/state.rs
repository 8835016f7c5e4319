use crate::config::Config;
use crate::layout::PolicyDefaults;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Policy settings derived from the service config, applied to every field.
    pub defaults: PolicyDefaults,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        AppState {
            defaults: config.policy_defaults(),
        }
    }
}
