//! pf-results: solved-state types for steady hydraulic runs.

pub mod types;

pub use types::*;

/// UTC RFC3339 timestamp for a freshly produced state.
pub fn now_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
