//! Actix middleware shared across the HTTP surface.

pub mod trace;

/// Per-request tracing middleware.
pub use trace::Trace;
