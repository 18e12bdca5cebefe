// src/lib.rs
// Public library surface for integration tests (and potential reuse).

pub mod config;
pub mod dedupe;
pub mod detect;
pub mod export;
pub mod pipeline;
pub mod probe;
pub mod providers;
pub mod robots;
pub mod source;
pub mod store;

// ---- Re-exports for stable public API ----
pub use config::DiscoveryConfig;
pub use pipeline::{Discovery, RunReport};
pub use source::{AtsVendor, Source, SourceKey, SourceStatus};
