/*!
 * Core Module
 * Errors, configuration, validation and shared types
 */

pub mod config;
pub mod data_structures;
pub mod errors;
pub mod tracer;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export for convenience
pub use config::{FicheConfig, RandomConfig, WalkConfig};
pub use data_structures::InlineString;
pub use errors::*;
pub use tracer::init_tracing;
pub use traits::{ComparableExt, DefaultEquality, EqualityStrategy};
pub use types::*;
