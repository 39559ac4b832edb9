//! Configuration loading, merging, and validation

pub mod parser;
pub mod types;
pub mod validation;

pub use parser::{load_config, resolve_config, Overrides};
pub use types::{Config, DisplayLevel, RedundancyLevel};
pub use validation::validate;
