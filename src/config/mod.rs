//! Flow definitions
//!
//! A flow definition describes a wizard declaratively:
//! - `types`: step kinds and validation rules
//! - `loader`: definition file discovery, parsing and validation

pub mod loader;
pub mod types;

pub use loader::{Config, FlowDefinition, StepDefinition};
pub use types::{StepType, Validation};
