// Public modules
pub mod doctor;
pub mod error;
pub mod monitor;
pub mod normalize;
pub mod paths;
pub mod process;
pub mod rebuild;
pub mod repair;
pub mod restore;
pub mod rewrite;
pub mod ruleset;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
