// crates/openprodoc-mcp/src/config/mod.rs
// Configuration and shared constants

pub mod env;

pub use env::{ConfigValidation, DEFAULT_BASE_URL, DefaultLogin, EnvConfig};
