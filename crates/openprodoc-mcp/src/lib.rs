// crates/openprodoc-mcp/src/lib.rs
// OpenProdoc MCP - document management tools for AI agents

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

pub mod attrs;
pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod render;
pub mod session;
pub mod tools;
pub mod utils;
pub use error::{ProdocError, Result};
