//! Query translation, execution and serving for PulseQL.
//!
//! Queries flow through the same path regardless of where they come from:
//! optional keyword translation, execution against SQLite, then encoding of
//! the rows for the caller.

pub mod addr;
pub mod bulk;
pub mod dictionary;
pub mod encode;
pub mod errors;
pub mod executor;
pub mod keywords;
pub mod server;
pub mod session;
pub mod translate;

pub use async_sqlite::rusqlite;

/// Name shown in banners.
pub const TOOL_NAME: &str = "PulseQL";

/// Version shown in banners and by `--version`.
pub const TOOL_VERSION: &str = env!("CARGO_PKG_VERSION");
