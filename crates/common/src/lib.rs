//! Common utilities and shared types for the portfolio backend.
//!
//! This crate provides foundational components used across all workspace crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based entity identifiers and opaque tokens via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use portfolio_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod pagination;

pub use config::{Config, DatabaseConfig, ServerConfig, SiteConfig};
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
pub use pagination::{has_more, page_offset};
