//! Core business logic for the portfolio backend.

pub mod services;

pub use services::*;
