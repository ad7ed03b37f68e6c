//! Core types and trait definitions for the promotions service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The storage backend and the API layer both depend on it.

pub mod error;
pub mod promotion;
pub mod store;

pub use error::{Error, Result};
