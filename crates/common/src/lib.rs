//! Shared utilities, configuration, and error handling for Converse
//!
//! This crate provides common functionality used across the Converse application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Object identifiers and random token generation
//! - Input validation rules shared by the auth and chat surfaces

pub mod config;
pub mod crypto;
pub mod db;
pub mod error;
pub mod extractors;
pub mod id;
pub mod state;
pub mod validation;

pub use crypto::{hash_token, random_hex};
pub use db::RepositoryError;
pub use error::{Error, Result};
pub use extractors::ValidatedJson;
pub use id::ObjectId;
pub use state::StateError;
