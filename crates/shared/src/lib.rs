//! Shared types, errors, and configuration for Amanat.
//!
//! This crate provides common types used across all other crates:
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token service

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod config_tests;
#[cfg(test)]
mod jwt_tests;

pub use auth::Claims;
pub use config::{AppConfig, LetterConfig};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
