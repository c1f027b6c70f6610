//! Shared types, errors, and configuration for fxgate.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Token claims and the JWT signing service
//! - Upstream exchange-rate providers
//! - Application-wide error types
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod providers;
pub mod types;


pub use auth::{AccessToken, Claims};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use providers::{FetchError, FetchedRates, RateProvider};
