//! Core business logic for fxgate.
//!
//! This crate contains the two pieces of the service with real invariants,
//! with ZERO web or database dependencies. Persistence and upstream access
//! are reached through the traits in [`auth::CredentialStore`],
//! [`currency::RateSnapshotStore`] and [`currency::RateFetcher`].
//!
//! # Modules
//!
//! - `auth` - Session-bound token authentication, login and registration
//! - `currency` - Rate snapshots, triangulated conversion, scheduled refresh
//! - `store` - Errors shared by every store implementation

pub mod auth;
pub mod currency;
pub mod store;

pub use store::StoreError;
