//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! [`CredentialRepository`] and [`RateSnapshotRepository`] implement the core
//! store traits.

mod error;

pub mod credential;
pub mod rate_snapshot;
pub mod session;
pub mod user;

pub use credential::CredentialRepository;
pub use error::store_err;
pub use rate_snapshot::RateSnapshotRepository;
pub use session::SessionRepository;
pub use user::UserRepository;
