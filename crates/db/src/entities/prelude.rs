//! Entity re-exports.

pub use super::rate_snapshots::Entity as RateSnapshots;
pub use super::sessions::Entity as Sessions;
pub use super::users::Entity as Users;
