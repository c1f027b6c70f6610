//! `SeaORM` entities.

pub mod prelude;

pub mod rate_snapshots;
pub mod sessions;
pub mod users;
