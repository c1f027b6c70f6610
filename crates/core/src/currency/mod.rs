//! Rate snapshots and triangulated currency conversion.
//!
//! Rates are fetched from an upstream through [`RateFetcher`], appended to a
//! [`RateSnapshotStore`] as immutable snapshots and read back by the
//! [`ConversionEngine`]. All math is exact decimal; rounding happens only
//! when a result is presented.

pub mod code;
pub mod conversion;
pub mod engine;
pub mod error;
pub mod fetcher;
pub mod memory;
pub mod scheduler;
pub mod snapshot;
pub mod store;

#[cfg(test)]
mod props;

pub use code::{normalize_code, parse_code};
pub use conversion::{DISPLAY_SCALE, format_fixed, parse_amount, round_for_display, triangulate};
pub use engine::{ConversionEngine, LatestRates};
pub use error::RatesError;
pub use fetcher::RateFetcher;
pub use memory::MemorySnapshotStore;
pub use scheduler::spawn_refresh_loop;
pub use snapshot::{NewRateSnapshot, RateMap, RateSnapshot, encode_rates};
pub use store::RateSnapshotStore;
