//! Maintenance handlers.

mod reclaim_tombstones;

pub use reclaim_tombstones::{
    ReclaimTombstonesCommand, ReclaimTombstonesHandler, DEFAULT_RETENTION_MONTHS,
    MAX_RETENTION_MONTHS,
};
