//! Background maintenance services.

mod tombstone_sweeper;

pub use tombstone_sweeper::{TombstoneSweeper, TombstoneSweeperConfig};
