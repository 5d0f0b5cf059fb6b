//! Library → Serato synchronization

mod engine;

pub use engine::{LogCallback, SyncEngine, SyncSummary};
