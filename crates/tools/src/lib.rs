//! Developer tooling: read-only world inspection and text dumps.
//!
//! # Invariants
//! - Tools never mutate the world.

pub mod dump;
pub mod inspector;

pub use dump::DebugTextDump;
pub use inspector::{EntityInfo, WorldInspector, WorldSummary};
