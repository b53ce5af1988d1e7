//! Player input: movement intent mapped to world direction changes.
//!
//! # Invariants
//! - Input never moves an entity directly; it only sets or clears a
//!   direction. Collision resolution happens in the kernel's tick.

pub mod action;
pub mod pad;

pub use action::{Action, ParseActionError};
pub use pad::DirectionPad;
