use std::str::FromStr;

use dungeon_common::{Direction, EntityId};
use dungeon_kernel::World;

/// A movement intent produced by a key binding, a script, or a gamepad.
///
/// The kernel consumes actions, never raw key events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Start (or keep) moving in a direction.
    Move(Direction),
    /// Stop moving, keeping the current facing.
    Stop,
    /// Unbound input.
    Noop,
}

impl Action {
    /// Apply this action to entity `id`. Returns false when the entity is
    /// unknown or cannot be steered.
    pub fn apply(self, world: &mut World, id: EntityId) -> bool {
        match self {
            Action::Move(direction) => world.set_direction(id, Some(direction)),
            Action::Stop => world.set_direction(id, None),
            Action::Noop => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action `{0}`")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    /// Accepts a direction name, `stop`, or `-`/`noop`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stop" | "s" => Ok(Action::Stop),
            "-" | "noop" => Ok(Action::Noop),
            other => other
                .parse::<Direction>()
                .map(Action::Move)
                .map_err(|_| ParseActionError(s.to_string())),
        }
    }
}
