use dungeon_common::{Direction, EntityId};
use dungeon_kernel::World;

use crate::Action;

/// Tracks held direction keys and resolves them to one movement intent.
///
/// The most recently pressed key that is still held wins. Releasing it falls
/// back to the previously held key, if any.
#[derive(Debug, Clone, Default)]
pub struct DirectionPad {
    held: Vec<Direction>,
}

impl DirectionPad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold a key. Re-pressing moves it to the top.
    pub fn press(&mut self, direction: Direction) {
        self.held.retain(|d| *d != direction);
        self.held.push(direction);
    }

    pub fn release(&mut self, direction: Direction) {
        self.held.retain(|d| *d != direction);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Direction of the most recent held key.
    pub fn current(&self) -> Option<Direction> {
        self.held.last().copied()
    }

    /// `Stop` when no key is held.
    pub fn action(&self) -> Action {
        self.current().map_or(Action::Stop, Action::Move)
    }

    /// Push the current intent onto entity `id`.
    pub fn apply(&self, world: &mut World, id: EntityId) -> bool {
        let action = self.action();
        tracing::trace!(%id, ?action, "direction pad applied");
        action.apply(world, id)
    }
}
