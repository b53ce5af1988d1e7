use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifies a kind of buff (e.g. "haste"). Content is defined elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuffId(pub String);

/// Identifies a player ability.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AbilityId(pub String);

#[derive(Debug, Clone, PartialEq)]
pub struct Buff {
    pub id: BuffId,
    pub time_until_expiration: f32,
    has_started: bool,
}

/// Buff transitions produced by one [`PlayerState::update_buffs`] call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuffsUpdate {
    pub started: Vec<BuffId>,
    pub active: Vec<BuffId>,
    pub ended: Vec<BuffId>,
}

/// Player stats that items and buffs modify with symmetric deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroStat {
    MaxHealth,
    MaxMana,
    ManaRegen,
    MovementSpeed,
}

/// Non-spatial player state: resources, potions, cooldowns, buffs.
///
/// Health and mana accumulate fractional regeneration in float shadows; the
/// public integer values are their floors.
#[derive(Debug, Clone)]
pub struct PlayerState {
    health: i32,
    health_float: f32,
    pub max_health: i32,
    mana: i32,
    mana_float: f32,
    pub max_mana: i32,
    /// Mana per millisecond.
    pub mana_regen: f32,
    pub potion_slots: BTreeMap<u32, Option<String>>,
    ability_cooldowns: BTreeMap<AbilityId, f32>,
    active_buffs: Vec<Buff>,
    pub is_invisible: bool,
    pub is_stunned: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(100, 100, 50, 50, 0.002)
    }
}

impl PlayerState {
    /// Fresh state with empty potion slots and no cooldowns or buffs. `mana_regen` is mana per millisecond.
    pub fn new(health: i32, max_health: i32, mana: i32, max_mana: i32, mana_regen: f32) -> Self {
        Self {
            health,
            health_float: health as f32,
            max_health,
            mana,
            mana_float: mana as f32,
            max_mana,
            mana_regen,
            potion_slots: (1..=5).map(|slot| (slot, None)).collect(),
            ability_cooldowns: BTreeMap::new(),
            active_buffs: Vec::new(),
            is_invisible: false,
            is_stunned: false,
        }
    }

    /// Register abilities with no cooldown running.
    pub fn with_abilities(mut self, abilities: impl IntoIterator<Item = AbilityId>) -> Self {
        self.ability_cooldowns = abilities.into_iter().map(|a| (a, 0.0)).collect();
        self
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn mana(&self) -> i32 {
        self.mana
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Caps at `max_health`.
    pub fn gain_health(&mut self, amount: f32) {
        self.health_float = (self.health_float + amount).min(self.max_health as f32);
        self.health = self.health_float.floor() as i32;
    }

    /// Health is not floored at zero; death is detected by the caller.
    pub fn lose_health(&mut self, amount: f32) {
        self.health_float = (self.health_float - amount).min(self.max_health as f32);
        self.health = self.health_float.floor() as i32;
    }

    pub fn gain_mana(&mut self, amount: f32) {
        self.mana_float = (self.mana_float + amount).min(self.max_mana as f32);
        self.mana = self.mana_float.floor() as i32;
    }

    pub fn lose_mana(&mut self, amount: f32) {
        self.mana_float -= amount;
        self.mana = self.mana_float.floor() as i32;
    }

    /// Accrue `mana_regen * elapsed_ms` mana.
    pub fn regenerate_mana(&mut self, elapsed_ms: f32) {
        self.gain_mana(self.mana_regen * elapsed_ms);
    }

    /// Lowest numbered slot without a potion.
    pub fn first_empty_potion_slot(&self) -> Option<u32> {
        self.potion_slots
            .iter()
            .find(|(_, potion)| potion.is_none())
            .map(|(slot, _)| *slot)
    }

    /// Remaining cooldown, `None` for unknown abilities.
    pub fn cooldown_remaining(&self, ability: &AbilityId) -> Option<f32> {
        self.ability_cooldowns.get(ability).copied()
    }

    /// Put an ability on cooldown.
    pub fn start_cooldown(&mut self, ability: AbilityId, cooldown_ms: f32) {
        self.ability_cooldowns.insert(ability, cooldown_ms);
    }

    /// Counts down every cooldown that is still running.
    pub fn recharge_ability_cooldowns(&mut self, elapsed_ms: f32) {
        for remaining in self.ability_cooldowns.values_mut() {
            if *remaining > 0.0 {
                *remaining -= elapsed_ms;
            }
        }
    }

    pub fn active_buffs(&self) -> &[Buff] {
        &self.active_buffs
    }

    pub fn has_buff(&self, id: &BuffId) -> bool {
        self.active_buffs.iter().any(|b| &b.id == id)
    }

    /// Add a buff, or refresh its duration if already active. Buffs never stack.
    pub fn gain_buff(&mut self, id: BuffId, duration_ms: f32) {
        if let Some(existing) = self.active_buffs.iter_mut().find(|b| b.id == id) {
            existing.time_until_expiration = duration_ms;
        } else {
            self.active_buffs.push(Buff {
                id,
                time_until_expiration: duration_ms,
                has_started: false,
            });
        }
    }

    /// Advance buff timers and report which buffs started, are running, and
    /// ended during this update. Ended buffs are removed.
    pub fn update_buffs(&mut self, elapsed_ms: f32) -> BuffsUpdate {
        let mut update = BuffsUpdate::default();
        for buff in &mut self.active_buffs {
            if !buff.has_started {
                buff.has_started = true;
                update.started.push(buff.id.clone());
            }
            buff.time_until_expiration -= elapsed_ms;
            if buff.time_until_expiration <= 0.0 {
                update.ended.push(buff.id.clone());
            } else {
                update.active.push(buff.id.clone());
            }
        }
        self.active_buffs.retain(|b| b.time_until_expiration > 0.0);
        update
    }

    /// Apply a stat delta that does not route through the player's body.
    /// Returns false for stats the caller must apply elsewhere.
    pub(crate) fn modify_stat(&mut self, stat: HeroStat, delta: f32) -> bool {
        match stat {
            HeroStat::MaxHealth => {
                self.max_health += delta.round() as i32;
                self.gain_health(0.0);
            }
            HeroStat::MaxMana => {
                self.max_mana += delta.round() as i32;
                self.gain_mana(0.0);
            }
            HeroStat::ManaRegen => self.mana_regen += delta,
            HeroStat::MovementSpeed => return false,
        }
        true
    }
}
