use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// The five growth attributes a status effect or modifier can target.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum StatKey {
    #[strum(serialize = "STR")]
    Strength,
    #[strum(serialize = "SPD")]
    Speed,
    #[strum(serialize = "MAG")]
    Magic,
    #[strum(serialize = "DEF")]
    Defense,
    #[strum(serialize = "LCK")]
    Luck,
}

/// Growth attributes plus current and maximum health.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Stats {
    pub strength: i32,
    pub speed: i32,
    pub magic: i32,
    pub defense: i32,
    pub luck: i32,
    pub health: i32,
    pub max_health: i32,
}

impl Stats {
    /// Full-health stat block.
    pub const fn new(strength: i32, speed: i32, magic: i32, defense: i32, luck: i32, max_health: i32) -> Self {
        Self {
            strength,
            speed,
            magic,
            defense,
            luck,
            health: max_health,
            max_health,
        }
    }

    pub fn get(&self, stat: StatKey) -> i32 {
        match stat {
            StatKey::Strength => self.strength,
            StatKey::Speed => self.speed,
            StatKey::Magic => self.magic,
            StatKey::Defense => self.defense,
            StatKey::Luck => self.luck,
        }
    }

    pub fn get_mut(&mut self, stat: StatKey) -> &mut i32 {
        match stat {
            StatKey::Strength => &mut self.strength,
            StatKey::Speed => &mut self.speed,
            StatKey::Magic => &mut self.magic,
            StatKey::Defense => &mut self.defense,
            StatKey::Luck => &mut self.luck,
        }
    }

    pub fn add(&mut self, stat: StatKey, delta: i32) {
        *self.get_mut(stat) += delta;
    }

    /// Current health as a fraction of maximum. Zero-max blocks report 0.
    pub fn health_ratio(&self) -> f64 {
        if self.max_health <= 0 {
            return 0.0;
        }
        self.health as f64 / self.max_health as f64
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_full_health(&self) -> bool {
        self.health >= self.max_health
    }
}
