//! Engine options and RON run configuration.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How a battle's random stream is seeded from the run seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SeedPolicy {
    /// The run seed, unchanged. Battles replay exactly.
    #[default]
    Fixed,
    /// The run seed plus wall-clock milliseconds.
    MixWallClock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    pub seed_policy: SeedPolicy,
    /// Fire on-attack hooks once per executed party attack move.
    pub wire_attack_hooks: bool,
    /// Fire post-battle hooks once, before rewards are computed.
    pub wire_post_battle_hooks: bool,
    /// A battle still undecided after this many rounds ends as a defeat.
    pub max_rounds: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            seed_policy: SeedPolicy::Fixed,
            wire_attack_hooks: false,
            wire_post_battle_hooks: false,
            max_rounds: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMemberConfig {
    pub id: String,
    /// Carried-over health; full health when absent.
    #[serde(default)]
    pub health: Option<i32>,
}

/// One simulated battle, as described in a `.ron` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: u32,
    pub party: Vec<PartyMemberConfig>,
    /// Explicit enemy ids. When empty the encounter for `battle_number` is
    /// generated from the seed.
    #[serde(default)]
    pub enemies: Vec<String>,
    #[serde(default)]
    pub battle_number: Option<u32>,
    #[serde(default)]
    pub relics: Vec<String>,
    /// `character:skill` pairs, unlocked in order.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub options: EngineOptions,
}

impl RunConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        ron::from_str(source).map_err(|err| ConfigError::Parse(err.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|err| ConfigError::Io {
            path: path.display().to_string(),
            details: err.to_string(),
        })?;
        Self::from_ron_str(&source)
    }

    /// Split every `character:skill` entry.
    pub fn skill_pairs(&self) -> Result<Vec<(&str, &str)>, ConfigError> {
        self.skills
            .iter()
            .map(|entry| parse_skill(entry).ok_or_else(|| ConfigError::Parse(format!("expected character:skill, got {:?}", entry))))
            .collect()
    }
}

pub fn parse_skill(entry: &str) -> Option<(&str, &str)> {
    let (character, skill) = entry.split_once(':')?;
    if character.is_empty() || skill.is_empty() {
        return None;
    }
    Some((character, skill))
}
