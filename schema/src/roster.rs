use crate::stats::Stats;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Strategy families for party members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PartyRole {
    Tank,
    Healer,
    DamageDealer,
    SupportLeader,
    Generic,
}

/// Enemy families with a bespoke strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum EnemySpecies {
    BarkBeetle,
    SwarmingBeetle,
    BranchSnake,
    SapSlime,
    SmallSlime,
    HollowAcorn,
}

/// Tier-level fallback behaviour for enemies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Default)]
pub enum Temperament {
    #[default]
    Aggressive,
    Defensive,
    Random,
}

/// Archetype tag resolved once from content and used as the AI lookup key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AiProfile {
    Party(PartyRole),
    Enemy {
        #[serde(default)]
        species: Option<EnemySpecies>,
        #[serde(default)]
        temperament: Temperament,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, Default)]
#[strum(serialize_all = "snake_case")]
pub enum Tier {
    #[default]
    Common,
    Elite,
    Boss,
}

/// Character passives. Only `BonusAcorns` changes battle rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Passive {
    Inspire,
    CritBias,
    PostBattleHeal,
    Guard,
    BonusAcorns,
    Inconsistent,
    FabulousCrit,
}

/// Static definition of a party character or an enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombatantDef {
    pub id: String,
    pub name: String,
    pub base: Stats,
    pub moves: Vec<String>,
    pub ai: AiProfile,
    #[serde(default)]
    pub passive: Option<Passive>,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default)]
    pub description: String,
}

impl CombatantDef {
    pub fn knows(&self, move_id: &str) -> bool {
        self.moves.iter().any(|id| id == move_id)
    }
}
