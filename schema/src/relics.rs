use crate::stats::{StatKey, Stats};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Battle-loop extension points a hook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Display, EnumIter)]
pub enum HookEvent {
    /// Fired once per round, after status decay and per-round healing.
    RoundStart,
    OnAttack,
    OnCrit,
    PostBattle,
}

/// Content-authored hook behaviours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HookEffect {
    /// Add acorns to the battle's bonus pool with the given chance.
    GrantAcorns { chance: f64, amount: u32 },
    /// Heal every living party member.
    HealParty { amount: i32 },
    /// Heal the party member that triggered the hook.
    HealActor { amount: i32 },
    /// With `chance`, boost one random stat of the triggering party member.
    RandomStatSurge {
        chance: f64,
        amount: i32,
        ttl: u32,
        id_prefix: String,
        name_prefix: String,
    },
    /// With `chance`, boost every stat of every living party member.
    PartySurge {
        chance: f64,
        amount: i32,
        ttl: u32,
        id_prefix: String,
        name_prefix: String,
    },
    /// With `chance` one random stat gains `boost` party-wide, otherwise every
    /// stat loses `penalty`.
    Chaos { chance: f64, boost: i32, penalty: i32, ttl: u32 },
    /// Drain health from every living party member, never below `floor`.
    Drain { amount: i32, floor: i32 },
    /// Refresh a strength buff worth one point per `per_missing` missing health.
    Berserk { per_missing: i32, ttl: u32 },
    /// Every `every`-th trigger multiplies the next attack's damage.
    EmpowerEveryNth { every: u32, factor: f64 },
    /// Heal every living party member by a share of their base maximum.
    RecoverPercent { percent: i32 },
}

/// One mutation applied to the run's modifier aggregate at acquisition time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ModifierEffect {
    StatBonus { stat: StatKey, amount: i32 },
    AllStats(i32),
    /// Bonus that only applies to one party character.
    CharacterStatBonus { character: String, stat: StatKey, amount: i32 },
    /// Scale every existing stat bonus, flooring the result.
    ScaleStatBonuses(f64),
    /// Multiply the global damage multiplier.
    DamageFactor(f64),
    /// Add to the global damage multiplier.
    DamageBonus(f64),
    AcornDropFactor(f64),
    CritBonus(f64),
    DodgeBonus(f64),
    HealPerRound(i32),
    PostBattleHealPct(i32),
    Hook { event: HookEvent, effect: HookEffect },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelicDef {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub description: String,
    /// Minimum stat values a party member must have to benefit.
    #[serde(default)]
    pub requires: Vec<(StatKey, i32)>,
    pub effects: Vec<ModifierEffect>,
}

impl RelicDef {
    pub fn requirements_met_by(&self, stats: &Stats) -> bool {
        self.requires.iter().all(|(stat, minimum)| stats.get(*stat) >= *minimum)
    }

    /// True when at least one of the given stat blocks meets every requirement.
    pub fn requirements_met_by_any<'a>(&self, party: impl IntoIterator<Item = &'a Stats>) -> bool {
        if self.requires.is_empty() {
            return true;
        }
        party.into_iter().any(|stats| self.requirements_met_by(stats))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillNode {
    pub id: String,
    pub character: String,
    pub branch: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub cost: u32,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default)]
    pub effects: Vec<ModifierEffect>,
}

impl SkillNode {
    pub fn unlockable_with(&self, unlocked: &[String]) -> bool {
        self.prerequisites.iter().all(|prereq| unlocked.contains(prereq))
    }
}
