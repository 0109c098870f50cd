use crate::stats::StatKey;
use crate::status::StatusEffect;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    Attack,
    Support,
    Special,
}

/// Who a move is aimed at, relative to the combatant using it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetMode {
    Enemy,
    AllEnemies,
    Ally,
    AllAllies,
    User,
}

impl TargetMode {
    /// Offensive modes are the ones a taunt can redirect.
    pub fn is_offensive(self) -> bool {
        matches!(self, TargetMode::Enemy | TargetMode::AllEnemies)
    }
}

/// Whether an attached status is logged as a buff or a debuff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Polarity {
    #[default]
    Buff,
    Debuff,
}

/// Which side of the field, seen from the acting combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation {
    Friendly,
    Hostile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealAmount {
    Flat(i32),
    /// Percentage of the acting combatant's maximum health, floored.
    PercentOfMax(i32),
}

/// A closed set of effect shapes interpreted by the battle core.
///
/// Message strings may contain `{source}`, `{target}`, `{amount}` and
/// `{level}` placeholders, substituted when the template action is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EffectDescriptor {
    /// A damage action against the engine-resolved targets.
    Strike { message: String },
    /// A message-only special action.
    Announce { message: String },
    /// Attach a status to the engine-resolved targets.
    Afflict {
        status: StatusEffect,
        message: String,
        #[serde(default)]
        polarity: Polarity,
        /// Roll chance in `[0, 1]`; `None` always applies.
        #[serde(default)]
        chance: Option<f64>,
        /// Bind the status' forced target to the acting combatant.
        #[serde(default)]
        bind_to_source: bool,
    },
    /// Attach a status to every living member of a side, one action each.
    AfflictEach {
        side: Relation,
        status: StatusEffect,
        message: String,
        #[serde(default)]
        polarity: Polarity,
        #[serde(default)]
        include_source: bool,
        #[serde(default)]
        bind_to_source: bool,
    },
    /// Heal the engine-resolved targets.
    Heal { amount: HealAmount, message: String },
    /// Heal living friendly combatants by a share of their own maximum plus
    /// a multiple of the source's magic.
    HealEach {
        percent_of_max: i32,
        magic_scale: i32,
        message: String,
        #[serde(default)]
        wounded_only: bool,
        /// Logged as a zero-value heal on the source when nobody qualifies.
        #[serde(default)]
        idle_message: Option<String>,
    },
    /// Attach a status to the friendly combatant (other than the source) with
    /// the lowest health ratio.
    ProtectWeakest { status: StatusEffect, message: String },
    /// Replace the source with the listed enemy definitions when its health
    /// ratio is at or below `threshold`.
    Split {
        threshold: f64,
        into: Vec<String>,
        message: String,
        #[serde(default)]
        otherwise: Vec<EffectDescriptor>,
    },
    /// Add reinforcements next to the source when its health ratio is below
    /// `threshold` and its side has at most `max_allies` living members.
    Summon {
        threshold: f64,
        max_allies: usize,
        spawn: Vec<String>,
        message: String,
        #[serde(default)]
        otherwise: Vec<EffectDescriptor>,
    },
    /// A self buff whose strength steps up as health falls past each
    /// threshold.
    Rage {
        status: StatusEffect,
        per_level: i32,
        thresholds: Vec<f64>,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveDef {
    pub id: String,
    pub name: String,
    pub kind: MoveKind,
    #[serde(default)]
    pub power: Option<i32>,
    #[serde(default)]
    pub scaling: Option<StatKey>,
    pub target: TargetMode,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub effects: Vec<EffectDescriptor>,
}

impl MoveDef {
    pub fn is_attack(&self) -> bool {
        self.kind == MoveKind::Attack
    }

    /// True if any descriptor restores health.
    pub fn heals(&self) -> bool {
        self.effects
            .iter()
            .any(|effect| matches!(effect, EffectDescriptor::Heal { .. } | EffectDescriptor::HealEach { .. }))
    }
}

impl fmt::Display for MoveDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
