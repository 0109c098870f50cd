//! The run-scoped modifier aggregate.
//!
//! Relics and skills mutate a `BattleModifiers` once, when they are acquired.
//! The battle engine only reads it, apart from invoking the installed hooks.

use crate::errors::{RunContextError, RunContextResult};
use crate::hooks::{ContentHook, HookRegistry};
use schema::{ModifierEffect, StatKey, Stats};
use std::collections::BTreeMap;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct BattleModifiers {
    /// Additive bonuses for every party member.
    pub stat_bonuses: BTreeMap<StatKey, i32>,
    /// Additive bonuses keyed by character id.
    pub character_bonuses: BTreeMap<String, BTreeMap<StatKey, i32>>,
    pub damage_multiplier: f64,
    pub acorn_drop_multiplier: f64,
    /// Percentage points added to crit chance.
    pub crit_bonus: f64,
    /// Percentage points added to dodge chance.
    pub dodge_bonus: f64,
    pub heal_per_round: i32,
    pub post_battle_heal_pct: i32,
    pub hooks: HookRegistry,
}

impl Default for BattleModifiers {
    fn default() -> Self {
        Self {
            stat_bonuses: BTreeMap::new(),
            character_bonuses: BTreeMap::new(),
            damage_multiplier: 1.0,
            acorn_drop_multiplier: 1.0,
            crit_bonus: 0.0,
            dodge_bonus: 0.0,
            heal_per_round: 0,
            post_battle_heal_pct: 0,
            hooks: HookRegistry::new(),
        }
    }
}

impl BattleModifiers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one acquisition effect. `source` names the relic or skill.
    pub fn apply(&mut self, source: &str, effect: &ModifierEffect) {
        debug!(source, ?effect, "applying modifier");
        match effect {
            ModifierEffect::StatBonus { stat, amount } => {
                *self.stat_bonuses.entry(*stat).or_insert(0) += amount;
            }
            ModifierEffect::AllStats(amount) => {
                for stat in StatKey::iter() {
                    *self.stat_bonuses.entry(stat).or_insert(0) += amount;
                }
            }
            ModifierEffect::CharacterStatBonus {
                character,
                stat,
                amount,
            } => {
                *self
                    .character_bonuses
                    .entry(character.clone())
                    .or_default()
                    .entry(*stat)
                    .or_insert(0) += amount;
            }
            ModifierEffect::ScaleStatBonuses(factor) => {
                for bonus in self.stat_bonuses.values_mut() {
                    *bonus = (*bonus as f64 * factor).floor() as i32;
                }
            }
            ModifierEffect::DamageFactor(factor) => self.damage_multiplier *= factor,
            ModifierEffect::DamageBonus(bonus) => self.damage_multiplier += bonus,
            ModifierEffect::AcornDropFactor(factor) => self.acorn_drop_multiplier *= factor,
            ModifierEffect::CritBonus(points) => self.crit_bonus += points,
            ModifierEffect::DodgeBonus(points) => self.dodge_bonus += points,
            ModifierEffect::HealPerRound(amount) => self.heal_per_round += amount,
            ModifierEffect::PostBattleHealPct(pct) => self.post_battle_heal_pct += pct,
            ModifierEffect::Hook { event, effect } => {
                self.hooks
                    .subscribe(*event, Arc::new(ContentHook::new(source, effect.clone())));
            }
        }
    }

    pub fn apply_all<'a>(&mut self, source: &str, effects: impl IntoIterator<Item = &'a ModifierEffect>) {
        for effect in effects {
            self.apply(source, effect);
        }
    }

    /// Total additive bonus a given character receives for one stat.
    pub fn bonus_for(&self, character_id: &str, stat: StatKey) -> i32 {
        let shared = self.stat_bonuses.get(&stat).copied().unwrap_or(0);
        let personal = self
            .character_bonuses
            .get(character_id)
            .and_then(|bonuses| bonuses.get(&stat))
            .copied()
            .unwrap_or(0);
        shared + personal
    }

    /// Add every applicable stat bonus to a party member's stat block.
    pub fn apply_stat_bonuses(&self, character_id: &str, stats: &mut Stats) {
        for stat in StatKey::iter() {
            stats.add(stat, self.bonus_for(character_id, stat));
        }
    }

    pub fn validate(&self) -> RunContextResult<()> {
        let checks = [
            ("damage_multiplier", self.damage_multiplier),
            ("acorn_drop_multiplier", self.acorn_drop_multiplier),
        ];
        for (name, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(RunContextError::InvalidMultiplier { name, value });
            }
        }
        for (name, value) in [("crit_bonus", self.crit_bonus), ("dodge_bonus", self.dodge_bonus)] {
            if !value.is_finite() {
                return Err(RunContextError::InvalidMultiplier { name, value });
            }
        }
        Ok(())
    }
}
