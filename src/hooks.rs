//! Ordered hook subscriptions for the battle loop.

use crate::battle::status;
use crate::combatant::{Combatant, Side};
use crate::rng::SeededRng;
use schema::{HookEffect, HookEvent, StatKey, StatusEffect};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use strum::IntoEnumIterator;
use tracing::debug;

/// Status id refreshed by the missing-health strength hook.
pub const BERSERK_STATUS: &str = "berserker_rage";

/// A side-effecting callback installed by a relic or skill.
pub trait BattleHook: Send + Sync + fmt::Debug {
    /// Name of the relic or skill that installed this hook.
    fn source(&self) -> &str;

    fn fire(&self, ctx: &mut HookContext<'_>);
}

/// Trigger counts of counting hooks, keyed by subscription slot. Carried by
/// the run from one battle into the next.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookState {
    triggers: BTreeMap<String, u32>,
}

impl HookState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot_key(event: HookEvent, slot: usize) -> String {
        format!("{}/{}", event, slot)
    }

    pub fn triggers(&self, key: &str) -> u32 {
        self.triggers.get(key).copied().unwrap_or(0)
    }

    /// Count one more trigger and return the new total.
    pub fn bump(&mut self, key: &str) -> u32 {
        let count = self.triggers.entry(key.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

/// Mutable view of the battle handed to a hook.
pub struct HookContext<'a> {
    pub event: HookEvent,
    pub round: u32,
    pub combatants: &'a mut Vec<Combatant>,
    pub rng: &'a mut SeededRng,
    /// Combatant whose action triggered the hook, if any.
    pub actor: Option<String>,
    pub bonus_acorns: &'a mut u32,
    pub next_attack_factor: &'a mut Option<f64>,
    /// Health removed from party members by hooks.
    pub ally_damage_taken: &'a mut i32,
    pub state: &'a mut HookState,
    /// Subscription slot of the hook currently firing.
    pub slot: String,
}

impl HookContext<'_> {
    /// Indices of living party members, in working-list order.
    pub fn living_party(&self) -> Vec<usize> {
        self.combatants
            .iter()
            .enumerate()
            .filter(|(_, c)| c.side == Side::Ally && c.is_alive())
            .map(|(index, _)| index)
            .collect()
    }

    /// The triggering combatant when it is a living party member, otherwise
    /// the first living party member.
    pub fn actor_or_first_ally(&self) -> Option<usize> {
        let actor = self.actor.as_deref().and_then(|id| {
            self.combatants
                .iter()
                .position(|c| c.id == id && c.side == Side::Ally && c.is_alive())
        });
        actor.or_else(|| self.living_party().first().copied())
    }

    /// Attach through the standard path so the stat delta is applied once and
    /// reversed once.
    pub fn attach(&mut self, index: usize, effect: StatusEffect) {
        if let Some(combatant) = self.combatants.get_mut(index) {
            status::attach(combatant, effect);
        }
    }

    pub fn heal(&mut self, index: usize, amount: i32) -> i32 {
        self.combatants
            .get_mut(index)
            .map(|combatant| combatant.restore_health(amount))
            .unwrap_or(0)
    }

    /// Removes up to `amount` health and returns what was removed. Party
    /// losses count against a perfect victory.
    pub fn damage(&mut self, index: usize, amount: i32) -> i32 {
        let Some(combatant) = self.combatants.get_mut(index) else {
            return 0;
        };
        let removed = combatant.take_damage(amount);
        if combatant.side == Side::Ally {
            *self.ally_damage_taken += removed;
        }
        removed
    }

    /// Rolls `chance`. Certain and impossible rolls do not consume a draw.
    pub fn roll(&mut self, chance: f64) -> bool {
        if chance >= 1.0 {
            return true;
        }
        if chance <= 0.0 {
            return false;
        }
        self.rng.chance(chance)
    }

    pub fn random_stat(&mut self) -> StatKey {
        let stats: Vec<StatKey> = StatKey::iter().collect();
        self.rng.choose(&stats).copied().unwrap_or(StatKey::Strength)
    }
}

/// Per-event subscriber lists, invoked in acquisition order.
#[derive(Debug, Clone, Default)]
pub struct HookRegistry {
    subscribers: BTreeMap<HookEvent, Vec<Arc<dyn BattleHook>>>,
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, event: HookEvent, hook: Arc<dyn BattleHook>) {
        self.subscribers.entry(event).or_default().push(hook);
    }

    pub fn subscribers(&self, event: HookEvent) -> &[Arc<dyn BattleHook>] {
        self.subscribers.get(&event).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.subscribers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Interprets a content-authored `HookEffect`.
#[derive(Debug)]
pub struct ContentHook {
    source: String,
    effect: HookEffect,
}

impl ContentHook {
    pub fn new(source: impl Into<String>, effect: HookEffect) -> Self {
        Self {
            source: source.into(),
            effect,
        }
    }
}

fn surge_status(prefix: &str, name_prefix: &str, stat: StatKey, delta: i32, ttl: u32) -> StatusEffect {
    let code = stat.to_string();
    StatusEffect::new(
        format!("{}_{}", prefix, code.to_lowercase()),
        format!("{} {}", name_prefix, code),
        ttl,
    )
    .with_stat(stat, delta)
    .with_description(format!("{:+} {}", delta, code))
}

impl BattleHook for ContentHook {
    fn source(&self) -> &str {
        &self.source
    }

    fn fire(&self, ctx: &mut HookContext<'_>) {
        debug!(source = %self.source, event = %ctx.event, round = ctx.round, "hook fired");
        match &self.effect {
            HookEffect::GrantAcorns { chance, amount } => {
                if ctx.roll(*chance) {
                    *ctx.bonus_acorns += amount;
                }
            }
            HookEffect::HealParty { amount } => {
                for index in ctx.living_party() {
                    ctx.heal(index, *amount);
                }
            }
            HookEffect::HealActor { amount } => {
                if let Some(index) = ctx.actor_or_first_ally() {
                    ctx.heal(index, *amount);
                }
            }
            HookEffect::RandomStatSurge {
                chance,
                amount,
                ttl,
                id_prefix,
                name_prefix,
            } => {
                if ctx.roll(*chance) {
                    let stat = ctx.random_stat();
                    if let Some(index) = ctx.actor_or_first_ally() {
                        ctx.attach(index, surge_status(id_prefix, name_prefix, stat, *amount, *ttl));
                    }
                }
            }
            HookEffect::PartySurge {
                chance,
                amount,
                ttl,
                id_prefix,
                name_prefix,
            } => {
                if ctx.roll(*chance) {
                    for index in ctx.living_party() {
                        for stat in StatKey::iter() {
                            ctx.attach(index, surge_status(id_prefix, name_prefix, stat, *amount, *ttl));
                        }
                    }
                }
            }
            HookEffect::Chaos {
                chance,
                boost,
                penalty,
                ttl,
            } => {
                let party = ctx.living_party();
                if ctx.roll(*chance) {
                    let stat = ctx.random_stat();
                    for index in party {
                        ctx.attach(index, surge_status("chaos_boost", "Chaos", stat, *boost, *ttl));
                    }
                } else {
                    for index in party {
                        for stat in StatKey::iter() {
                            ctx.attach(index, surge_status("chaos_debuff", "Chaos Drain", stat, -penalty, *ttl));
                        }
                    }
                }
            }
            HookEffect::Drain { amount, floor } => {
                for index in ctx.living_party() {
                    let health = ctx.combatants[index].stats.health;
                    let loss = health - (health - amount).max(*floor);
                    if loss > 0 {
                        ctx.damage(index, loss);
                    }
                }
            }
            HookEffect::Berserk { per_missing, ttl } => {
                for index in ctx.living_party() {
                    let combatant = &mut ctx.combatants[index];
                    status::detach(combatant, BERSERK_STATUS);
                    let missing = combatant.stats.max_health - combatant.stats.health;
                    let bonus = if *per_missing > 0 { missing / per_missing } else { 0 };
                    if bonus > 0 {
                        let rage = StatusEffect::new(BERSERK_STATUS, "Berserker Rage", *ttl)
                            .with_stat(StatKey::Strength, bonus)
                            .with_description(format!("+{} STR from missing HP", bonus));
                        status::attach(combatant, rage);
                    }
                }
            }
            HookEffect::EmpowerEveryNth { every, factor } => {
                let slot = ctx.slot.clone();
                let count = ctx.state.bump(&slot);
                if *every > 0 && count % every == 0 {
                    *ctx.next_attack_factor = Some(*factor);
                }
            }
            HookEffect::RecoverPercent { percent } => {
                for index in ctx.living_party() {
                    let base_max = ctx.combatants[index].definition.base.max_health;
                    ctx.heal(index, base_max * percent / 100);
                }
            }
        }
    }
}
