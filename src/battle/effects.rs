//! Interpreter for move effect descriptors.
//!
//! Resolution turns a `MoveDef` into template `BattleAction`s. Templates keep
//! `source` empty and usually leave `targets` empty too; the engine fills both
//! from the acting combatant and the move's target mode just before the
//! actions are processed. Descriptors that pick their own recipients
//! (`AfflictEach`, `HealEach`, `ProtectWeakest`) fill `targets` themselves.

use crate::battle::action::{ActionKind, BattleAction};
use crate::battle::context::MoveContext;
use crate::combatant::Combatant;
use ordered_float::OrderedFloat;
use schema::{
    CombatantDef, EffectDescriptor, HealAmount, MoveDef, MoveKind, Polarity, Relation, StatKey,
    StatusEffect, TargetMode,
};
use tracing::{trace, warn};

/// Placeholder the engine substitutes once targets are known.
pub const TARGET_PLACEHOLDER: &str = "{target}";

/// A weak generic attack standing in for a move id the content does not know.
pub fn fallback_move(id: &str) -> MoveDef {
    let name = title_case(id);
    MoveDef {
        id: id.to_string(),
        name: name.clone(),
        kind: MoveKind::Attack,
        power: Some(10),
        scaling: Some(StatKey::Strength),
        target: TargetMode::Enemy,
        description: format!("{} - A basic attack", name),
        effects: vec![EffectDescriptor::Strike {
            message: format!("{} hits!", name),
        }],
    }
}

fn title_case(id: &str) -> String {
    id.split('_')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Message template with its placeholder values.
struct Render<'a> {
    source: &'a str,
    target: Option<&'a str>,
    amount: Option<i32>,
    level: Option<i32>,
}

impl<'a> Render<'a> {
    fn source(source: &'a Combatant) -> Self {
        Self {
            source: source.name(),
            target: None,
            amount: None,
            level: None,
        }
    }

    fn target(mut self, target: &'a Combatant) -> Self {
        self.target = Some(target.name());
        self
    }

    fn amount(mut self, amount: i32) -> Self {
        self.amount = Some(amount);
        self
    }

    fn level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    fn apply(&self, template: &str) -> String {
        let mut message = template.replace("{source}", self.source);
        if let Some(target) = self.target {
            message = message.replace(TARGET_PLACEHOLDER, target);
        }
        if let Some(amount) = self.amount {
            message = message.replace("{amount}", &amount.to_string());
        }
        if let Some(level) = self.level {
            message = message.replace("{level}", &level.to_string());
        }
        message
    }
}

/// Evaluate every descriptor of `move_def` in order.
pub fn resolve_move(move_def: &MoveDef, ctx: &mut MoveContext<'_>) -> Vec<BattleAction> {
    let mut actions = Vec::new();
    for descriptor in &move_def.effects {
        resolve_descriptor(move_def, descriptor, ctx, &mut actions);
    }
    trace!(move_id = %move_def.id, count = actions.len(), "move resolved");
    actions
}

fn status_kind(polarity: Polarity) -> ActionKind {
    match polarity {
        Polarity::Buff => ActionKind::Buff,
        Polarity::Debuff => ActionKind::Debuff,
    }
}

fn bound_status(status: &StatusEffect, bind_to_source: bool, source: &Combatant) -> StatusEffect {
    let mut status = status.clone();
    if bind_to_source {
        status.forced_target = Some(source.id.clone());
    }
    status
}

fn lookup_spawns(ids: &[String], ctx: &MoveContext<'_>) -> Vec<CombatantDef> {
    ids.iter()
        .filter_map(|id| match ctx.library.enemy(id) {
            Ok(def) => Some(def.as_ref().clone()),
            Err(err) => {
                warn!(spawn_id = %id, error = %err, "skipping unknown spawn");
                None
            }
        })
        .collect()
}

fn resolve_descriptor(
    move_def: &MoveDef,
    descriptor: &EffectDescriptor,
    ctx: &mut MoveContext<'_>,
    actions: &mut Vec<BattleAction>,
) {
    let source = ctx.source();
    match descriptor {
        EffectDescriptor::Strike { message } => {
            let message = Render::source(source).apply(message);
            actions.push(BattleAction::template(
                ActionKind::Damage,
                move_def.power.unwrap_or(0),
                message,
            ));
        }
        EffectDescriptor::Announce { message } => {
            let message = Render::source(source).apply(message);
            actions.push(BattleAction::template(ActionKind::Special, 0, message));
        }
        EffectDescriptor::Afflict {
            status,
            message,
            polarity,
            chance,
            bind_to_source,
        } => {
            if let Some(chance) = chance {
                if !ctx.rng.chance(*chance) {
                    return;
                }
            }
            let status = bound_status(status, *bind_to_source, source);
            let message = Render::source(source).apply(message);
            actions.push(
                BattleAction::template(status_kind(*polarity), status.delta, message).with_status(status),
            );
        }
        EffectDescriptor::AfflictEach {
            side,
            status,
            message,
            polarity,
            include_source,
            bind_to_source,
        } => {
            let members = match side {
                Relation::Friendly => ctx.friends(*include_source),
                Relation::Hostile => ctx.foes(),
            };
            for member in members {
                let status = bound_status(status, *bind_to_source, source);
                let message = Render::source(source).target(member).apply(message);
                actions.push(
                    BattleAction::template(status_kind(*polarity), status.delta, message)
                        .with_status(status)
                        .with_targets(vec![member.id.clone()]),
                );
            }
        }
        EffectDescriptor::Heal { amount, message } => {
            let value = match amount {
                HealAmount::Flat(value) => *value,
                HealAmount::PercentOfMax(pct) => source.stats.max_health * pct / 100,
            };
            let message = Render::source(source).amount(value).apply(message);
            actions.push(BattleAction::template(ActionKind::Heal, value, message));
        }
        EffectDescriptor::HealEach {
            percent_of_max,
            magic_scale,
            message,
            wounded_only,
            idle_message,
        } => {
            let recipients: Vec<&Combatant> = ctx
                .friends(true)
                .into_iter()
                .filter(|member| !*wounded_only || !member.stats.is_full_health())
                .collect();
            if recipients.is_empty() {
                if let Some(idle) = idle_message {
                    let message = Render::source(source).apply(idle);
                    actions.push(
                        BattleAction::template(ActionKind::Heal, 0, message)
                            .with_targets(vec![source.id.clone()]),
                    );
                }
                return;
            }
            for member in recipients {
                let value = member.stats.max_health * percent_of_max / 100 + source.stats.magic * magic_scale;
                let message = Render::source(source).target(member).amount(value).apply(message);
                actions.push(
                    BattleAction::template(ActionKind::Heal, value, message).with_targets(vec![member.id.clone()]),
                );
            }
        }
        EffectDescriptor::ProtectWeakest { status, message } => {
            let weakest = ctx
                .friends(false)
                .into_iter()
                .min_by_key(|member| OrderedFloat(member.health_ratio()));
            let Some(weakest) = weakest else {
                return;
            };
            let message = Render::source(source).target(weakest).apply(message);
            actions.push(
                BattleAction::template(ActionKind::Buff, status.delta, message)
                    .with_status(status.clone())
                    .with_targets(vec![weakest.id.clone()]),
            );
        }
        EffectDescriptor::Split {
            threshold,
            into,
            message,
            otherwise,
        } => {
            if source.health_ratio() <= *threshold {
                let mut action = BattleAction::template(ActionKind::Special, 0, Render::source(source).apply(message));
                action.split_into = lookup_spawns(into, ctx);
                actions.push(action);
            } else {
                for fallback in otherwise {
                    resolve_descriptor(move_def, fallback, ctx, actions);
                }
            }
        }
        EffectDescriptor::Summon {
            threshold,
            max_allies,
            spawn,
            message,
            otherwise,
        } => {
            let side_count = ctx.friends(true).len();
            if source.health_ratio() < *threshold && side_count <= *max_allies {
                let mut action = BattleAction::template(ActionKind::Special, 0, Render::source(source).apply(message));
                action.summons = lookup_spawns(spawn, ctx);
                actions.push(action);
            } else {
                for fallback in otherwise {
                    resolve_descriptor(move_def, fallback, ctx, actions);
                }
            }
        }
        EffectDescriptor::Rage {
            status,
            per_level,
            thresholds,
            message,
        } => {
            let ratio = source.health_ratio();
            let level = 1 + thresholds.iter().filter(|threshold| ratio < **threshold).count() as i32;
            let delta = per_level * level;
            let mut rage = status.clone();
            rage.delta = delta;
            rage.name = format!("{} {}", status.name, level);
            if let Some(stat) = rage.stat {
                rage.description = format!("{:+} {}", delta, stat);
            }
            let message = Render::source(source).level(level).amount(delta).apply(message);
            actions.push(BattleAction::template(ActionKind::Buff, delta, message).with_status(rage));
        }
    }
}
