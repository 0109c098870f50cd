//! Role strategies for party members.

use crate::ai::{attempt, known, moves_of_kind, pick, pick_any, MoveStrategy, Situation};
use crate::battle::context::MoveContext;
use schema::{MoveKind, PartyRole};

pub fn for_role(role: PartyRole) -> &'static dyn MoveStrategy {
    match role {
        PartyRole::Tank => &Tank,
        PartyRole::Healer => &Healer,
        PartyRole::DamageDealer => &DamageDealer,
        PartyRole::SupportLeader => &SupportLeader,
        PartyRole::Generic => &GenericParty,
    }
}

/// Holds the line: fortress when nearly down, shields the critical, draws
/// fire when the party is hurting.
pub struct Tank;

impl MoveStrategy for Tank {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        attempt(ctx, s.health_ratio < 0.2, "fortress_mode", 0.8)
            .or_else(|| attempt(ctx, s.critical > 0, "protect", 0.9))
            .or_else(|| attempt(ctx, s.opponents > 1 && s.wounded > 1, "taunt", 0.7))
            .or_else(|| attempt(ctx, s.wounded >= 2, "blueprint_guard", 0.6))
            .or_else(|| known(ctx, "wing_slam"))
    }
}

pub struct Healer;

impl MoveStrategy for Healer {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        let urgent = s.critical > 0;
        if let Some(choice) = attempt(ctx, urgent, "life_burst", 0.95)
            .or_else(|| attempt(ctx, urgent, "healing_rain", 0.85))
            .or_else(|| attempt(ctx, s.wounded >= 2, "healing_rain", 0.8))
            .or_else(|| attempt(ctx, s.low > 0, "petal_shield", 0.7))
        {
            return Some(choice);
        }
        if s.wounded == 0 {
            if let Some(attack) = known(ctx, "glow_burst").or_else(|| known(ctx, "sparkle_spit")) {
                return Some(attack);
            }
        }
        if s.wounded > 0 {
            return known(ctx, "healing_rain");
        }
        None
    }
}

pub struct DamageDealer;

impl MoveStrategy for DamageDealer {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        attempt(ctx, s.opponents > 1, "shadow_storm", 0.8)
            .or_else(|| attempt(ctx, true, "void_strike", 0.7))
            .or_else(|| attempt(ctx, true, "assassinate", 0.6))
            .or_else(|| attempt(ctx, true, "shadow_bolt", 0.5))
            .or_else(|| known(ctx, "acorn_toss"))
    }
}

/// Buffs early and when the party is hurt, storms crowds, strikes otherwise.
pub struct SupportLeader;

impl MoveStrategy for SupportLeader {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        attempt(ctx, s.opponents > 2, "battle_cry", 0.8)
            .or_else(|| attempt(ctx, s.wounded >= 2, "rally", 0.7))
            .or_else(|| attempt(ctx, s.round <= 2, "inspire", 0.6))
            .or_else(|| attempt(ctx, s.opponents > 1, "storm_call", 0.7))
            .or_else(|| attempt(ctx, s.wounded > 0, "wind_wall", 0.5))
            .or_else(|| attempt(ctx, true, "alpha_strike", 0.6))
            .or_else(|| attempt(ctx, true, "precision_strike", 0.5))
            .or_else(|| known(ctx, "peck"))
    }
}

/// Support moves while anyone is wounded, otherwise anything.
pub struct GenericParty;

impl MoveStrategy for GenericParty {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        if s.wounded > 0 {
            let support = moves_of_kind(ctx, MoveKind::Support);
            if let Some(choice) = pick(ctx, &support) {
                return Some(choice);
            }
        }
        pick_any(ctx)
    }
}
