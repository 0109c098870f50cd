//! Move selection for every combatant.
//!
//! Strategies are looked up from the combatant's `AiProfile`, never from its
//! display name. A bespoke strategy may decline with `None`, in which case the
//! profile's fallback strategy picks instead. Fallbacks always pick something
//! when the combatant knows at least one move.

pub mod enemy;
pub mod party;

use crate::battle::context::MoveContext;
use crate::combatant::{Combatant, Side};
use schema::{AiProfile, MoveDef, MoveKind};
use std::sync::Arc;
use tracing::trace;

/// Health-ratio buckets for living party members.
pub const WOUNDED: f64 = 0.8;
pub const LOW: f64 = 0.5;
pub const CRITICAL: f64 = 0.25;

/// A trait for anything that can pick a move for the acting combatant.
pub trait MoveStrategy: Send + Sync {
    /// A move id, or `None` to defer to the fallback strategy.
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String>;
}

/// Strategy pair for a profile: the bespoke one and its fallback.
pub fn strategies_for(profile: AiProfile) -> (&'static dyn MoveStrategy, &'static dyn MoveStrategy) {
    match profile {
        AiProfile::Party(role) => (party::for_role(role), &party::GenericParty),
        AiProfile::Enemy { species, temperament } => {
            let fallback = enemy::for_temperament(temperament);
            (species.map(enemy::for_species).unwrap_or(fallback), fallback)
        }
    }
}

/// Pick the acting combatant's move. `None` only when it knows no moves.
pub fn choose_move(ctx: &mut MoveContext<'_>) -> Option<Arc<MoveDef>> {
    let actor = ctx.source();
    if actor.definition.moves.is_empty() {
        return None;
    }
    let (primary, fallback) = strategies_for(actor.definition.ai);
    let move_id = primary.choose(ctx).or_else(|| fallback.choose(ctx))?;
    trace!(actor = %actor.id, move_id = %move_id, "ai picked move");
    Some(ctx.library.resolve_move(&move_id))
}

/// Snapshot of the field from the acting combatant's point of view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Situation {
    pub health_ratio: f64,
    pub round: u32,
    /// Living party members below each bucket, the actor included when it is
    /// a party member.
    pub wounded: usize,
    pub low: usize,
    pub critical: usize,
    /// Living opponents of the actor.
    pub opponents: usize,
    /// Living members of the enemy side.
    pub enemy_side: usize,
}

impl Situation {
    pub fn read(ctx: &MoveContext<'_>) -> Self {
        let actor = ctx.source();
        let party: Vec<&Combatant> = ctx.living_on(Side::Ally).collect();
        let below = |threshold: f64| party.iter().filter(|c| c.health_ratio() < threshold).count();
        Self {
            health_ratio: actor.health_ratio(),
            round: ctx.round,
            wounded: below(WOUNDED),
            low: below(LOW),
            critical: below(CRITICAL),
            opponents: ctx.foes().len(),
            enemy_side: ctx.living_on(Side::Enemy).count(),
        }
    }
}

/// Try a move: every condition must hold and the actor must know it before
/// the roll is drawn.
pub(crate) fn attempt(ctx: &mut MoveContext<'_>, condition: bool, move_id: &str, chance: f64) -> Option<String> {
    if condition && ctx.source().definition.knows(move_id) && ctx.rng.chance(chance) {
        Some(move_id.to_string())
    } else {
        None
    }
}

/// The move, without a roll, when the actor knows it.
pub(crate) fn known(ctx: &MoveContext<'_>, move_id: &str) -> Option<String> {
    ctx.source()
        .definition
        .knows(move_id)
        .then(|| move_id.to_string())
}

/// Known moves whose definition satisfies `filter`. Unknown ids count as
/// fallback attacks.
pub(crate) fn moves_where(ctx: &MoveContext<'_>, filter: impl Fn(Option<&MoveDef>) -> bool) -> Vec<String> {
    ctx.source()
        .definition
        .moves
        .iter()
        .filter(|id| filter(ctx.library.move_def(id).as_deref()))
        .cloned()
        .collect()
}

pub(crate) fn moves_of_kind(ctx: &MoveContext<'_>, kind: MoveKind) -> Vec<String> {
    moves_where(ctx, |def| def.map(|d| d.kind).unwrap_or(MoveKind::Attack) == kind)
}

/// Uniform pick among `ids`.
pub(crate) fn pick(ctx: &mut MoveContext<'_>, ids: &[String]) -> Option<String> {
    ctx.rng.choose(ids).cloned()
}

/// Uniform pick among every move the actor knows.
pub(crate) fn pick_any(ctx: &mut MoveContext<'_>) -> Option<String> {
    let moves = &ctx.source().definition.moves;
    pick(ctx, moves)
}
