//! Status attach, detach and decay.
//!
//! A status' stat delta is applied exactly once when it attaches and the same
//! stored delta is reversed exactly once when it leaves, whether it expires or
//! is replaced by a newer effect with the same id.

use crate::combatant::Combatant;
use schema::StatusEffect;
use tracing::debug;

pub const STUN: &str = "stun";
pub const SLEEP: &str = "sleep";
pub const TAUNTED: &str = "taunted";
pub const PROTECTED: &str = "protected";

/// Attach `effect`, replacing any effect with the same id. Returns the
/// replaced effect.
pub fn attach(combatant: &mut Combatant, effect: StatusEffect) -> Option<StatusEffect> {
    let replaced = detach(combatant, &effect.id);
    if let Some(stat) = effect.stat {
        combatant.stats.add(stat, effect.delta);
    }
    debug!(target_id = %combatant.id, status = %effect.id, ttl = effect.ttl, "status attached");
    combatant.statuses.push(effect);
    replaced
}

/// Remove the effect with `id`, reversing its stat delta.
pub fn detach(combatant: &mut Combatant, id: &str) -> Option<StatusEffect> {
    let position = combatant.statuses.iter().position(|status| status.id == id)?;
    let effect = combatant.statuses.remove(position);
    if let Some(stat) = effect.stat {
        combatant.stats.add(stat, -effect.delta);
    }
    Some(effect)
}

/// One decay pass: every ttl drops by one and effects reaching zero detach.
/// Returns the expired effects in attach order.
pub fn decay(combatant: &mut Combatant) -> Vec<StatusEffect> {
    let mut expired = Vec::new();
    let mut kept = Vec::with_capacity(combatant.statuses.len());
    for mut effect in combatant.statuses.drain(..) {
        effect.ttl = effect.ttl.saturating_sub(1);
        if effect.ttl == 0 {
            expired.push(effect);
        } else {
            kept.push(effect);
        }
    }
    combatant.statuses = kept;
    for effect in &expired {
        if let Some(stat) = effect.stat {
            combatant.stats.add(stat, -effect.delta);
        }
        debug!(target_id = %combatant.id, status = %effect.id, "status expired");
    }
    expired
}

/// True when the combatant skips its turn outright.
pub fn is_incapacitated(combatant: &Combatant) -> bool {
    combatant.has_status(STUN) || combatant.has_status(SLEEP)
}

/// True when an active effect forbids attack moves.
pub fn prevents_attacks(combatant: &Combatant) -> bool {
    combatant.statuses.iter().any(|status| status.prevents_attack)
}

/// Forced target from a live taunt.
pub fn forced_target(combatant: &Combatant) -> Option<&str> {
    combatant
        .status(TAUNTED)
        .and_then(|status| status.forced_target.as_deref())
}

/// Damage reduction fraction from a live protection effect.
pub fn damage_reduction(combatant: &Combatant) -> Option<f64> {
    combatant.status(PROTECTED).and_then(|status| status.damage_reduction)
}
