use crate::battle::status;
use crate::combatant::{Combatant, Side};
use schema::TargetMode;
use std::cmp::Reverse;

/// Ids of living combatants in acting order: speed descending, allies before
/// enemies on equal speed, working-list order after that.
///
/// Ids rather than indices, because a split can reshape the working list
/// while the round is still in progress.
pub fn turn_order(combatants: &[Combatant]) -> Vec<String> {
    let mut living: Vec<&Combatant> = combatants.iter().filter(|c| c.is_alive()).collect();
    living.sort_by_key(|c| (Reverse(c.stats.speed), c.side == Side::Enemy));
    living.into_iter().map(|c| c.id.clone()).collect()
}

/// Resolve the recipients of a move from `actor`'s point of view.
pub fn select_targets(combatants: &[Combatant], actor: &Combatant, mode: TargetMode) -> Vec<String> {
    if mode.is_offensive() {
        if let Some(forced) = status::forced_target(actor) {
            if combatants.iter().any(|c| c.id == forced && c.is_alive()) {
                return vec![forced.to_string()];
            }
        }
    }

    let opponents = || {
        combatants
            .iter()
            .filter(|c| c.side != actor.side && c.is_alive())
            .map(|c| c.id.clone())
    };
    let teammates = || {
        combatants
            .iter()
            .filter(|c| c.side == actor.side && c.id != actor.id && c.is_alive())
            .map(|c| c.id.clone())
    };

    match mode {
        TargetMode::Enemy => opponents().take(1).collect(),
        TargetMode::AllEnemies => opponents().collect(),
        TargetMode::Ally => teammates().take(1).collect(),
        TargetMode::AllAllies => teammates().collect(),
        TargetMode::User => vec![actor.id.clone()],
    }
}
