use crate::battle::action::BattleAction;
use crate::combatant::Combatant;
use serde::{Deserialize, Serialize};

/// Where a battle stands, for a host renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSnapshot {
    pub round: u32,
    pub combatants: Vec<Combatant>,
    pub actions: Vec<BattleAction>,
    pub is_over: bool,
}

/// Synchronous notifications from the engine.
///
/// All methods default to doing nothing. The engine never waits on an
/// observer; pacing belongs to `battle::playback`.
pub trait BattleObserver {
    /// An action is about to be processed. Crit and miss flags are not set yet.
    fn on_action_start(&mut self, _action: &BattleAction) {}

    /// `combatant_id` finished its turn.
    fn on_turn_end(&mut self, _combatant_id: &str) {}

    /// A round finished, including status decay and round-end effects.
    fn on_state_update(&mut self, _snapshot: &BattleSnapshot) {}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl BattleObserver for NoopObserver {}

/// Records every notification, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingObserver {
    pub started: Vec<String>,
    pub turns: Vec<String>,
    pub rounds: Vec<u32>,
}

impl BattleObserver for RecordingObserver {
    fn on_action_start(&mut self, action: &BattleAction) {
        self.started.push(action.message.clone());
    }

    fn on_turn_end(&mut self, combatant_id: &str) {
        self.turns.push(combatant_id.to_string());
    }

    fn on_state_update(&mut self, snapshot: &BattleSnapshot) {
        self.rounds.push(snapshot.round);
    }
}
