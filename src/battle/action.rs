use schema::{CombatantDef, StatusEffect};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Action id used for engine and relic entries in the log.
pub const SYSTEM_SOURCE: &str = "system";
pub const RELIC_SOURCE: &str = "relic";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    Damage,
    Heal,
    Buff,
    Debuff,
    Special,
}

/// The unit of mutation applied to combatants, and the permanent log record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleAction {
    pub kind: ActionKind,
    pub source: String,
    pub targets: Vec<String>,
    pub value: i32,
    pub message: String,
    #[serde(default)]
    pub crit: bool,
    #[serde(default)]
    pub miss: bool,
    #[serde(default)]
    pub status: Option<StatusEffect>,
    /// Replacement combatants for the source.
    #[serde(default)]
    pub split_into: Vec<CombatantDef>,
    /// Reinforcements joining the source's side.
    #[serde(default)]
    pub summons: Vec<CombatantDef>,
}

impl BattleAction {
    /// A template with identity fields left empty for the engine to fill.
    pub fn template(kind: ActionKind, value: i32, message: impl Into<String>) -> Self {
        Self {
            kind,
            source: String::new(),
            targets: Vec::new(),
            value,
            message: message.into(),
            crit: false,
            miss: false,
            status: None,
            split_into: Vec::new(),
            summons: Vec::new(),
        }
    }

    pub fn system(message: impl Into<String>) -> Self {
        let mut action = Self::template(ActionKind::Special, 0, message);
        action.source = SYSTEM_SOURCE.to_string();
        action
    }

    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_targets(mut self, targets: Vec<String>) -> Self {
        self.targets = targets;
        self
    }

    pub fn is_round_marker(&self) -> bool {
        self.source == SYSTEM_SOURCE && self.message.starts_with("--- Round")
    }
}

impl fmt::Display for BattleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Ordered, append-only record of every processed action.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionLog {
    actions: Vec<BattleAction>,
}

impl ActionLog {
    pub fn new() -> Self {
        Self { actions: Vec::new() }
    }

    pub fn push(&mut self, action: BattleAction) {
        self.actions.push(action);
    }

    pub fn actions(&self) -> &[BattleAction] {
        &self.actions
    }

    pub fn into_actions(self) -> Vec<BattleAction> {
        self.actions
    }
}
