use crate::stats::StatKey;
use serde::{Deserialize, Serialize};

/// A timed stat modifier or behavioural flag attached to a combatant.
///
/// The `(stat, delta)` pair is applied once on attach and reversed once on
/// expiry. Behavioural flags are read by the engine while the effect is live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub stat: Option<StatKey>,
    #[serde(default)]
    pub delta: i32,
    /// Remaining status-decay passes before the effect detaches.
    pub ttl: u32,
    #[serde(default)]
    pub description: String,
    /// Combatant id that offensive intent is redirected to.
    #[serde(default)]
    pub forced_target: Option<String>,
    /// Fraction of incoming damage removed, in `[0, 1]`.
    #[serde(default)]
    pub damage_reduction: Option<f64>,
    #[serde(default)]
    pub prevents_attack: bool,
}

impl StatusEffect {
    pub fn new(id: impl Into<String>, name: impl Into<String>, ttl: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            stat: None,
            delta: 0,
            ttl,
            description: String::new(),
            forced_target: None,
            damage_reduction: None,
            prevents_attack: false,
        }
    }

    pub fn with_stat(mut self, stat: StatKey, delta: i32) -> Self {
        self.stat = Some(stat);
        self.delta = delta;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_forced_target(mut self, target: impl Into<String>) -> Self {
        self.forced_target = Some(target.into());
        self
    }

    pub fn with_damage_reduction(mut self, reduction: f64) -> Self {
        self.damage_reduction = Some(reduction);
        self
    }

    pub fn preventing_attacks(mut self) -> Self {
        self.prevents_attack = true;
        self
    }
}
