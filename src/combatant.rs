use schema::{CombatantDef, Stats, StatusEffect};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Ally,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Ally => Side::Enemy,
            Side::Enemy => Side::Ally,
        }
    }
}

/// One battle participant with live stats and attached statuses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub definition: Arc<CombatantDef>,
    pub stats: Stats,
    pub statuses: Vec<StatusEffect>,
    pub side: Side,
    pub last_move: Option<String>,
}

impl Combatant {
    /// Fresh combatant at full health with the definition's base stats.
    pub fn new(id: impl Into<String>, definition: Arc<CombatantDef>, side: Side) -> Self {
        let mut stats = definition.base;
        stats.health = stats.max_health;
        Self {
            id: id.into(),
            definition,
            stats,
            statuses: Vec::new(),
            side,
            last_move: None,
        }
    }

    pub fn with_health(mut self, health: i32) -> Self {
        self.set_health(health);
        self
    }

    pub fn name(&self) -> &str {
        &self.definition.name
    }

    pub fn is_alive(&self) -> bool {
        self.stats.is_alive()
    }

    pub fn is_enemy(&self) -> bool {
        self.side == Side::Enemy
    }

    pub fn health_ratio(&self) -> f64 {
        self.stats.health_ratio()
    }

    pub fn set_health(&mut self, health: i32) {
        self.stats.health = health.clamp(0, self.stats.max_health.max(0));
    }

    /// Removes up to `amount` health and returns what was actually removed.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let before = self.stats.health;
        self.set_health(before - amount.max(0));
        before - self.stats.health
    }

    /// Restores up to `amount` health and returns what was actually restored.
    pub fn restore_health(&mut self, amount: i32) -> i32 {
        let before = self.stats.health;
        self.set_health(before + amount.max(0));
        self.stats.health - before
    }

    pub fn status(&self, id: &str) -> Option<&StatusEffect> {
        self.statuses.iter().find(|status| status.id == id)
    }

    pub fn has_status(&self, id: &str) -> bool {
        self.status(id).is_some()
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}/{} HP",
            self.name(),
            self.id,
            self.stats.health,
            self.stats.max_health
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use schema::{AiProfile, PartyRole, Tier};

    fn glider() -> Arc<CombatantDef> {
        Arc::new(CombatantDef {
            id: "player".into(),
            name: "Glider".into(),
            base: Stats::new(5, 5, 5, 5, 5, 60),
            moves: vec!["peck".into()],
            ai: AiProfile::Party(PartyRole::SupportLeader),
            passive: None,
            tier: Tier::Common,
            description: String::new(),
        })
    }

    #[test]
    fn restore_reports_the_clamped_delta() {
        let mut glider = Combatant::new("ally_0", glider(), Side::Ally).with_health(55);
        assert_eq!(glider.restore_health(20), 5);
        assert_eq!(glider.stats.health, 60);
    }

    #[test]
    fn damage_stops_at_zero() {
        let mut glider = Combatant::new("ally_0", glider(), Side::Ally).with_health(10);
        assert_eq!(glider.take_damage(25), 10);
        assert!(!glider.is_alive());
    }

    proptest! {
        #[test]
        fn health_stays_within_bounds(start in -100i32..200, changes in prop::collection::vec(-80i32..80, 0..40)) {
            let mut glider = Combatant::new("ally_0", glider(), Side::Ally).with_health(start);
            for change in changes {
                if change < 0 {
                    glider.take_damage(-change);
                } else {
                    glider.restore_health(change);
                }
                prop_assert!(glider.stats.health >= 0);
                prop_assert!(glider.stats.health <= glider.stats.max_health);
            }
        }
    }
}
