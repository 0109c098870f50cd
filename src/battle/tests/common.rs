use crate::battle::action::BattleAction;
use crate::battle::engine::{BattleEngine, BattleOutcome, BattleSetup};
use crate::battle::status;
use crate::combatant::{Combatant, Side};
use crate::config::EngineOptions;
use crate::content::ContentLibrary;
use crate::modifiers::BattleModifiers;
use schema::{CombatantDef, Stats, StatusEffect};
use std::sync::Arc;

/// A builder for test combatants backed by the standard content tables.
///
/// # Example
/// ```
/// let orvus = TestCombatantBuilder::ally("orvus")
///     .with_id("ally_1")
///     .with_health(10)
///     .build();
/// ```
pub struct TestCombatantBuilder {
    definition: Arc<CombatantDef>,
    side: Side,
    id: Option<String>,
    health: Option<i32>,
    speed: Option<i32>,
    stats: Option<Stats>,
    moves: Option<Vec<String>>,
    statuses: Vec<StatusEffect>,
}

impl TestCombatantBuilder {
    fn new(definition: Arc<CombatantDef>, side: Side) -> Self {
        Self {
            definition,
            side,
            id: None,
            health: None,
            speed: None,
            stats: None,
            moves: None,
            statuses: Vec::new(),
        }
    }

    /// A party member from the character table.
    pub fn ally(character_id: &str) -> Self {
        let definition = match library().character(character_id) {
            Ok(def) => def,
            Err(err) => panic!("Failed to load character {}: {}", character_id, err),
        };
        Self::new(definition, Side::Ally)
    }

    /// An enemy from the enemy or spawn tables.
    pub fn enemy(enemy_id: &str) -> Self {
        let definition = match library().enemy(enemy_id) {
            Ok(def) => def,
            Err(err) => panic!("Failed to load enemy {}: {}", enemy_id, err),
        };
        Self::new(definition, Side::Enemy)
    }

    /// Overrides the combatant id. Defaults to the definition id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Sets current health. If not set, health will be max.
    pub fn with_health(mut self, health: i32) -> Self {
        self.health = Some(health);
        self
    }

    pub fn with_speed(mut self, speed: i32) -> Self {
        self.speed = Some(speed);
        self
    }

    /// Replaces the whole stat block, max health included.
    pub fn with_stats(mut self, stats: Stats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Replaces the known moves.
    pub fn with_moves(mut self, moves: &[&str]) -> Self {
        self.moves = Some(moves.iter().map(|id| id.to_string()).collect());
        self
    }

    /// Attaches a status through the standard attach path.
    pub fn with_status(mut self, effect: StatusEffect) -> Self {
        self.statuses.push(effect);
        self
    }

    pub fn build(self) -> Combatant {
        let definition = match self.moves {
            Some(moves) => {
                let mut def = (*self.definition).clone();
                def.moves = moves;
                Arc::new(def)
            }
            None => self.definition,
        };
        let id = self.id.unwrap_or_else(|| definition.id.clone());
        let mut combatant = Combatant::new(id, definition, self.side);
        if let Some(stats) = self.stats {
            combatant.stats = stats;
        }
        if let Some(speed) = self.speed {
            combatant.stats.speed = speed;
        }
        if let Some(health) = self.health {
            combatant.set_health(health);
        }
        for effect in self.statuses {
            status::attach(&mut combatant, effect);
        }
        combatant
    }
}

pub fn library() -> &'static ContentLibrary {
    match ContentLibrary::standard() {
        Ok(library) => library,
        Err(err) => panic!("Failed to load standard content: {}", err),
    }
}

/// A setup with one party member and one enemy, using content ids and the
/// `ally_0` / `enemy_0` id scheme.
pub fn create_test_battle(character_id: &str, enemy_id: &str, seed: u32) -> BattleSetup {
    BattleSetup {
        allies: vec![TestCombatantBuilder::ally(character_id).with_id("ally_0").build()],
        enemies: vec![TestCombatantBuilder::enemy(enemy_id).with_id("enemy_0").build()],
        seed,
    }
}

/// Builds an engine over `setup`, panicking on a rejected setup.
pub fn create_engine<'a>(
    setup: BattleSetup,
    modifiers: &'a BattleModifiers,
    options: EngineOptions,
) -> BattleEngine<'a> {
    match BattleEngine::new(setup, modifiers, library(), options) {
        Ok(engine) => engine,
        Err(err) => panic!("Battle setup rejected: {}", err),
    }
}

/// Runs `setup` to completion with default options.
pub fn run_battle(setup: BattleSetup, modifiers: &BattleModifiers) -> BattleOutcome {
    create_engine(setup, modifiers, EngineOptions::default()).run()
}

/// Print the log for debugging failing scenarios.
pub fn print_log(label: &str, outcome: &BattleOutcome) {
    println!("--- {} ---", label);
    for action in &outcome.actions {
        println!("  [{:?}] {} -> {:?}: {}", action.kind, action.source, action.targets, action.message);
    }
}

/// Entries logged during `round`, between its marker and the next one.
pub fn round_actions(actions: &[BattleAction], round: u32) -> Vec<&BattleAction> {
    let marker = format!("--- Round {} ---", round);
    actions
        .iter()
        .skip_while(|action| action.message != marker)
        .skip(1)
        .take_while(|action| !action.is_round_marker())
        .collect()
}

/// A party member strong enough to finish a common enemy in one hit and
/// act first every round.
pub fn overpowered_glider(moves: &[&str]) -> Combatant {
    TestCombatantBuilder::ally("player")
        .with_id("ally_0")
        .with_stats(Stats {
            strength: 50,
            speed: 20,
            magic: 5,
            defense: 50,
            luck: 5,
            health: 500,
            max_health: 500,
        })
        .with_moves(moves)
        .build()
}

/// An enemy that never acts.
pub fn idle_enemy(enemy_id: &str) -> Combatant {
    TestCombatantBuilder::enemy(enemy_id)
        .with_id("enemy_0")
        .with_moves(&[])
        .build()
}
