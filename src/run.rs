//! Run-scoped state: the party roster with carried-over health, the modifier
//! aggregate built from relics and skills, and the run's currency totals.
//!
//! A battle borrows the run's modifiers for its whole duration. Results are
//! merged back afterwards through [`RunState::absorb`].

use crate::battle::engine::{BattleEngine, BattleOutcome, BattleSetup};
use crate::combatant::{Combatant, Side};
use crate::config::{EngineOptions, PartyMemberConfig};
use crate::content::{encounters, ContentLibrary};
use crate::errors::{BattleResult, ContentError, ContentResult};
use crate::hooks::HookState;
use crate::modifiers::BattleModifiers;
use crate::rng::SeededRng;
use schema::{CombatantDef, Stats};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One party member between battles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartySlot {
    pub character: Arc<CombatantDef>,
    pub health: i32,
}

impl PartySlot {
    pub fn max_health(&self) -> i32 {
        self.character.base.max_health
    }
}

#[derive(Debug)]
pub struct RunState {
    pub seed: u32,
    pub party: Vec<PartySlot>,
    pub modifiers: BattleModifiers,
    /// Hook trigger counts carried from battle to battle.
    pub hook_state: HookState,
    pub relics: Vec<String>,
    /// Unlocked skill ids per character id, in unlock order.
    pub skills: BTreeMap<String, Vec<String>>,
    pub acorns: u32,
    pub secondary: u32,
    pub experience: u32,
    pub battles_fought: u32,
    rng: SeededRng,
}

impl RunState {
    pub fn new(seed: u32, party: &[PartyMemberConfig], library: &ContentLibrary) -> ContentResult<Self> {
        let party = party
            .iter()
            .map(|member| {
                let character = library.character(&member.id)?;
                let max = character.base.max_health;
                let health = member.health.unwrap_or(max).clamp(0, max);
                Ok(PartySlot { character, health })
            })
            .collect::<ContentResult<Vec<_>>>()?;

        Ok(Self {
            seed,
            party,
            modifiers: BattleModifiers::new(),
            hook_state: HookState::new(),
            relics: Vec::new(),
            skills: BTreeMap::new(),
            acorns: 0,
            secondary: 0,
            experience: 0,
            battles_fought: 0,
            rng: SeededRng::new(seed),
        })
    }

    /// Base stats of every party member with the current stat bonuses applied.
    pub fn party_stats(&self) -> Vec<Stats> {
        self.party
            .iter()
            .map(|slot| {
                let mut stats = slot.character.base;
                self.modifiers.apply_stat_bonuses(&slot.character.id, &mut stats);
                stats
            })
            .collect()
    }

    /// Acquire a relic and apply its effects. Returns whether any party member
    /// meets the relic's stat requirements; the effects apply either way.
    pub fn add_relic(&mut self, library: &ContentLibrary, relic_id: &str) -> ContentResult<bool> {
        let relic = library.relic(relic_id)?;
        let stats = self.party_stats();
        let met = relic.requirements_met_by_any(stats.iter());
        if !met {
            warn!(relic = %relic.id, "no party member meets the relic's requirements");
        }
        self.modifiers.apply_all(&relic.id, &relic.effects);
        self.relics.push(relic.id.clone());
        info!(relic = %relic.id, requirements_met = met, "relic acquired");
        Ok(met)
    }

    /// Unlock a character skill once its prerequisites are unlocked.
    pub fn unlock_skill(&mut self, library: &ContentLibrary, character: &str, skill_id: &str) -> ContentResult<()> {
        let skill = library.skill(character, skill_id)?;
        let unlocked = self.skills.entry(character.to_string()).or_default();
        if unlocked.contains(&skill.id) {
            debug!(skill = %skill.id, "skill already unlocked");
            return Ok(());
        }
        if !skill.unlockable_with(unlocked) {
            return Err(ContentError::PrerequisitesUnmet(skill.id.clone()));
        }
        unlocked.push(skill.id.clone());
        self.modifiers.apply_all(&skill.id, &skill.effects);
        info!(character, skill = %skill.id, "skill unlocked");
        Ok(())
    }

    /// The generated line-up for the next battle of this run.
    pub fn next_encounter(&mut self, library: &ContentLibrary) -> BattleResult<Vec<Arc<CombatantDef>>> {
        encounters::generate_encounter(library, self.battles_fought + 1, &mut self.rng)
    }

    /// Combatants for the next battle. Allies are `ally_<slot>` with carried
    /// health and the run's stat bonuses, enemies are `enemy_<n>` at full
    /// health with base stats.
    pub fn battle_setup(&self, enemies: &[Arc<CombatantDef>]) -> BattleSetup {
        let allies = self
            .party
            .iter()
            .enumerate()
            .map(|(i, slot)| {
                let mut ally = Combatant::new(format!("ally_{}", i), Arc::clone(&slot.character), Side::Ally);
                self.modifiers.apply_stat_bonuses(&slot.character.id, &mut ally.stats);
                ally.set_health(slot.health);
                ally
            })
            .collect();
        let enemies = enemies
            .iter()
            .enumerate()
            .map(|(i, def)| Combatant::new(format!("enemy_{}", i), Arc::clone(def), Side::Enemy))
            .collect();
        BattleSetup {
            allies,
            enemies,
            seed: self.seed.wrapping_add(self.battles_fought),
        }
    }

    /// Fight one battle against `enemies` and merge the result into the run.
    pub fn run_battle(
        &mut self,
        library: &ContentLibrary,
        enemies: &[Arc<CombatantDef>],
        options: EngineOptions,
    ) -> BattleResult<BattleOutcome> {
        let setup = self.battle_setup(enemies);
        let outcome = BattleEngine::new(setup, &self.modifiers, library, options)?
            .with_hook_state(self.hook_state.clone())
            .run();
        self.absorb(&outcome);
        Ok(outcome)
    }

    /// Write survivors' health back by slot, apply post-battle healing, keep
    /// the hook trigger counts, and add the battle's earnings to the run totals.
    pub fn absorb(&mut self, outcome: &BattleOutcome) {
        let heal_pct = self.modifiers.post_battle_heal_pct;
        for (i, slot) in self.party.iter_mut().enumerate() {
            let id = format!("ally_{}", i);
            let max = slot.max_health();
            let carried = outcome
                .survivors
                .iter()
                .find(|c| c.id == id)
                .map_or(0, |c| c.stats.health.min(max));
            slot.health = carried;
            if heal_pct > 0 {
                slot.health = (slot.health + max * heal_pct / 100).min(max);
            }
        }

        self.hook_state = outcome.hook_state.clone();
        self.acorns += outcome.acorns_earned + outcome.bonus_acorns;
        self.secondary += outcome.secondary_earned;
        self.experience += outcome.experience;
        self.battles_fought += 1;
        info!(
            battle = self.battles_fought,
            victory = outcome.victory,
            acorns = self.acorns,
            secondary = self.secondary,
            "battle merged into run"
        );
    }
}
