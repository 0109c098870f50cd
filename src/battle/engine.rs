//! The battle state machine.
//!
//! `Setup → RoundStart → TurnLoop → StatusDecay → RoundEndEffects`, then back
//! to `RoundStart` or on to `Terminal`. A turn loop that decides the battle
//! goes straight to `Terminal`. The engine is fully synchronous: a
//! battle runs to its terminal state in one call and leaves behind a complete,
//! ordered action log. Hosts that want to pace a presentation replay that log
//! through `battle::playback`.

use crate::ai;
use crate::battle::action::{ActionKind, ActionLog, BattleAction, RELIC_SOURCE};
use crate::battle::calculators::{self, apply_crit, calculate_damage, crit_chance, dodge_chance};
use crate::battle::context::MoveContext;
use crate::battle::effects::{self, TARGET_PLACEHOLDER};
use crate::battle::observer::{BattleObserver, BattleSnapshot, NoopObserver};
use crate::battle::rewards::{calculate_rewards, RewardInputs};
use crate::battle::status;
use crate::battle::targeting;
use crate::combatant::{Combatant, Side};
use crate::config::{EngineOptions, SeedPolicy};
use crate::content::ContentLibrary;
use crate::errors::{RunContextError, RunContextResult};
use crate::hooks::{HookContext, HookState};
use crate::modifiers::BattleModifiers;
use crate::rng::SeededRng;
use schema::{CombatantDef, HookEvent, MoveDef, Passive};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, info, trace, warn};

pub const OPENING_MESSAGE: &str = "Battle begins!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattlePhase {
    Setup,
    RoundStart,
    TurnLoop,
    StatusDecay,
    RoundEndEffects,
    Terminal,
}

/// The combatants and seed a battle starts from.
#[derive(Debug, Clone)]
pub struct BattleSetup {
    pub allies: Vec<Combatant>,
    pub enemies: Vec<Combatant>,
    pub seed: u32,
}

/// The battle result handed back to the run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub victory: bool,
    /// Combatants with health above zero when the battle ended.
    pub survivors: Vec<Combatant>,
    pub actions: Vec<BattleAction>,
    pub acorns_earned: u32,
    pub secondary_earned: u32,
    pub experience: u32,
    /// Acorns granted by hooks while the battle ran.
    pub bonus_acorns: u32,
    pub rounds: u32,
    /// The round cap ended the battle.
    pub stalemate: bool,
    /// Hook trigger counts after the battle, for the next battle of the run.
    pub hook_state: HookState,
}

impl BattleOutcome {
    /// Compact binary encoding, stable for identical outcomes.
    pub fn to_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_allocvec(self)
    }
}

fn battle_seed(seed: u32, policy: SeedPolicy) -> u32 {
    match policy {
        SeedPolicy::Fixed => seed,
        SeedPolicy::MixWallClock => {
            let millis = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_millis() as u32)
                .unwrap_or(0);
            seed.wrapping_add(millis)
        }
    }
}

pub struct BattleEngine<'run> {
    combatants: Vec<Combatant>,
    log: ActionLog,
    round: u32,
    phase: BattlePhase,
    rng: SeededRng,
    modifiers: &'run BattleModifiers,
    library: &'run ContentLibrary,
    options: EngineOptions,
    ally_damage_taken: i32,
    bonus_acorns: u32,
    next_attack_factor: Option<f64>,
    hook_state: HookState,
    stalemate: bool,
}

impl<'run> BattleEngine<'run> {
    /// Validate the setup and merge both sides into one working list, allies
    /// first.
    pub fn new(
        setup: BattleSetup,
        modifiers: &'run BattleModifiers,
        library: &'run ContentLibrary,
        options: EngineOptions,
    ) -> RunContextResult<Self> {
        if setup.allies.is_empty() {
            return Err(RunContextError::EmptyParty);
        }
        if setup.enemies.is_empty() {
            return Err(RunContextError::NoEnemies);
        }
        modifiers.validate()?;

        let mut combatants = Vec::with_capacity(setup.allies.len() + setup.enemies.len());
        let tagged = setup
            .allies
            .into_iter()
            .map(|c| (c, Side::Ally))
            .chain(setup.enemies.into_iter().map(|c| (c, Side::Enemy)));
        let mut seen = BTreeSet::new();
        for (mut combatant, side) in tagged {
            let stats = combatant.stats;
            if stats.max_health <= 0 || stats.health < 0 || stats.health > stats.max_health {
                return Err(RunContextError::HealthOutOfRange {
                    id: combatant.id,
                    health: stats.health,
                    max: stats.max_health,
                });
            }
            if !seen.insert(combatant.id.clone()) {
                return Err(RunContextError::DuplicateCombatant(combatant.id));
            }
            combatant.side = side;
            combatants.push(combatant);
        }

        let seed = battle_seed(setup.seed, options.seed_policy);
        debug!(run_seed = setup.seed, battle_seed = seed, "battle rng seeded");

        Ok(Self {
            combatants,
            log: ActionLog::new(),
            round: 0,
            phase: BattlePhase::Setup,
            rng: SeededRng::new(seed),
            modifiers,
            library,
            options,
            ally_damage_taken: 0,
            bonus_acorns: 0,
            next_attack_factor: None,
            hook_state: HookState::new(),
            stalemate: false,
        })
    }

    /// Resume hook trigger counts from an earlier battle.
    pub fn with_hook_state(mut self, state: HookState) -> Self {
        self.hook_state = state;
        self
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn log(&self) -> &ActionLog {
        &self.log
    }

    fn living(&self, side: Side) -> usize {
        self.combatants
            .iter()
            .filter(|c| c.side == side && c.is_alive())
            .count()
    }

    /// Decided the instant either side has nobody left standing.
    pub fn is_over(&self) -> bool {
        self.stalemate || self.living(Side::Ally) == 0 || self.living(Side::Enemy) == 0
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            round: self.round,
            combatants: self.combatants.clone(),
            actions: self.log.actions().to_vec(),
            is_over: self.is_over(),
        }
    }

    /// Run to the terminal state without an observer.
    pub fn run(self) -> BattleOutcome {
        self.run_with(&mut NoopObserver)
    }

    pub fn run_with(mut self, observer: &mut dyn BattleObserver) -> BattleOutcome {
        while self.phase != BattlePhase::Terminal {
            self.step(observer);
        }
        self.finish()
    }

    /// Advance one phase and return the phase the engine is now in.
    pub fn step(&mut self, observer: &mut dyn BattleObserver) -> BattlePhase {
        self.phase = match self.phase {
            BattlePhase::Setup => {
                self.open();
                if self.is_over() {
                    BattlePhase::Terminal
                } else {
                    BattlePhase::RoundStart
                }
            }
            BattlePhase::RoundStart => {
                if self.round >= self.options.max_rounds {
                    warn!(rounds = self.round, "round cap reached, ending battle");
                    self.stalemate = true;
                    BattlePhase::Terminal
                } else {
                    self.round += 1;
                    self.log.push(BattleAction::system(format!("--- Round {} ---", self.round)));
                    BattlePhase::TurnLoop
                }
            }
            BattlePhase::TurnLoop => {
                self.run_turns(observer);
                if self.is_over() {
                    observer.on_state_update(&self.snapshot());
                    BattlePhase::Terminal
                } else {
                    BattlePhase::StatusDecay
                }
            }
            BattlePhase::StatusDecay => {
                for combatant in &mut self.combatants {
                    status::decay(combatant);
                }
                BattlePhase::RoundEndEffects
            }
            BattlePhase::RoundEndEffects => {
                self.round_end_effects();
                observer.on_state_update(&self.snapshot());
                if self.is_over() {
                    BattlePhase::Terminal
                } else {
                    BattlePhase::RoundStart
                }
            }
            BattlePhase::Terminal => BattlePhase::Terminal,
        };
        self.phase
    }

    fn open(&mut self) {
        let roster = |side: Side| -> Vec<String> {
            self.combatants
                .iter()
                .filter(|c| c.side == side)
                .map(|c| c.to_string())
                .collect()
        };
        info!(allies = ?roster(Side::Ally), enemies = ?roster(Side::Enemy), "battle starting");
        self.log.push(BattleAction::system(OPENING_MESSAGE));
    }

    fn index_of(&self, id: &str) -> Option<usize> {
        self.combatants.iter().position(|c| c.id == id)
    }

    fn run_turns(&mut self, observer: &mut dyn BattleObserver) {
        let order = targeting::turn_order(&self.combatants);
        debug!(round = self.round, order = ?order, "turn order");
        for id in order {
            if self.is_over() {
                break;
            }
            let Some(index) = self.index_of(&id) else {
                continue;
            };
            if !self.combatants[index].is_alive() {
                continue;
            }
            self.take_turn(index, observer);
            observer.on_turn_end(&id);
        }
    }

    fn push_turn_note(&mut self, actor_id: &str, message: String) {
        let mut note = BattleAction::template(ActionKind::Special, 0, message);
        note.source = actor_id.to_string();
        self.log.push(note);
    }

    fn take_turn(&mut self, index: usize, observer: &mut dyn BattleObserver) {
        let actor = &self.combatants[index];
        let actor_id = actor.id.clone();
        let actor_name = actor.name().to_string();
        let actor_side = actor.side;

        if status::is_incapacitated(actor) {
            debug!(actor = %actor_id, "incapacitated, skipping turn");
            self.push_turn_note(&actor_id, format!("{} is unable to act!", actor_name));
            return;
        }

        let mut ctx = MoveContext {
            combatants: &self.combatants,
            source: index,
            round: self.round,
            library: self.library,
            rng: &mut self.rng,
        };
        let Some(move_def) = ai::choose_move(&mut ctx) else {
            debug!(actor = %actor_id, "no moves available");
            self.push_turn_note(&actor_id, format!("{} has no moves to use!", actor_name));
            return;
        };

        if move_def.is_attack() && status::prevents_attacks(&self.combatants[index]) {
            debug!(actor = %actor_id, move_id = %move_def.id, "attack prevented, skipping turn");
            return;
        }

        let targets = targeting::select_targets(&self.combatants, &self.combatants[index], move_def.target);
        let mut ctx = MoveContext {
            combatants: &self.combatants,
            source: index,
            round: self.round,
            library: self.library,
            rng: &mut self.rng,
        };
        let templates = effects::resolve_move(&move_def, &mut ctx);
        debug!(actor = %actor_id, move_id = %move_def.id, targets = ?targets, "move chosen");

        let mut processed = 0;
        for mut action in templates {
            action.source = actor_id.clone();
            if action.targets.is_empty() {
                if targets.is_empty() {
                    trace!(actor = %actor_id, "dropping action without targets");
                    continue;
                }
                action.targets = targets.clone();
            }
            if action.message.contains(TARGET_PLACEHOLDER) {
                let name = action
                    .targets
                    .first()
                    .and_then(|id| self.index_of(id))
                    .map(|i| self.combatants[i].name().to_string())
                    .unwrap_or_default();
                action.message = action.message.replace(TARGET_PLACEHOLDER, &name);
            }
            observer.on_action_start(&action);
            self.process_action(action, &move_def);
            processed += 1;
        }
        if processed == 0 {
            self.push_turn_note(&actor_id, format!("{} has no valid targets!", actor_name));
        }

        if let Some(i) = self.index_of(&actor_id) {
            self.combatants[i].last_move = Some(move_def.name.clone());
        }

        if move_def.is_attack() {
            self.next_attack_factor = None;
            if self.options.wire_attack_hooks && actor_side == Side::Ally {
                self.fire_hooks(HookEvent::OnAttack, Some(actor_id));
            }
        }
    }

    fn process_action(&mut self, mut action: BattleAction, move_def: &MoveDef) {
        match action.kind {
            ActionKind::Damage => self.apply_damage(&mut action, move_def),
            ActionKind::Heal => self.apply_heal(&mut action),
            ActionKind::Buff | ActionKind::Debuff => self.apply_status(&action),
            ActionKind::Special => self.apply_spawns(&action),
        }
        debug!(kind = ?action.kind, source = %action.source, value = action.value, message = %action.message, "action processed");
        self.log.push(action);
    }

    fn apply_damage(&mut self, action: &mut BattleAction, move_def: &MoveDef) {
        let Some(attacker) = self.index_of(&action.source) else {
            return;
        };
        let multiplier = self.modifiers.damage_multiplier * self.next_attack_factor.unwrap_or(1.0);
        let template_value = action.value;
        let mut dealt = 0;

        for target_id in action.targets.clone() {
            let Some(target) = self.index_of(&target_id) else {
                continue;
            };
            if !self.combatants[target].is_alive() {
                continue;
            }

            let inputs = calculators::damage_inputs(
                &self.combatants[attacker],
                &self.combatants[target],
                move_def,
                template_value,
                multiplier,
            );
            let breakdown = calculate_damage(inputs);
            debug!(
                attacker = %action.source,
                target = %target_id,
                raw = breakdown.raw,
                mitigated = breakdown.mitigated,
                final_damage = breakdown.final_damage,
                "damage evaluated"
            );

            let dodge = dodge_chance(self.combatants[target].stats.speed, self.modifiers.dodge_bonus);
            if self.rng.chance(dodge) {
                action.miss = true;
                action.message.push_str(" (Dodged!)");
                continue;
            }

            let mut damage = breakdown.final_damage;
            let crit = crit_chance(self.combatants[attacker].stats.luck, self.modifiers.crit_bonus);
            if self.rng.chance(crit) {
                damage = apply_crit(damage);
                action.crit = true;
                action.message.push_str(" Critical hit!");
                self.fire_hooks(HookEvent::OnCrit, Some(action.source.clone()));
            }

            let victim = &mut self.combatants[target];
            let removed = victim.take_damage(damage);
            if victim.side == Side::Ally {
                self.ally_damage_taken += removed;
            }
            dealt += damage;
            if !victim.is_alive() {
                action.message.push_str(&format!(" {} is defeated!", victim.name()));
            }
        }
        action.value = dealt;
    }

    fn apply_heal(&mut self, action: &mut BattleAction) {
        let requested = action.value;
        let mut healed = 0;
        for target_id in &action.targets {
            if let Some(target) = self.combatants.iter_mut().find(|c| &c.id == target_id) {
                if target.is_alive() {
                    healed += target.restore_health(requested);
                }
            }
        }
        action.value = healed;
    }

    fn apply_status(&mut self, action: &BattleAction) {
        let Some(effect) = &action.status else {
            return;
        };
        for target_id in &action.targets {
            if let Some(target) = self.combatants.iter_mut().find(|c| &c.id == target_id) {
                if target.is_alive() {
                    status::attach(target, effect.clone());
                }
            }
        }
    }

    fn apply_spawns(&mut self, action: &BattleAction) {
        if action.split_into.is_empty() && action.summons.is_empty() {
            return;
        }
        let Some(source) = self.index_of(&action.source) else {
            return;
        };
        let side = self.combatants[source].side;
        if !action.split_into.is_empty() {
            let removed = self.combatants.remove(source);
            debug!(source = %removed.id, into = action.split_into.len(), "combatant split");
            for (i, def) in action.split_into.iter().enumerate() {
                self.spawn(def, side, i);
            }
        }
        for (i, def) in action.summons.iter().enumerate() {
            self.spawn(def, side, i);
        }
    }

    fn spawn(&mut self, def: &CombatantDef, side: Side, index: usize) {
        let mut n = index;
        let mut id = format!("{}_{}", def.id, n);
        while self.index_of(&id).is_some() {
            n += 1;
            id = format!("{}_{}", def.id, n);
        }
        debug!(id = %id, side = ?side, "combatant spawned");
        self.combatants.push(Combatant::new(id, Arc::new(def.clone()), side));
    }

    fn round_end_effects(&mut self) {
        let regen = self.modifiers.heal_per_round;
        if regen > 0 {
            let mut entries = Vec::new();
            for combatant in self.combatants.iter_mut().filter(|c| c.side == Side::Ally && c.is_alive()) {
                let healed = combatant.restore_health(regen);
                if healed > 0 {
                    let mut entry = BattleAction::template(
                        ActionKind::Heal,
                        healed,
                        format!("{} regenerates health!", combatant.name()),
                    )
                    .with_targets(vec![combatant.id.clone()]);
                    entry.source = RELIC_SOURCE.to_string();
                    entries.push(entry);
                }
            }
            for entry in entries {
                self.log.push(entry);
            }
        }
        self.fire_hooks(HookEvent::RoundStart, None);
    }

    fn fire_hooks(&mut self, event: HookEvent, actor: Option<String>) {
        let modifiers = self.modifiers;
        let hooks = modifiers.hooks.subscribers(event);
        if hooks.is_empty() {
            return;
        }
        let mut ctx = HookContext {
            event,
            round: self.round,
            combatants: &mut self.combatants,
            rng: &mut self.rng,
            actor,
            bonus_acorns: &mut self.bonus_acorns,
            next_attack_factor: &mut self.next_attack_factor,
            ally_damage_taken: &mut self.ally_damage_taken,
            state: &mut self.hook_state,
            slot: String::new(),
        };
        for (slot, hook) in hooks.iter().enumerate() {
            trace!(event = %event, source = hook.source(), slot, "firing hook");
            ctx.slot = HookState::slot_key(event, slot);
            hook.fire(&mut ctx);
        }
    }

    fn finish(mut self) -> BattleOutcome {
        if self.options.wire_post_battle_hooks {
            self.fire_hooks(HookEvent::PostBattle, None);
        }

        let victory = !self.stalemate && self.living(Side::Ally) > 0;
        let rewards = calculate_rewards(RewardInputs {
            victory,
            enemy_count: self.combatants.iter().filter(|c| c.side == Side::Enemy).count() as u32,
            bonus_member: self
                .combatants
                .iter()
                .any(|c| c.side == Side::Ally && c.definition.passive == Some(Passive::BonusAcorns)),
            acorn_drop_multiplier: self.modifiers.acorn_drop_multiplier,
            perfect: self.ally_damage_taken == 0,
        });

        let survivors: Vec<Combatant> = self.combatants.into_iter().filter(|c| c.is_alive()).collect();
        info!(
            victory,
            rounds = self.round,
            acorns = rewards.acorns,
            secondary = rewards.secondary,
            bonus_acorns = self.bonus_acorns,
            survivors = survivors.len(),
            "battle ended"
        );

        BattleOutcome {
            victory,
            survivors,
            actions: self.log.into_actions(),
            acorns_earned: rewards.acorns,
            secondary_earned: rewards.secondary,
            experience: rewards.experience,
            bonus_acorns: self.bonus_acorns,
            rounds: self.round,
            stalemate: self.stalemate,
            hook_state: self.hook_state,
        }
    }
}
