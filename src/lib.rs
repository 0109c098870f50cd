// In: src/lib.rs

//! Acorn Hunt Battle Core
//!
//! A deterministic, seeded turn-based battle simulator. A party of squirrel
//! heroes fights a roster of forest creatures; relics and skills feed a
//! modifier aggregate that the engine reads for the whole battle.

// --- MODULE DECLARATIONS ---
pub mod ai;
pub mod battle;
pub mod combatant;
pub mod config;
pub mod content;
pub mod errors;
pub mod hooks;
pub mod modifiers;
pub mod rng;
pub mod run;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
// Content definitions shared by tables and the engine.
pub use schema::{
    AiProfile, CombatantDef, HookEffect, HookEvent, ModifierEffect, MoveDef, RelicDef, SkillNode, StatKey, Stats,
    StatusEffect,
};

// --- From this crate's modules (`src/`) ---

// Battle engine and its record.
pub use battle::action::{ActionKind, BattleAction};
pub use battle::engine::{BattleEngine, BattleOutcome, BattlePhase, BattleSetup};
pub use battle::observer::{BattleObserver, BattleSnapshot};
pub use battle::playback::{replay, PlaybackHost, PlaybackSpeed};

// Runtime state.
pub use combatant::{Combatant, Side};
pub use hooks::HookState;
pub use modifiers::BattleModifiers;
pub use rng::SeededRng;
pub use run::{PartySlot, RunState};

// Content and configuration.
pub use config::{EngineOptions, RunConfig, SeedPolicy};
pub use content::ContentLibrary;
pub use errors::{BattleEngineError, BattleResult};
