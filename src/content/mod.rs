//! Standard Acorn Hunt content tables.
//!
//! Tables are RON documents compiled into the binary and parsed once into a
//! process-wide `ContentLibrary`. Callers receive shared `Arc` handles.

pub mod encounters;

use crate::battle::effects::fallback_move;
use crate::errors::{ContentError, ContentResult};
use schema::{CombatantDef, MoveDef, RelicDef, SkillNode, Tier};
use serde::de::DeserializeOwned;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, LazyLock};

const PARTY_MOVES: &str = include_str!("../../data/party_moves.ron");
const ENEMY_MOVES: &str = include_str!("../../data/enemy_moves.ron");
const CHARACTERS: &str = include_str!("../../data/characters.ron");
const ENEMIES: &str = include_str!("../../data/enemies.ron");
const SPAWNS: &str = include_str!("../../data/spawns.ron");
const RELICS: &str = include_str!("../../data/relics.ron");
const SKILLS: &str = include_str!("../../data/skills.ron");

static STANDARD: LazyLock<ContentResult<ContentLibrary>> = LazyLock::new(ContentLibrary::load_standard);

/// Raw RON sources for one content library.
#[derive(Debug, Clone, Copy)]
pub struct ContentSources<'a> {
    pub moves: &'a [&'a str],
    pub characters: &'a str,
    pub enemies: &'a str,
    pub spawns: &'a str,
    pub relics: &'a str,
    pub skills: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    moves: BTreeMap<String, Arc<MoveDef>>,
    characters: BTreeMap<String, Arc<CombatantDef>>,
    enemies: BTreeMap<String, Arc<CombatantDef>>,
    spawn_only: BTreeSet<String>,
    relics: BTreeMap<String, Arc<RelicDef>>,
    skills: Vec<Arc<SkillNode>>,
}

fn parse_table<T: DeserializeOwned>(table: &str, source: &str) -> ContentResult<Vec<T>> {
    ron::from_str(source).map_err(|err| ContentError::Malformed {
        table: table.to_string(),
        details: err.to_string(),
    })
}

impl ContentLibrary {
    /// The library compiled into the crate.
    pub fn standard() -> ContentResult<&'static ContentLibrary> {
        STANDARD.as_ref().map_err(Clone::clone)
    }

    fn load_standard() -> ContentResult<Self> {
        Self::from_sources(ContentSources {
            moves: &[PARTY_MOVES, ENEMY_MOVES],
            characters: CHARACTERS,
            enemies: ENEMIES,
            spawns: SPAWNS,
            relics: RELICS,
            skills: SKILLS,
        })
    }

    pub fn from_sources(sources: ContentSources<'_>) -> ContentResult<Self> {
        let mut library = ContentLibrary::default();

        for source in sources.moves {
            for move_def in parse_table::<MoveDef>("moves", source)? {
                library.moves.insert(move_def.id.clone(), Arc::new(move_def));
            }
        }
        for character in parse_table::<CombatantDef>("characters", sources.characters)? {
            library.characters.insert(character.id.clone(), Arc::new(character));
        }
        for enemy in parse_table::<CombatantDef>("enemies", sources.enemies)? {
            library.enemies.insert(enemy.id.clone(), Arc::new(enemy));
        }
        for spawn in parse_table::<CombatantDef>("spawns", sources.spawns)? {
            library.spawn_only.insert(spawn.id.clone());
            library.enemies.insert(spawn.id.clone(), Arc::new(spawn));
        }
        for relic in parse_table::<RelicDef>("relics", sources.relics)? {
            library.relics.insert(relic.id.clone(), Arc::new(relic));
        }
        library.skills = parse_table::<SkillNode>("skills", sources.skills)?
            .into_iter()
            .map(Arc::new)
            .collect();

        Ok(library)
    }

    pub fn move_def(&self, id: &str) -> Option<Arc<MoveDef>> {
        self.moves.get(id).cloned()
    }

    /// Resolve a move id, synthesizing a generic attack for unknown ids.
    pub fn resolve_move(&self, id: &str) -> Arc<MoveDef> {
        match self.moves.get(id) {
            Some(found) => Arc::clone(found),
            None => {
                tracing::warn!(move_id = id, "unknown move id, using fallback attack");
                Arc::new(fallback_move(id))
            }
        }
    }

    pub fn character(&self, id: &str) -> ContentResult<Arc<CombatantDef>> {
        self.characters
            .get(id)
            .cloned()
            .ok_or_else(|| ContentError::UnknownCharacter(id.to_string()))
    }

    pub fn enemy(&self, id: &str) -> ContentResult<Arc<CombatantDef>> {
        self.enemies
            .get(id)
            .cloned()
            .ok_or_else(|| ContentError::UnknownEnemy(id.to_string()))
    }

    pub fn relic(&self, id: &str) -> ContentResult<Arc<RelicDef>> {
        self.relics
            .get(id)
            .cloned()
            .ok_or_else(|| ContentError::UnknownRelic(id.to_string()))
    }

    pub fn skill(&self, character: &str, id: &str) -> ContentResult<Arc<SkillNode>> {
        self.skills
            .iter()
            .find(|node| node.character == character && node.id == id)
            .cloned()
            .ok_or_else(|| ContentError::UnknownSkill {
                character: character.to_string(),
                skill: id.to_string(),
            })
    }

    pub fn skills_for<'a>(&'a self, character: &'a str) -> impl Iterator<Item = &'a Arc<SkillNode>> + 'a {
        self.skills.iter().filter(move |node| node.character == character)
    }

    pub fn characters(&self) -> impl Iterator<Item = &Arc<CombatantDef>> {
        self.characters.values()
    }

    /// Enemies that can appear in an encounter, excluding split and summon forms.
    pub fn encounter_enemies(&self) -> impl Iterator<Item = &Arc<CombatantDef>> {
        self.enemies
            .values()
            .filter(|enemy| !self.spawn_only.contains(&enemy.id))
    }

    pub fn enemies_of_tier(&self, tier: Tier) -> Vec<Arc<CombatantDef>> {
        self.encounter_enemies()
            .filter(|enemy| enemy.tier == tier)
            .cloned()
            .collect()
    }

    pub fn relics(&self) -> impl Iterator<Item = &Arc<RelicDef>> {
        self.relics.values()
    }

    pub fn moves(&self) -> impl Iterator<Item = &Arc<MoveDef>> {
        self.moves.values()
    }
}
