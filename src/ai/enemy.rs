//! Species strategies for enemies, and the temperament fallbacks used by
//! enemies without one.

use crate::ai::{attempt, known, moves_of_kind, moves_where, pick, pick_any, MoveStrategy, Situation};
use crate::battle::context::MoveContext;
use schema::{EnemySpecies, MoveKind, Temperament};

pub fn for_species(species: EnemySpecies) -> &'static dyn MoveStrategy {
    match species {
        EnemySpecies::BarkBeetle => &Beetle { can_summon: true },
        EnemySpecies::SwarmingBeetle => &Beetle { can_summon: false },
        EnemySpecies::BranchSnake => &Snake,
        EnemySpecies::SapSlime => &Slime { can_split: true },
        EnemySpecies::SmallSlime => &Slime { can_split: false },
        EnemySpecies::HollowAcorn => &HollowAcorn,
    }
}

pub fn for_temperament(temperament: Temperament) -> &'static dyn MoveStrategy {
    match temperament {
        Temperament::Aggressive => &Aggressive,
        Temperament::Defensive => &Defensive,
        Temperament::Random => &Random,
    }
}

/// Calls for backup when hurt and not yet outnumbering the party.
pub struct Beetle {
    pub can_summon: bool,
}

impl MoveStrategy for Beetle {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        let summon = self.can_summon && s.health_ratio < 0.75 && s.enemy_side <= 2;
        attempt(ctx, summon, "swarm_call", 0.6)
            .or_else(|| attempt(ctx, s.health_ratio < 0.4, "scurry", 0.7))
            .or_else(|| known(ctx, "nibble"))
    }
}

pub struct Snake;

impl MoveStrategy for Snake {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        let coiled = ctx.source().has_status("coiled");
        attempt(ctx, s.round <= 2 && s.health_ratio > 0.9, "ambush_strike", 0.8)
            .or_else(|| attempt(ctx, s.health_ratio < 0.6 && !coiled, "coil_defense", 0.7))
            .or_else(|| attempt(ctx, true, "venom_spit", 0.4))
            .or_else(|| known(ctx, "constrict"))
    }
}

/// Splits outright at a quarter health, otherwise leans on regeneration.
pub struct Slime {
    pub can_split: bool,
}

impl MoveStrategy for Slime {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        if self.can_split && s.health_ratio <= 0.25 {
            if let Some(split) = known(ctx, "split") {
                return Some(split);
            }
        }
        attempt(ctx, s.health_ratio <= 0.5, "blob", 0.7).or_else(|| known(ctx, "sticky_slap"))
    }
}

pub struct HollowAcorn;

impl MoveStrategy for HollowAcorn {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        let raging = ctx.source().has_status("forest_rage");
        let armored = ctx.source().has_status("armored");
        if let Some(choice) = attempt(ctx, s.health_ratio < 0.8 && !raging, "forest_rage", 0.5)
            .or_else(|| attempt(ctx, s.round >= 2, "root_entangle", 0.4))
            .or_else(|| attempt(ctx, !armored, "armor_up", 0.3))
        {
            return Some(choice);
        }
        let rotation: Vec<String> = ["acorn_slam", "dark_spores"]
            .into_iter()
            .filter_map(|id| known(ctx, id))
            .collect();
        pick(ctx, &rotation)
    }
}

/// Specials when desperate, attacks most of the time.
pub struct Aggressive;

impl MoveStrategy for Aggressive {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        let specials = moves_of_kind(ctx, MoveKind::Special);
        if s.health_ratio < 0.3 && !specials.is_empty() {
            return if ctx.rng.chance(0.7) {
                pick(ctx, &specials)
            } else {
                pick_any(ctx)
            };
        }
        let attacks = moves_of_kind(ctx, MoveKind::Attack);
        if !attacks.is_empty() && ctx.rng.chance(0.8) {
            return pick(ctx, &attacks);
        }
        pick_any(ctx)
    }
}

/// Shores up while healthy, heals when nearly down, attacks otherwise.
pub struct Defensive;

impl MoveStrategy for Defensive {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        let s = Situation::read(ctx);
        let support = moves_of_kind(ctx, MoveKind::Support);
        if s.health_ratio > 0.7 && !support.is_empty() && ctx.rng.chance(0.4) {
            return pick(ctx, &support);
        }
        if s.health_ratio < 0.2 {
            let heals = moves_where(ctx, |def| def.is_some_and(|d| d.heals()));
            if !heals.is_empty() && ctx.rng.chance(0.6) {
                return pick(ctx, &heals);
            }
        }
        let attacks = moves_of_kind(ctx, MoveKind::Attack);
        if attacks.is_empty() {
            pick_any(ctx)
        } else {
            pick(ctx, &attacks)
        }
    }
}

pub struct Random;

impl MoveStrategy for Random {
    fn choose(&self, ctx: &mut MoveContext<'_>) -> Option<String> {
        pick_any(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::tests::common::TestCombatantBuilder;
    use crate::combatant::Combatant;
    use crate::content::ContentLibrary;
    use crate::rng::SeededRng;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn decide(strategy: &dyn MoveStrategy, field: &[Combatant], round: u32, rng: &mut SeededRng) -> Option<String> {
        let mut ctx = MoveContext {
            combatants: field,
            source: 0,
            round,
            library: ContentLibrary::standard().unwrap(),
            rng,
        };
        strategy.choose(&mut ctx)
    }

    fn seed_with_first_draw(below: f64) -> u32 {
        (0..10_000u32)
            .map(|i| i.wrapping_mul(2_654_435_761))
            .find(|seed| SeededRng::new(*seed).next() < below)
            .unwrap()
    }

    fn seed_with_first_draw_above(above: f64) -> u32 {
        (0..10_000u32)
            .map(|i| i.wrapping_mul(2_654_435_761))
            .find(|seed| SeededRng::new(*seed).next() >= above)
            .unwrap()
    }

    #[test]
    fn healthy_beetle_nibbles_without_rolling() {
        let field = vec![
            TestCombatantBuilder::enemy("bark_beetle").build(),
            TestCombatantBuilder::ally("player").build(),
        ];
        let mut rng = SeededRng::new(4);
        assert_eq!(decide(&Beetle { can_summon: true }, &field, 1, &mut rng).as_deref(), Some("nibble"));
        assert_eq!(rng, SeededRng::new(4));
    }

    #[rstest]
    #[case(true, Some("swarm_call"))]
    #[case(false, Some("nibble"))]
    fn only_the_main_beetle_summons(#[case] can_summon: bool, #[case] expected: Option<&str>) {
        let field = vec![
            TestCombatantBuilder::enemy("bark_beetle").with_health(50).build(),
            TestCombatantBuilder::ally("player").build(),
        ];
        let mut rng = SeededRng::new(seed_with_first_draw(0.6));
        assert_eq!(decide(&Beetle { can_summon }, &field, 1, &mut rng).as_deref(), expected);
    }

    #[test]
    fn snake_ambushes_in_the_opening_rounds() {
        let field = vec![
            TestCombatantBuilder::enemy("branch_snake").build(),
            TestCombatantBuilder::ally("player").build(),
        ];
        let seed = seed_with_first_draw(0.8);
        assert_eq!(decide(&Snake, &field, 1, &mut SeededRng::new(seed)).as_deref(), Some("ambush_strike"));
        // From round three the ambush is off the table and no roll is spent on it.
        let late = decide(&Snake, &field, 3, &mut SeededRng::new(seed_with_first_draw_above(0.4)));
        assert_eq!(late.as_deref(), Some("constrict"));
    }

    #[test]
    fn sap_slime_splits_at_a_quarter_health() {
        let field = vec![
            TestCombatantBuilder::enemy("sap_slime").with_health(30).build(),
            TestCombatantBuilder::ally("player").build(),
        ];
        let mut rng = SeededRng::new(8);
        assert_eq!(decide(&Slime { can_split: true }, &field, 2, &mut rng).as_deref(), Some("split"));
        assert_eq!(rng, SeededRng::new(8));
    }

    #[test]
    fn small_slime_never_splits() {
        let field = vec![
            TestCombatantBuilder::enemy("sap_slime").with_health(30).build(),
            TestCombatantBuilder::ally("player").build(),
        ];
        let mut rng = SeededRng::new(seed_with_first_draw(0.7));
        assert_eq!(decide(&Slime { can_split: false }, &field, 2, &mut rng).as_deref(), Some("blob"));
    }

    #[test]
    fn hollow_acorn_always_finds_something() {
        let field = vec![
            TestCombatantBuilder::enemy("hollow_acorn").build(),
            TestCombatantBuilder::ally("player").build(),
        ];
        let moves = &field[0].definition.moves;
        for seed in 0..30 {
            let choice = decide(&HollowAcorn, &field, 1, &mut SeededRng::new(seed)).unwrap();
            assert!(moves.contains(&choice));
            assert_ne!(choice, "forest_rage");
            assert_ne!(choice, "root_entangle");
        }
    }

    #[test]
    fn temperaments_only_pick_known_moves() {
        let field = vec![
            TestCombatantBuilder::enemy("branch_snake").with_health(10).build(),
            TestCombatantBuilder::ally("player").build(),
        ];
        let moves = &field[0].definition.moves;
        for strategy in [for_temperament(Temperament::Aggressive), for_temperament(Temperament::Defensive), for_temperament(Temperament::Random)] {
            for seed in 0..30 {
                let choice = decide(strategy, &field, 1, &mut SeededRng::new(seed)).unwrap();
                assert!(moves.contains(&choice));
            }
        }
    }

    #[test]
    fn defensive_without_attacks_still_acts() {
        let field = vec![
            TestCombatantBuilder::enemy("hollow_acorn")
                .with_moves(&["armor_up"])
                .with_health(100)
                .build(),
            TestCombatantBuilder::ally("player").build(),
        ];
        let choice = decide(&Defensive, &field, 1, &mut SeededRng::new(seed_with_first_draw_above(0.4)));
        assert_eq!(choice.as_deref(), Some("armor_up"));
    }
}
