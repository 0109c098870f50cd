#[cfg(test)]
mod tests {
    use crate::battle::engine::{BattlePhase, BattleSetup};
    use crate::battle::observer::NoopObserver;
    use crate::battle::tests::common::{create_engine, overpowered_glider, TestCombatantBuilder};
    use crate::combatant::Side;
    use crate::config::EngineOptions;
    use crate::modifiers::BattleModifiers;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn enemy_ids(combatants: &[crate::combatant::Combatant]) -> Vec<String> {
        combatants
            .iter()
            .filter(|c| c.side == Side::Enemy)
            .map(|c| c.id.clone())
            .collect()
    }

    fn run_first_round(engine: &mut crate::battle::engine::BattleEngine<'_>) {
        let mut observer = NoopObserver;
        while !matches!(engine.step(&mut observer), BattlePhase::StatusDecay | BattlePhase::Terminal) {}
    }

    fn wounded_slime(id: &str) -> crate::combatant::Combatant {
        TestCombatantBuilder::enemy("sap_slime")
            .with_id(id)
            .with_health(30)
            .with_moves(&["split"])
            .build()
    }

    #[test]
    fn test_split_replaces_the_slime_with_two() {
        let setup = BattleSetup {
            allies: vec![TestCombatantBuilder::ally("player").with_id("ally_0").with_moves(&["peck"]).build()],
            enemies: vec![wounded_slime("enemy_0")],
            seed: 13,
        };
        let modifiers = BattleModifiers::new();
        let mut engine = create_engine(setup, &modifiers, EngineOptions::default());
        run_first_round(&mut engine);

        assert_eq!(enemy_ids(engine.combatants()), vec!["small_slime_0", "small_slime_1"]);
        let announcement = engine
            .log()
            .actions()
            .iter()
            .find(|a| a.source == "enemy_0")
            .unwrap();
        assert_eq!(announcement.message, "The slime splits into two smaller forms!");
        assert_eq!(announcement.split_into.len(), 2);
        for spawn in engine.combatants().iter().filter(|c| c.side == Side::Enemy) {
            assert_eq!(spawn.stats.health, 40);
            assert_eq!(spawn.name(), "Small Slime");
        }
    }

    #[test]
    fn test_spawn_ids_stay_unique() {
        let setup = BattleSetup {
            allies: vec![TestCombatantBuilder::ally("player").with_id("ally_0").with_moves(&["peck"]).build()],
            enemies: vec![wounded_slime("enemy_0"), wounded_slime("enemy_1")],
            seed: 13,
        };
        let modifiers = BattleModifiers::new();
        let mut engine = create_engine(setup, &modifiers, EngineOptions::default());
        run_first_round(&mut engine);

        let ids = enemy_ids(engine.combatants());
        assert_eq!(ids.len(), 4);
        let unique: BTreeSet<&String> = ids.iter().collect();
        assert_eq!(unique.len(), 4);
    }

    #[test]
    fn test_summon_keeps_the_caller() {
        let setup = BattleSetup {
            allies: vec![TestCombatantBuilder::ally("player").with_id("ally_0").with_moves(&["peck"]).build()],
            enemies: vec![TestCombatantBuilder::enemy("bark_beetle")
                .with_id("enemy_0")
                .with_health(50)
                .with_moves(&["swarm_call"])
                .build()],
            seed: 29,
        };
        let modifiers = BattleModifiers::new();
        let mut engine = create_engine(setup, &modifiers, EngineOptions::default());
        run_first_round(&mut engine);

        assert_eq!(enemy_ids(engine.combatants()), vec!["enemy_0", "swarming_beetle_0"]);
    }

    #[test]
    fn test_split_spawns_count_toward_rewards() {
        let setup = BattleSetup {
            allies: vec![overpowered_glider(&["gust"])],
            enemies: vec![TestCombatantBuilder::enemy("sap_slime")
                .with_id("enemy_0")
                .with_health(30)
                .with_speed(30)
                .with_moves(&["split"])
                .build()],
            seed: 6,
        };
        let outcome = create_engine(setup, &BattleModifiers::new(), EngineOptions::default()).run();

        assert!(outcome.victory);
        assert_eq!(outcome.acorns_earned, 15 + 10 * 2);
        assert_eq!(outcome.survivors.len(), 1);
    }
}
