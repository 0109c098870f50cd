#[cfg(test)]
mod tests {
    use crate::battle::action::ActionKind;
    use crate::battle::engine::BattleSetup;
    use crate::battle::status;
    use crate::battle::tests::common::{create_engine, idle_enemy, round_actions, TestCombatantBuilder};
    use crate::config::EngineOptions;
    use crate::modifiers::BattleModifiers;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::StatusEffect;

    fn capped(rounds: u32) -> EngineOptions {
        EngineOptions {
            max_rounds: rounds,
            ..EngineOptions::default()
        }
    }

    #[rstest]
    #[case(status::STUN)]
    #[case(status::SLEEP)]
    fn test_incapacitated_combatant_loses_one_turn(#[case] status_id: &str) {
        let setup = BattleSetup {
            allies: vec![TestCombatantBuilder::ally("player")
                .with_id("ally_0")
                .with_moves(&["peck"])
                .with_status(StatusEffect::new(status_id, "Out cold", 1))
                .build()],
            enemies: vec![idle_enemy("sap_slime")],
            seed: 8,
        };
        let outcome = create_engine(setup, &BattleModifiers::new(), capped(2)).run();

        let first: Vec<&str> = round_actions(&outcome.actions, 1)
            .into_iter()
            .filter(|a| a.source == "ally_0")
            .map(|a| a.message.as_str())
            .collect();
        assert_eq!(first, vec!["Glider is unable to act!"]);

        let second = round_actions(&outcome.actions, 2);
        assert!(second
            .iter()
            .any(|a| a.source == "ally_0" && a.kind == ActionKind::Damage));
    }

    #[test]
    fn test_fortress_skips_attacks_silently() {
        let fortress = StatusEffect::new("fortress", "Fortress Mode", 4).preventing_attacks();
        let setup = BattleSetup {
            allies: vec![TestCombatantBuilder::ally("orvus")
                .with_id("ally_0")
                .with_moves(&["wing_slam"])
                .with_status(fortress)
                .build()],
            enemies: vec![idle_enemy("bark_beetle")],
            seed: 8,
        };
        let outcome = create_engine(setup, &BattleModifiers::new(), capped(2)).run();

        assert!(outcome.actions.iter().all(|a| a.source != "ally_0"));
        assert!(outcome
            .actions
            .iter()
            .any(|a| a.message == "Bark Beetle has no moves to use!"));
    }

    #[test]
    fn test_taunt_redirects_the_attack() {
        let taunted = StatusEffect::new(status::TAUNTED, "Taunted", 3).with_forced_target("ally_1");
        let setup = BattleSetup {
            allies: vec![
                TestCombatantBuilder::ally("player").with_id("ally_0").with_moves(&["peck"]).build(),
                TestCombatantBuilder::ally("orvus").with_id("ally_1").with_moves(&["wing_slam"]).build(),
            ],
            enemies: vec![TestCombatantBuilder::enemy("bark_beetle")
                .with_id("enemy_0")
                .with_moves(&["nibble"])
                .with_status(taunted)
                .build()],
            seed: 21,
        };
        let outcome = create_engine(setup, &BattleModifiers::new(), capped(1)).run();

        let bite = outcome
            .actions
            .iter()
            .find(|a| a.source == "enemy_0" && a.kind == ActionKind::Damage)
            .unwrap();
        assert_eq!(bite.targets, vec!["ally_1".to_string()]);
    }

    #[test]
    fn test_taunt_toward_a_fallen_ally_is_ignored() {
        let taunted = StatusEffect::new(status::TAUNTED, "Taunted", 3).with_forced_target("ally_1");
        let setup = BattleSetup {
            allies: vec![
                TestCombatantBuilder::ally("player").with_id("ally_0").with_moves(&["peck"]).build(),
                TestCombatantBuilder::ally("orvus").with_id("ally_1").with_health(0).build(),
            ],
            enemies: vec![TestCombatantBuilder::enemy("bark_beetle")
                .with_id("enemy_0")
                .with_moves(&["nibble"])
                .with_status(taunted)
                .build()],
            seed: 21,
        };
        let outcome = create_engine(setup, &BattleModifiers::new(), capped(1)).run();

        let bite = outcome
            .actions
            .iter()
            .find(|a| a.source == "enemy_0" && a.kind == ActionKind::Damage)
            .unwrap();
        assert_eq!(bite.targets, vec!["ally_0".to_string()]);
        assert!(outcome.actions.iter().all(|a| a.source != "ally_1"));
    }

    #[test]
    fn test_protect_without_allies_ends_the_turn_with_a_note() {
        let setup = BattleSetup {
            allies: vec![TestCombatantBuilder::ally("orvus")
                .with_id("ally_0")
                .with_moves(&["protect"])
                .build()],
            enemies: vec![idle_enemy("bark_beetle")],
            seed: 3,
        };
        let outcome = create_engine(setup, &BattleModifiers::new(), capped(1)).run();
        let turn: Vec<&str> = round_actions(&outcome.actions, 1)
            .into_iter()
            .filter(|a| a.source == "ally_0")
            .map(|a| a.message.as_str())
            .collect();
        assert_eq!(turn, vec!["Orvus has no valid targets!"]);
    }
}
