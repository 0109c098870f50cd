use crate::content::ContentLibrary;
use crate::errors::BattleResult;
use crate::rng::{SeededRng, WeightedTable};
use schema::{CombatantDef, Tier};
use std::sync::Arc;

/// Tier and headcount groups making up one line-up.
type Plan = &'static [(Tier, usize)];

/// Picks `count` enemies of a tier with replacement.
pub fn select_enemies(library: &ContentLibrary, tier: Tier, count: usize, rng: &mut SeededRng) -> Vec<Arc<CombatantDef>> {
    let pool = library.enemies_of_tier(tier);
    (0..count)
        .filter_map(|_| rng.choose(&pool).cloned())
        .collect()
}

const ONE_COMMON: Plan = &[(Tier::Common, 1)];
const TWO_COMMONS: Plan = &[(Tier::Common, 2)];
const THREE_COMMONS: Plan = &[(Tier::Common, 3)];
const ONE_ELITE: Plan = &[(Tier::Elite, 1)];
const ELITE_AND_COMMON: Plan = &[(Tier::Elite, 1), (Tier::Common, 1)];
const ELITE_AND_TWO_COMMONS: Plan = &[(Tier::Elite, 1), (Tier::Common, 2)];

/// Weighted line-up plans for the n-th battle of a run.
fn plans(battle_number: u32) -> (Vec<Plan>, Vec<f64>) {
    match battle_number {
        1 => (vec![ONE_COMMON, TWO_COMMONS], vec![0.7, 0.3]),
        2 => (vec![ONE_ELITE, TWO_COMMONS], vec![0.3, 0.7]),
        3 => (vec![ELITE_AND_COMMON, THREE_COMMONS], vec![0.5, 0.5]),
        4 => (vec![ELITE_AND_TWO_COMMONS], vec![1.0]),
        _ => (vec![ONE_COMMON], vec![1.0]),
    }
}

/// Enemy line-up for the n-th battle of a run. Battle 5 is the boss fight.
pub fn generate_encounter(
    library: &ContentLibrary,
    battle_number: u32,
    rng: &mut SeededRng,
) -> BattleResult<Vec<Arc<CombatantDef>>> {
    if battle_number == 5 {
        return Ok(vec![library.enemy("hollow_acorn")?, library.enemy("bark_beetle")?]);
    }

    let (items, weights) = plans(battle_number);
    let table = WeightedTable::new(items, weights)?;
    let plan = *rng.weighted_choose(&table);
    let encounter: Vec<Arc<CombatantDef>> = plan
        .iter()
        .flat_map(|&(tier, count)| select_enemies(library, tier, count, rng))
        .collect();

    tracing::debug!(
        battle_number,
        enemies = ?encounter.iter().map(|e| e.id.as_str()).collect::<Vec<_>>(),
        "generated encounter"
    );
    Ok(encounter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1..=2)]
    #[case(2, 1..=2)]
    #[case(3, 2..=3)]
    #[case(4, 3..=3)]
    #[case(5, 2..=2)]
    fn encounter_sizes(#[case] battle: u32, #[case] expected: std::ops::RangeInclusive<usize>) {
        let library = ContentLibrary::standard().unwrap();
        for seed in 0..20 {
            let mut rng = SeededRng::new(seed);
            let lineup = generate_encounter(library, battle, &mut rng).unwrap();
            assert!(expected.contains(&lineup.len()), "battle {} seed {}: {}", battle, seed, lineup.len());
        }
    }

    #[test]
    fn first_battle_draws_both_line_ups() {
        let library = ContentLibrary::standard().unwrap();
        let sizes: Vec<usize> = (0..64u32)
            .map(|i| {
                let mut rng = SeededRng::new(i.wrapping_mul(2_654_435_761));
                generate_encounter(library, 1, &mut rng).unwrap().len()
            })
            .collect();
        assert!(sizes.contains(&1));
        assert!(sizes.contains(&2));
    }

    #[test]
    fn boss_fight_is_fixed() {
        let library = ContentLibrary::standard().unwrap();
        let mut rng = SeededRng::new(3);
        let lineup = generate_encounter(library, 5, &mut rng).unwrap();
        let ids: Vec<&str> = lineup.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["hollow_acorn", "bark_beetle"]);
    }
}
