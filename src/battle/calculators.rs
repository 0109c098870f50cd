//! Pure battle formulas.
//!
//! Nothing in here touches combatants or the random stream; the engine reads
//! the inputs, rolls against the returned chances and applies the results.

use crate::combatant::Combatant;
use schema::{MoveDef, StatKey};

pub const BASE_DODGE_CHANCE: f64 = 0.05;
pub const DODGE_PER_SPEED: f64 = 0.01;
pub const BASE_CRIT_CHANCE: f64 = 0.05;
pub const CRIT_PER_LUCK: f64 = 0.015;
pub const CRIT_MULTIPLIER: f64 = 1.5;
/// Power used when neither the move nor the action supplies one.
pub const DEFAULT_POWER: i32 = 10;

/// Every input to one damage evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInputs {
    pub power: i32,
    pub scaling_value: i32,
    pub defense: i32,
    pub damage_multiplier: f64,
    /// Fraction removed by a protection effect on the target.
    pub reduction: Option<f64>,
}

/// Intermediate and final damage figures, kept for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageBreakdown {
    pub raw: i32,
    pub mitigated: i32,
    pub final_damage: i32,
}

/// Base power for a damage action: the move's power, else the action's
/// value, else `DEFAULT_POWER`. Zero counts as missing.
pub fn base_power(move_def: &MoveDef, action_value: i32) -> i32 {
    match move_def.power {
        Some(power) if power != 0 => power,
        _ if action_value != 0 => action_value,
        _ => DEFAULT_POWER,
    }
}

pub fn scaling_stat(move_def: &MoveDef) -> StatKey {
    move_def.scaling.unwrap_or(StatKey::Strength)
}

pub fn damage_inputs(
    attacker: &Combatant,
    target: &Combatant,
    move_def: &MoveDef,
    action_value: i32,
    damage_multiplier: f64,
) -> DamageInputs {
    DamageInputs {
        power: base_power(move_def, action_value),
        scaling_value: attacker.stats.get(scaling_stat(move_def)),
        defense: target.stats.defense,
        damage_multiplier,
        reduction: crate::battle::status::damage_reduction(target),
    }
}

pub fn calculate_damage(inputs: DamageInputs) -> DamageBreakdown {
    let raw = inputs.power + inputs.scaling_value * 2;
    let mitigated = (raw - inputs.defense).max(1);
    let mut final_damage = (mitigated as f64 * inputs.damage_multiplier).floor() as i32;
    if let Some(reduction) = inputs.reduction {
        final_damage = (final_damage as f64 * (1.0 - reduction)).floor() as i32;
    }
    DamageBreakdown {
        raw,
        mitigated,
        final_damage,
    }
}

/// `dodge_bonus` is in percentage points.
pub fn dodge_chance(target_speed: i32, dodge_bonus: f64) -> f64 {
    BASE_DODGE_CHANCE + target_speed as f64 * DODGE_PER_SPEED + dodge_bonus / 100.0
}

/// `crit_bonus` is in percentage points.
pub fn crit_chance(attacker_luck: i32, crit_bonus: f64) -> f64 {
    BASE_CRIT_CHANCE + attacker_luck as f64 * CRIT_PER_LUCK + crit_bonus / 100.0
}

pub fn apply_crit(damage: i32) -> i32 {
    (damage as f64 * CRIT_MULTIPLIER).floor() as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::effects::fallback_move;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn inputs(power: i32, scaling_value: i32, defense: i32) -> DamageInputs {
        DamageInputs {
            power,
            scaling_value,
            defense,
            damage_multiplier: 1.0,
            reduction: None,
        }
    }

    #[test]
    fn reference_damage_example() {
        let breakdown = calculate_damage(inputs(10, 5, 2));
        assert_eq!(
            breakdown,
            DamageBreakdown {
                raw: 20,
                mitigated: 18,
                final_damage: 18
            }
        );
    }

    #[test]
    fn crit_floors_after_scaling() {
        assert_eq!(apply_crit(19), 28);
        assert_eq!(apply_crit(1), 1);
    }

    #[test]
    fn mitigation_never_drops_below_one() {
        let breakdown = calculate_damage(inputs(2, 0, 50));
        assert_eq!(breakdown.mitigated, 1);
        assert_eq!(breakdown.final_damage, 1);
    }

    #[rstest]
    #[case(1.0, None, 18)]
    #[case(1.25, None, 22)]
    #[case(1.0, Some(0.5), 9)]
    #[case(1.25, Some(0.5), 11)]
    #[case(0.0, None, 0)]
    fn multiplier_then_protection(#[case] multiplier: f64, #[case] reduction: Option<f64>, #[case] expected: i32) {
        let mut values = inputs(10, 5, 2);
        values.damage_multiplier = multiplier;
        values.reduction = reduction;
        assert_eq!(calculate_damage(values).final_damage, expected);
    }

    #[rstest]
    #[case(0, 0.0, 0.05)]
    #[case(10, 0.0, 0.15)]
    #[case(10, 5.0, 0.20)]
    fn dodge_chances(#[case] speed: i32, #[case] bonus: f64, #[case] expected: f64) {
        assert!((dodge_chance(speed, bonus) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case(0, 0.0, 0.05)]
    #[case(10, 0.0, 0.20)]
    #[case(10, 10.0, 0.30)]
    fn crit_chances(#[case] luck: i32, #[case] bonus: f64, #[case] expected: f64) {
        assert!((crit_chance(luck, bonus) - expected).abs() < 1e-9);
    }

    #[test]
    fn base_power_falls_through_zero_values() {
        let mut move_def = fallback_move("poke");
        assert_eq!(base_power(&move_def, 4), 10);
        move_def.power = None;
        assert_eq!(base_power(&move_def, 4), 4);
        assert_eq!(base_power(&move_def, 0), DEFAULT_POWER);
        move_def.power = Some(0);
        assert_eq!(base_power(&move_def, 7), 7);
    }
}
