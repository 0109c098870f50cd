use serde::{Deserialize, Serialize};

pub const VICTORY_BASE_ACORNS: u32 = 15;
pub const ACORNS_PER_ENEMY: u32 = 10;
pub const BONUS_MEMBER_FACTOR: f64 = 1.1;
pub const SECONDARY_SHARE: f64 = 0.5;
pub const PERFECT_VICTORY_FACTOR: f64 = 1.5;
pub const DEFEAT_BASE: u32 = 15;
pub const DEFEAT_PER_ENEMY: u32 = 5;
pub const DEFEAT_SHARE: f64 = 0.25;
pub const VICTORY_EXPERIENCE: u32 = 50;

/// What the reward formula looks at once a battle has ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardInputs {
    pub victory: bool,
    /// Enemy combatants in the working list at the end of the battle.
    pub enemy_count: u32,
    /// A party member with the bonus-acorn passive took part.
    pub bonus_member: bool,
    pub acorn_drop_multiplier: f64,
    /// No damage was applied to any ally during the battle.
    pub perfect: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rewards {
    pub acorns: u32,
    pub secondary: u32,
    pub experience: u32,
}

fn floor_mul(value: u32, factor: f64) -> u32 {
    (value as f64 * factor).floor().max(0.0) as u32
}

pub fn calculate_rewards(inputs: RewardInputs) -> Rewards {
    if !inputs.victory {
        let consolation = DEFEAT_BASE + DEFEAT_PER_ENEMY * inputs.enemy_count;
        return Rewards {
            acorns: 0,
            secondary: floor_mul(consolation, DEFEAT_SHARE),
            experience: 0,
        };
    }

    let mut acorns = VICTORY_BASE_ACORNS + ACORNS_PER_ENEMY * inputs.enemy_count;
    if inputs.bonus_member {
        acorns = floor_mul(acorns, BONUS_MEMBER_FACTOR);
    }
    acorns = floor_mul(acorns, inputs.acorn_drop_multiplier);

    let mut secondary = floor_mul(acorns, SECONDARY_SHARE);
    if inputs.perfect {
        secondary = floor_mul(secondary, PERFECT_VICTORY_FACTOR);
    }

    Rewards {
        acorns,
        secondary,
        experience: VICTORY_EXPERIENCE,
    }
}
