//! Paced replay of a finished battle log for an async host.
//!
//! The engine never waits on presentation. A host that animates a battle hands
//! the outcome's action log to [`replay`], which walks it in order: every entry
//! is announced and awaited, each combatant turn is followed by the speed's turn
//! delay, and every round marker pings a state update.

use crate::battle::action::{BattleAction, RELIC_SOURCE, SYSTEM_SOURCE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use strum::{Display, EnumIter, EnumString};
use tracing::debug;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum PlaybackSpeed {
    #[default]
    Normal,
    Fast,
    Faster,
    Instant,
}

impl PlaybackSpeed {
    /// Pause after each turn. `None` replays without waiting.
    pub fn turn_delay(self) -> Option<Duration> {
        match self {
            PlaybackSpeed::Normal => Some(Duration::from_millis(800)),
            PlaybackSpeed::Fast => Some(Duration::from_millis(400)),
            PlaybackSpeed::Faster => Some(Duration::from_millis(200)),
            PlaybackSpeed::Instant => None,
        }
    }
}

/// The host side of a replay.
#[allow(async_fn_in_trait)]
pub trait PlaybackHost {
    fn on_action_start(&mut self, _action: &BattleAction) {}

    /// Resolves once the host has finished presenting `action`. Replay does
    /// not continue until it does.
    async fn wait_for_action(&mut self, _action: &BattleAction) {}

    fn on_state_update(&mut self, _round: u32) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlaybackSummary {
    pub actions: usize,
    pub turns: usize,
    pub rounds: u32,
}

fn is_combatant_entry(action: &BattleAction) -> bool {
    action.source != SYSTEM_SOURCE && action.source != RELIC_SOURCE
}

/// A turn is a contiguous run of entries from one combatant.
fn ends_turn(actions: &[BattleAction], index: usize) -> bool {
    let current = &actions[index];
    is_combatant_entry(current)
        && actions
            .get(index + 1)
            .map_or(true, |next| next.source != current.source)
}

pub async fn replay<H: PlaybackHost>(actions: &[BattleAction], speed: PlaybackSpeed, host: &mut H) -> PlaybackSummary {
    let mut summary = PlaybackSummary::default();
    for (index, action) in actions.iter().enumerate() {
        if action.is_round_marker() {
            summary.rounds += 1;
            host.on_state_update(summary.rounds);
        }

        host.on_action_start(action);
        host.wait_for_action(action).await;
        summary.actions += 1;

        if ends_turn(actions, index) {
            summary.turns += 1;
            if let Some(delay) = speed.turn_delay() {
                tokio::time::sleep(delay).await;
            }
        }
    }
    debug!(
        actions = summary.actions,
        turns = summary.turns,
        rounds = summary.rounds,
        speed = %speed,
        "playback finished"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::action::ActionKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::str::FromStr;
    use tokio::time::Instant;

    #[derive(Default)]
    struct RecordingHost {
        started: Vec<String>,
        awaited: usize,
        rounds: Vec<u32>,
    }

    impl PlaybackHost for RecordingHost {
        fn on_action_start(&mut self, action: &BattleAction) {
            self.started.push(action.message.clone());
        }

        async fn wait_for_action(&mut self, _action: &BattleAction) {
            tokio::time::sleep(Duration::from_millis(10)).await;
            self.awaited += 1;
        }

        fn on_state_update(&mut self, round: u32) {
            self.rounds.push(round);
        }
    }

    fn entry(source: &str, message: &str) -> BattleAction {
        let mut action = BattleAction::template(ActionKind::Damage, 5, message);
        action.source = source.to_string();
        action
    }

    fn sample_log() -> Vec<BattleAction> {
        let mut regen = BattleAction::template(ActionKind::Heal, 2, "Glider regenerates health!");
        regen.source = RELIC_SOURCE.to_string();
        vec![
            BattleAction::system("Battle begins!"),
            BattleAction::system("--- Round 1 ---"),
            entry("ally_0", "Glider uses Peck!"),
            entry("enemy_0", "Bark Beetle calls the swarm!"),
            entry("enemy_0", "Bark Beetle nibbles!"),
            regen,
            BattleAction::system("--- Round 2 ---"),
            entry("ally_0", "Glider uses Peck!"),
        ]
    }

    #[tokio::test(start_paused = true)]
    async fn normal_speed_waits_after_every_turn() {
        let log = sample_log();
        let mut host = RecordingHost::default();
        let started = Instant::now();

        let summary = replay(&log, PlaybackSpeed::Normal, &mut host).await;

        assert_eq!(
            summary,
            PlaybackSummary {
                actions: 8,
                turns: 3,
                rounds: 2
            }
        );
        assert_eq!(host.awaited, 8);
        assert_eq!(host.rounds, vec![1, 2]);
        assert_eq!(host.started[2], "Glider uses Peck!");
        assert_eq!(started.elapsed(), Duration::from_millis(3 * 800 + 8 * 10));
    }

    #[tokio::test(start_paused = true)]
    async fn instant_speed_only_waits_on_the_host() {
        let log = sample_log();
        let mut host = RecordingHost::default();
        let started = Instant::now();

        replay(&log, PlaybackSpeed::Instant, &mut host).await;

        assert_eq!(started.elapsed(), Duration::from_millis(8 * 10));
    }

    #[rstest]
    #[case(PlaybackSpeed::Normal, Some(800))]
    #[case(PlaybackSpeed::Fast, Some(400))]
    #[case(PlaybackSpeed::Faster, Some(200))]
    #[case(PlaybackSpeed::Instant, None)]
    fn turn_delays(#[case] speed: PlaybackSpeed, #[case] millis: Option<u64>) {
        assert_eq!(speed.turn_delay(), millis.map(Duration::from_millis));
    }

    #[test]
    fn speeds_parse_from_lowercase_names() {
        assert_eq!(PlaybackSpeed::from_str("faster").unwrap(), PlaybackSpeed::Faster);
        assert_eq!(PlaybackSpeed::Instant.to_string(), "instant");
    }
}
