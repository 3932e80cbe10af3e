//! Playfield event handlers
//!
//! One handler per physical event. Each combines an acceptance check, a score
//! change, a high-score sync and (sometimes) a solenoid pulse. Handlers are
//! called from `tick` for both switch polls and operator keys.

use std::time::Instant;

use super::pulse::PulseSink;
use super::state::{BankHit, GameEvent, GameState};
use crate::consts::PROGRESS_LEN;
use crate::hardware::{SolenoidId, SwitchId};

impl GameState {
    fn award(&mut self, points: u64) {
        if self.score.award(points) {
            let best = self.score.high_score.value();
            self.emit(GameEvent::NewHighScore(best));
        }
    }

    /// Strike plate hit: +500 once per cooldown window
    pub fn on_target_hit(&mut self, now: Instant) -> bool {
        if !self.cooldowns.accept(SwitchId::StrikePlate, now) {
            return false;
        }
        self.award(self.rules.target_award);
        log::debug!("Target hit! +{}", self.rules.target_award);
        self.emit(GameEvent::TargetHit);
        true
    }

    /// Bumper hit: +100 once per cooldown window and a kick from its gate
    pub fn on_bumper_hit(&mut self, bumper: u8, now: Instant, pulses: &mut dyn PulseSink) -> bool {
        if !self.cooldowns.accept(SwitchId::Bumper(bumper), now) {
            return false;
        }
        self.award(self.rules.bumper_award);
        log::debug!("Bumper {bumper} hit! +{}", self.rules.bumper_award);
        self.emit(GameEvent::BumperHit(bumper));
        pulses.fire_pulse(SolenoidId::Gate(bumper), self.rules.bumper_pulse, now);
        true
    }

    /// Goal scored: +2000 and one letter, every call
    pub fn on_goal_scored(&mut self, now: Instant) {
        self.award(self.rules.goal_award);
        let complete = self.score.advance_progress();
        log::debug!("GOAL! Letters: {}/{}", self.score.collected, PROGRESS_LEN);
        self.emit(GameEvent::GoalScored {
            collected: self.score.collected,
        });
        if complete {
            self.award_jackpot(now);
        }
    }

    /// Collect a letter without the goal award (operator test key)
    pub fn on_advance_progress(&mut self, now: Instant) {
        let complete = self.score.advance_progress();
        self.emit(GameEvent::ProgressAdvanced {
            collected: self.score.collected,
        });
        if complete {
            self.award_jackpot(now);
        }
    }

    /// Token complete: bonus, then letters and flag cleared in the same call
    fn award_jackpot(&mut self, now: Instant) {
        self.score.jackpot = true;
        self.award(self.rules.jackpot_bonus);
        log::info!("MEGA JACKPOT! +{}", self.rules.jackpot_bonus);
        self.emit(GameEvent::Jackpot);
        self.score.last_jackpot = Some(now);

        self.score.collected = 0;
        self.score.jackpot = false;
    }

    /// One drop target went down. Completing the bank fires the reset coil.
    pub fn on_drop_target_hit(&mut self, index: usize, now: Instant, pulses: &mut dyn PulseSink) -> BankHit {
        let hit = self.bank.mark_down(index, now);
        match hit {
            BankHit::Down => {
                log::debug!("Drop target {} DOWN", index + 1);
                self.emit(GameEvent::DropTargetDown(index));
            }
            BankHit::Completed => {
                log::debug!("Drop target {} DOWN", index + 1);
                self.emit(GameEvent::DropTargetDown(index));
                log::info!("All drop targets down! Resetting bank");
                pulses.fire_pulse(SolenoidId::BankReset, self.rules.bank_reset_pulse, now);
                self.emit(GameEvent::BankReset);
            }
            BankHit::AlreadyDown | BankHit::Ignored => {}
        }
        hit
    }

    /// Ball reached the trough
    pub fn on_ball_drained(&mut self) {
        let balls_left = self.score.drain_ball();
        log::info!("Ball drained, balls left = {balls_left}");
        self.emit(GameEvent::BallDrained { balls_left });
    }

    /// Start over, keeping the high score
    pub fn reset_round(&mut self) {
        self.score.reset_round();
        self.bank.reset();
        self.emit(GameEvent::RoundReset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::JACKPOT_BONUS;
    use crate::highscores::HighScore;
    use crate::sim::pulse::PulseLog;
    use crate::sim::state::Rules;
    use proptest::prelude::*;
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn state() -> GameState {
        GameState::new(Rules::default(), HighScore::in_memory(0))
    }

    #[test]
    fn test_target_hit_scenario() {
        let t0 = Instant::now();
        let mut state = state();
        assert!(state.on_target_hit(t0));
        assert!(!state.on_target_hit(t0 + ms(300)));
        assert_eq!(state.score.score, 500);
        assert!(state.on_target_hit(t0 + ms(500)));
        assert_eq!(state.score.score, 1000);
    }

    #[test]
    fn test_bumper_fires_its_gate() {
        let t0 = Instant::now();
        let mut state = state();
        let mut pulses = PulseLog::default();
        assert!(state.on_bumper_hit(2, t0, &mut pulses));
        assert!(!state.on_bumper_hit(2, t0 + ms(100), &mut pulses));
        assert!(state.on_bumper_hit(1, t0 + ms(100), &mut pulses));
        assert_eq!(state.score.score, 200);
        assert_eq!(pulses.fired, vec![(SolenoidId::Gate(2), ms(100)), (SolenoidId::Gate(1), ms(100))]);
    }

    #[test]
    fn test_seven_goals_award_one_jackpot() {
        let t0 = Instant::now();
        let mut state = state();
        for i in 0..PROGRESS_LEN {
            state.on_goal_scored(t0);
            if i < PROGRESS_LEN - 1 {
                assert_eq!(state.score.collected, i + 1);
            }
        }
        assert_eq!(state.score.collected, 0);
        assert!(!state.score.jackpot);
        assert_eq!(state.score.score, 7 * 2000 + JACKPOT_BONUS);
        let jackpots = state.events.iter().filter(|e| **e == GameEvent::Jackpot).count();
        assert_eq!(jackpots, 1);
        assert!(state.score.jackpot_banner(t0));
    }

    #[test]
    fn test_advance_progress_has_no_goal_award() {
        let t0 = Instant::now();
        let mut state = state();
        for _ in 0..PROGRESS_LEN {
            state.on_advance_progress(t0);
        }
        assert_eq!(state.score.score, JACKPOT_BONUS);
        assert_eq!(state.score.collected, 0);
    }

    #[test]
    fn test_drop_bank_fires_one_reset() {
        let t0 = Instant::now();
        let mut state = state();
        let mut pulses = PulseLog::default();
        assert_eq!(state.on_drop_target_hit(0, t0, &mut pulses), BankHit::Down);
        assert_eq!(state.on_drop_target_hit(0, t0, &mut pulses), BankHit::AlreadyDown);
        assert_eq!(state.on_drop_target_hit(1, t0, &mut pulses), BankHit::Down);
        assert!(pulses.fired.is_empty());
        assert_eq!(state.on_drop_target_hit(2, t0, &mut pulses), BankHit::Completed);
        assert_eq!(pulses.fired, vec![(SolenoidId::BankReset, ms(250))]);
        assert_eq!(state.bank.flags(), &[false, false, false]);

        assert_eq!(state.on_drop_target_hit(0, t0 + ms(500), &mut pulses), BankHit::Down);
        assert_eq!(pulses.count(SolenoidId::BankReset), 1);
    }

    #[test]
    fn test_new_high_score_event() {
        let t0 = Instant::now();
        let mut state = GameState::new(Rules::default(), HighScore::in_memory(800));
        state.on_target_hit(t0);
        assert!(!state.events.contains(&GameEvent::NewHighScore(500)));
        state.on_goal_scored(t0);
        assert!(state.events.contains(&GameEvent::NewHighScore(2500)));
    }

    #[test]
    fn test_reset_round() {
        let t0 = Instant::now();
        let mut state = state();
        let mut pulses = PulseLog::default();
        state.on_goal_scored(t0);
        state.on_drop_target_hit(1, t0, &mut pulses);
        state.on_ball_drained();
        state.reset_round();
        assert_eq!(state.score.score, 0);
        assert_eq!(state.score.balls_left, 2);
        assert_eq!(state.score.collected, 0);
        assert!(!state.bank.is_down(1));
        assert_eq!(state.high_score(), 2000);
    }

    #[derive(Debug, Clone)]
    enum Action {
        Target(u64),
        Bumper(u8, u64),
        Goal,
        Advance,
        Drop(usize),
        Drain,
    }

    fn action() -> impl Strategy<Value = Action> {
        prop_oneof![
            (0u64..600).prop_map(Action::Target),
            (1u8..=2, 0u64..600).prop_map(|(b, gap)| Action::Bumper(b, gap)),
            Just(Action::Goal),
            Just(Action::Advance),
            (0usize..3).prop_map(Action::Drop),
            Just(Action::Drain),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_and_high_score_never_decrease(actions in proptest::collection::vec(action(), 0..80)) {
            let mut now = Instant::now();
            let mut state = state();
            let mut pulses = PulseLog::default();
            let mut prev_score = 0;
            let mut prev_high = 0;
            let allowed = [0, 100, 500, 2000, 10_000, 12_000];
            for action in actions {
                match action {
                    Action::Target(gap) => { now += ms(gap); state.on_target_hit(now); }
                    Action::Bumper(b, gap) => { now += ms(gap); state.on_bumper_hit(b, now, &mut pulses); }
                    Action::Goal => state.on_goal_scored(now),
                    Action::Advance => state.on_advance_progress(now),
                    Action::Drop(i) => { state.on_drop_target_hit(i, now, &mut pulses); }
                    Action::Drain => state.on_ball_drained(),
                }
                let delta = state.score.score - prev_score;
                prop_assert!(allowed.contains(&delta), "unexpected award {}", delta);
                prop_assert!(state.high_score() >= prev_high);
                prop_assert!(state.high_score() >= state.score.score);
                prop_assert!(state.score.collected < PROGRESS_LEN);
                prev_score = state.score.score;
                prev_high = state.high_score();
            }
        }

        #[test]
        fn prop_no_bonus_before_n_goals(goals in 0u32..PROGRESS_LEN) {
            let t0 = Instant::now();
            let mut state = state();
            for _ in 0..goals {
                state.on_goal_scored(t0);
            }
            prop_assert_eq!(state.score.score, u64::from(goals) * 2000);
            prop_assert!(!state.events.contains(&GameEvent::Jackpot));
        }
    }
}
