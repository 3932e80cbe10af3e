//! Scoreboard core
//!
//! All game logic lives here and has no rendering or device dependencies:
//! - Switch conditioning (cooldowns, edges)
//! - Event handlers and the score model
//! - Solenoid pulses behind the `PulseSink` seam
//! - Mode state machine, stepped once per frame by `tick`

pub mod debounce;
pub mod dispatch;
pub mod mode;
pub mod pulse;
pub mod state;
pub mod tick;

pub use debounce::{CooldownTracker, EdgeDetector};
pub use mode::{TestAction, TestInput, TestScreen, TestState, Trigger, transition};
pub use pulse::{PulseLog, PulseScheduler, PulseSink};
pub use state::{BankHit, DropTargetBank, GameEvent, GameMode, GameState, Rules, ScoreState};
pub use tick::{Command, TickInput, tick};
