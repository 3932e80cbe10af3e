//! Platform abstraction layer
//!
//! Handles the host side of the cabinet:
//! - Operator keyboard input (crossterm key events → commands)
//! - System health for the diagnostic status screen
//! - SIGINT/SIGTERM → quit flag

pub mod input;
pub mod signals;
pub mod status;

pub use input::{command_for, poll_commands};
pub use signals::{QuitFlag, watch_signals};
pub use status::{SystemStatus, format_uptime};
