//! Hardware capability layer
//!
//! The controller only sees two traits:
//! - `Switch`: a read-only "is pressed" input
//! - `Solenoid`: a binary actuator with on/off
//!
//! `Hardware::probe` picks real GPIO (feature `gpio`) or the no-op mock once at
//! startup. With the mock every switch reads released forever and every solenoid
//! call does nothing, so the rest of the game behaves the same either way.

#[cfg(feature = "gpio")]
pub mod gpio;
pub mod mock;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use crate::settings::PinMap;

pub use mock::{MockSolenoid, MockSwitch};

/// Identity of a physical input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SwitchId {
    /// Strike plate / standup target
    StrikePlate,
    /// Pop bumper (1-based, matches its gate)
    Bumper(u8),
    /// Drop target in the bank (0-based index)
    DropTarget(usize),
    /// Goal sensor behind the drop targets
    Goal,
    /// Ball trough sensor
    Drain,
    /// Service button (test mode entry)
    Service,
}

impl SwitchId {
    /// Every switch on a playfield with `drop_targets` targets, in display order
    pub fn all(drop_targets: usize) -> Vec<SwitchId> {
        let mut ids = vec![SwitchId::StrikePlate, SwitchId::Bumper(1), SwitchId::Bumper(2)];
        ids.extend((0..drop_targets).map(SwitchId::DropTarget));
        ids.extend([SwitchId::Goal, SwitchId::Drain, SwitchId::Service]);
        ids
    }
}

impl fmt::Display for SwitchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchId::StrikePlate => write!(f, "Strike Plate"),
            SwitchId::Bumper(n) => write!(f, "Bumper {n}"),
            SwitchId::DropTarget(i) => write!(f, "Drop Target {}", i + 1),
            SwitchId::Goal => write!(f, "Goal Sensor"),
            SwitchId::Drain => write!(f, "Ball Drain"),
            SwitchId::Service => write!(f, "Service Button"),
        }
    }
}

/// Identity of an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SolenoidId {
    /// Gate driven by a bumper (1-based, matches `SwitchId::Bumper`)
    Gate(u8),
    /// Drop-target bank reset coil
    BankReset,
}

impl SolenoidId {
    /// Every solenoid on the playfield, in display order
    pub const ALL: [SolenoidId; 3] = [SolenoidId::Gate(1), SolenoidId::Gate(2), SolenoidId::BankReset];
}

impl fmt::Display for SolenoidId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolenoidId::Gate(n) => write!(f, "Gate {n} (Bumper {n})"),
            SolenoidId::BankReset => write!(f, "Bank Reset"),
        }
    }
}

/// A physical input that can be polled
pub trait Switch: Send {
    /// Current level of the input
    fn is_pressed(&self) -> bool;

    /// Release the underlying pin
    fn close(&mut self) {}
}

/// A binary actuator. Calls are idempotent and may come from pulse tasks.
pub trait Solenoid: Send + Sync {
    fn on(&self);
    fn off(&self);

    /// Release the underlying pin (always leaves the coil off)
    fn close(&self) {
        self.off();
    }
}

/// Set of switches pressed during one poll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwitchSnapshot {
    pressed: BTreeSet<SwitchId>,
}

impl SwitchSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, id: SwitchId, pressed: bool) {
        if pressed {
            self.pressed.insert(id);
        } else {
            self.pressed.remove(&id);
        }
    }

    pub fn is_pressed(&self, id: SwitchId) -> bool {
        self.pressed.contains(&id)
    }
}

/// All switches of the cabinet
pub struct SwitchBank {
    switches: Vec<(SwitchId, Box<dyn Switch>)>,
}

impl SwitchBank {
    pub fn new(switches: Vec<(SwitchId, Box<dyn Switch>)>) -> Self {
        Self { switches }
    }

    /// Read every switch once
    pub fn poll(&self) -> SwitchSnapshot {
        let mut snapshot = SwitchSnapshot::new();
        for (id, switch) in &self.switches {
            snapshot.set(*id, switch.is_pressed());
        }
        snapshot
    }

    /// Single switch level (unknown switches read released)
    pub fn is_pressed(&self, id: SwitchId) -> bool {
        self.switches
            .iter()
            .find(|(sid, _)| *sid == id)
            .map(|(_, s)| s.is_pressed())
            .unwrap_or(false)
    }

    pub fn ids(&self) -> impl Iterator<Item = SwitchId> + '_ {
        self.switches.iter().map(|(id, _)| *id)
    }

    pub fn close(&mut self) {
        for (_, switch) in &mut self.switches {
            switch.close();
        }
    }
}

/// Switches and solenoids of the cabinet, plus where they came from
pub struct Hardware {
    pub switches: SwitchBank,
    pub solenoids: Vec<(SolenoidId, Arc<dyn Solenoid>)>,
    real: bool,
}

impl Hardware {
    pub fn from_parts(
        switches: SwitchBank,
        solenoids: Vec<(SolenoidId, Arc<dyn Solenoid>)>,
        real: bool,
    ) -> Self {
        let hardware = Self {
            switches,
            solenoids,
            real,
        };
        hardware.initialize_outputs();
        hardware
    }

    /// No-op hardware for a playfield with `drop_targets` targets
    pub fn mock(drop_targets: usize) -> Self {
        let switches = SwitchId::all(drop_targets)
            .into_iter()
            .map(|id| (id, Box::new(MockSwitch) as Box<dyn Switch>))
            .collect();
        let solenoids = SolenoidId::ALL
            .into_iter()
            .map(|id| (id, Arc::new(MockSolenoid) as Arc<dyn Solenoid>))
            .collect();
        Self::from_parts(SwitchBank::new(switches), solenoids, false)
    }

    /// Detect real hardware once, falling back wholesale to the mock
    pub fn probe(pins: &PinMap, force_mock: bool) -> Self {
        if force_mock {
            log::info!("Mock hardware forced, GPIO not probed");
            return Self::mock(pins.drop_targets.len());
        }

        #[cfg(feature = "gpio")]
        match gpio::open(pins) {
            Ok(hardware) => {
                log::info!("GPIO detected: running on cabinet hardware");
                return hardware;
            }
            Err(e) => log::warn!("{e}; using mock hardware"),
        }

        #[cfg(not(feature = "gpio"))]
        log::warn!("Built without the `gpio` feature; using mock hardware");

        Self::mock(pins.drop_targets.len())
    }

    /// True when switches and solenoids are wired to real pins
    pub fn is_real(&self) -> bool {
        self.real
    }

    /// Drive every solenoid off so nothing fires on boot
    pub fn initialize_outputs(&self) {
        for (_, solenoid) in &self.solenoids {
            solenoid.off();
        }
        if self.real {
            log::info!("All solenoid gates initialized to OFF");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_reads_released() {
        let hardware = Hardware::mock(3);
        assert!(!hardware.is_real());
        let snapshot = hardware.switches.poll();
        for id in SwitchId::all(3) {
            assert!(!snapshot.is_pressed(id));
        }
        assert_eq!(hardware.switches.ids().count(), 9);
        assert_eq!(hardware.solenoids.len(), 3);
    }

    #[test]
    fn test_probe_force_mock() {
        let hardware = Hardware::probe(&PinMap::default(), true);
        assert!(!hardware.is_real());
        assert!(!hardware.switches.is_pressed(SwitchId::Drain));
    }

    #[test]
    fn test_snapshot_set_and_clear() {
        let mut snapshot = SwitchSnapshot::new();
        snapshot.set(SwitchId::Goal, true);
        assert!(snapshot.is_pressed(SwitchId::Goal));
        snapshot.set(SwitchId::Goal, false);
        snapshot.set(SwitchId::DropTarget(2), true);
        assert!(!snapshot.is_pressed(SwitchId::Goal));
        assert!(snapshot.is_pressed(SwitchId::DropTarget(2)));
    }

    #[test]
    fn test_labels() {
        assert_eq!(SwitchId::DropTarget(0).to_string(), "Drop Target 1");
        assert_eq!(SolenoidId::Gate(2).to_string(), "Gate 2 (Bumper 2)");
    }
}
