//! No-op hardware used when GPIO is unavailable

use super::{Solenoid, Switch};

/// Switch that is never pressed
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSwitch;

impl Switch for MockSwitch {
    fn is_pressed(&self) -> bool {
        false
    }
}

/// Solenoid that ignores every command
#[derive(Debug, Default, Clone, Copy)]
pub struct MockSolenoid;

impl Solenoid for MockSolenoid {
    fn on(&self) {}
    fn off(&self) {}
}

#[cfg(test)]
pub(crate) mod testing {
    //! Observable stand-ins for switch/solenoid tests

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use super::super::{Solenoid, Switch};

    /// Switch whose level is set from the test
    #[derive(Debug, Default, Clone)]
    pub struct SharedSwitch(pub Arc<AtomicBool>);

    impl SharedSwitch {
        pub fn press(&self, pressed: bool) {
            self.0.store(pressed, Ordering::SeqCst);
        }
    }

    impl Switch for SharedSwitch {
        fn is_pressed(&self) -> bool {
            self.0.load(Ordering::SeqCst)
        }
    }

    /// Solenoid that records every level change
    #[derive(Debug, Default)]
    pub struct RecordingSolenoid {
        pub levels: Mutex<Vec<bool>>,
    }

    impl RecordingSolenoid {
        pub fn levels(&self) -> Vec<bool> {
            self.levels.lock().unwrap().clone()
        }

        /// Number of completed on→off pulses
        pub fn pulses(&self) -> usize {
            self.levels().windows(2).filter(|w| w[0] && !w[1]).count()
        }
    }

    impl Solenoid for RecordingSolenoid {
        fn on(&self) {
            self.levels.lock().unwrap().push(true);
        }

        fn off(&self) {
            self.levels.lock().unwrap().push(false);
        }
    }
}
