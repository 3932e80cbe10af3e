//! Solenoid pulse scheduling
//!
//! A pulse is on → hold → off. Each one runs as its own task on a small tokio
//! runtime so the frame loop never waits for a coil. Pulses are fire-and-forget:
//! nothing is returned, nothing is retried, and a mode change never cancels one.
//! Shutdown waits for every pulse still in flight before releasing the coils.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use tokio::runtime::Runtime;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};
use crate::hardware::{Solenoid, SolenoidId};

/// Something that can fire solenoid pulses
///
/// Game logic talks to this instead of the scheduler so it can be driven
/// without a runtime.
pub trait PulseSink {
    /// Fire unconditionally (gameplay)
    fn fire_pulse(&mut self, id: SolenoidId, duration: Duration, now: Instant);

    /// Fire only if the solenoid's minimum re-fire interval has passed since
    /// its last guarded fire. Gameplay pulses do not count against it.
    /// Returns false (and does nothing) when refused.
    fn fire_guarded(&mut self, id: SolenoidId, duration: Duration, now: Instant) -> bool;
}

struct SolenoidSlot {
    device: Arc<dyn Solenoid>,
    energized: Arc<AtomicBool>,
    last_guarded: Option<Instant>,
}

/// Runs solenoid pulses without blocking the caller
pub struct PulseScheduler {
    runtime: Option<Runtime>,
    slots: BTreeMap<SolenoidId, SolenoidSlot>,
    in_flight: Vec<JoinHandle<()>>,
    min_refire: Duration,
}

impl PulseScheduler {
    /// Take ownership of the solenoids and start the pulse executor
    pub fn new(
        solenoids: Vec<(SolenoidId, Arc<dyn Solenoid>)>,
        min_refire: Duration,
    ) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("solenoid-pulse")
            .enable_time()
            .build()
            .map_err(Error::Executor)?;

        let slots = solenoids
            .into_iter()
            .map(|(id, device)| {
                let slot = SolenoidSlot {
                    device,
                    energized: Arc::new(AtomicBool::new(false)),
                    last_guarded: None,
                };
                (id, slot)
            })
            .collect();

        Ok(Self {
            runtime: Some(runtime),
            slots,
            in_flight: Vec::new(),
            min_refire,
        })
    }

    /// Solenoids under this scheduler, in display order
    pub fn ids(&self) -> impl Iterator<Item = SolenoidId> + '_ {
        self.slots.keys().copied()
    }

    /// True while a pulse holds the coil on
    pub fn is_energized(&self, id: SolenoidId) -> bool {
        self.slots
            .get(&id)
            .is_some_and(|slot| slot.energized.load(Ordering::SeqCst))
    }

    /// Number of pulses that have not finished yet
    pub fn in_flight(&self) -> usize {
        self.in_flight.iter().filter(|h| !h.is_finished()).count()
    }

    /// Block until every submitted pulse has completed
    pub fn wait_idle(&mut self) {
        let handles = std::mem::take(&mut self.in_flight);
        if let Some(runtime) = &self.runtime {
            runtime.block_on(async {
                for handle in handles {
                    if let Err(e) = handle.await {
                        log::warn!("Solenoid pulse task failed: {e}");
                    }
                }
            });
        }
    }

    /// Finish in-flight pulses, release every coil and stop the executor
    pub fn shutdown(&mut self) {
        if self.runtime.is_none() {
            return;
        }
        self.wait_idle();
        for slot in self.slots.values() {
            slot.device.close();
        }
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
        log::info!("Solenoids released");
    }

    fn spawn(&mut self, id: SolenoidId, duration: Duration) {
        let Some(runtime) = &self.runtime else {
            log::warn!("Pulse on {id} after shutdown ignored");
            return;
        };
        let Some(slot) = self.slots.get_mut(&id) else {
            log::warn!("No solenoid {id} on this cabinet");
            return;
        };

        let device = Arc::clone(&slot.device);
        let energized = Arc::clone(&slot.energized);
        log::debug!("[SOLENOID] ON {id} for {duration:?}");
        let handle = runtime.spawn(async move {
            energized.store(true, Ordering::SeqCst);
            device.on();
            tokio::time::sleep(duration).await;
            device.off();
            energized.store(false, Ordering::SeqCst);
            log::debug!("[SOLENOID] OFF {id}");
        });

        self.in_flight.retain(|h| !h.is_finished());
        self.in_flight.push(handle);
    }
}

impl PulseSink for PulseScheduler {
    fn fire_pulse(&mut self, id: SolenoidId, duration: Duration, _now: Instant) {
        self.spawn(id, duration);
    }

    fn fire_guarded(&mut self, id: SolenoidId, duration: Duration, now: Instant) -> bool {
        let Some(slot) = self.slots.get_mut(&id) else {
            log::warn!("No solenoid {id} on this cabinet");
            return false;
        };
        let ready = match slot.last_guarded {
            Some(last) => now.saturating_duration_since(last) >= self.min_refire,
            None => true,
        };
        if ready {
            slot.last_guarded = Some(now);
            self.spawn(id, duration);
        } else {
            log::debug!("[SOLENOID] {id} refire refused (cooldown)");
        }
        ready
    }
}

impl Drop for PulseScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Pulse sink that only records requests
#[derive(Debug, Default)]
pub struct PulseLog {
    pub fired: Vec<(SolenoidId, Duration)>,
    last_guarded: BTreeMap<SolenoidId, Instant>,
    min_refire: Duration,
}

impl PulseLog {
    pub fn new(min_refire: Duration) -> Self {
        Self {
            min_refire,
            ..Default::default()
        }
    }

    pub fn count(&self, id: SolenoidId) -> usize {
        self.fired.iter().filter(|(fired, _)| *fired == id).count()
    }
}

impl PulseSink for PulseLog {
    fn fire_pulse(&mut self, id: SolenoidId, duration: Duration, _now: Instant) {
        self.fired.push((id, duration));
    }

    fn fire_guarded(&mut self, id: SolenoidId, duration: Duration, now: Instant) -> bool {
        if let Some(&last) = self.last_guarded.get(&id) {
            if now.saturating_duration_since(last) < self.min_refire {
                return false;
            }
        }
        self.last_guarded.insert(id, now);
        self.fire_pulse(id, duration, now);
        true
    }
}
