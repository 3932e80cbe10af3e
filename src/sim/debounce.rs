//! Switch conditioning
//!
//! Two policies for turning raw switch levels into game events:
//! - `CooldownTracker`: level-triggered, at most one accepted event per cooldown
//!   window. A switch held past the window fires again. Used for momentary
//!   contacts that bounce (strike plate, bumpers).
//! - `EdgeDetector`: fires once per released→pressed transition, no re-arm by
//!   time. Used for drop targets, the ball drain and the service button.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Per-input minimum re-trigger interval
#[derive(Debug, Clone)]
pub struct CooldownTracker<K> {
    last_accepted: HashMap<K, Instant>,
    cooldowns: HashMap<K, Duration>,
}

impl<K> Default for CooldownTracker<K> {
    fn default() -> Self {
        Self {
            last_accepted: HashMap::new(),
            cooldowns: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> CooldownTracker<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the cooldown used by `accept`
    pub fn with_cooldown(mut self, key: K, cooldown: Duration) -> Self {
        self.cooldowns.insert(key, cooldown);
        self
    }

    /// Configured cooldown (zero when none was set)
    pub fn cooldown(&self, key: K) -> Duration {
        self.cooldowns.get(&key).copied().unwrap_or_default()
    }

    /// Accept an event using the configured cooldown for `key`
    pub fn accept(&mut self, key: K, now: Instant) -> bool {
        let cooldown = self.cooldown(key);
        self.try_accept(key, now, cooldown)
    }

    /// Accept iff `now - last_accepted(key) >= cooldown`, recording `now` on success.
    /// A key never accepted before is always accepted. Rejection changes nothing.
    pub fn try_accept(&mut self, key: K, now: Instant, cooldown: Duration) -> bool {
        if let Some(&last) = self.last_accepted.get(&key) {
            if now.saturating_duration_since(last) < cooldown {
                return false;
            }
        }
        self.last_accepted.insert(key, now);
        true
    }

    /// Time of the last accepted event
    pub fn last_accepted(&self, key: K) -> Option<Instant> {
        self.last_accepted.get(&key).copied()
    }
}

/// Released→pressed transition tracking
#[derive(Debug, Clone)]
pub struct EdgeDetector<K> {
    was_pressed: HashMap<K, bool>,
}

impl<K> Default for EdgeDetector<K> {
    fn default() -> Self {
        Self {
            was_pressed: HashMap::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> EdgeDetector<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current level; true only when it just went down
    pub fn rising(&mut self, key: K, pressed: bool) -> bool {
        let was = self.was_pressed.insert(key, pressed).unwrap_or(false);
        pressed && !was
    }
}
