//! Audio collaborator
//!
//! The controller only asks for sounds by name. Whatever produces them lives
//! behind `AudioSink`; with no sink (device missing, files failed to load)
//! every call is a no-op.

use std::fmt;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Strike plate hit
    Hit,
    /// Bumper hit
    Bumper,
    /// Goal scored / jackpot
    Jackpot,
}

impl SoundEffect {
    /// Sounds offered in the diagnostic audio screen
    pub const ALL: [SoundEffect; 3] = [SoundEffect::Hit, SoundEffect::Bumper, SoundEffect::Jackpot];

    /// Asset name of the effect
    pub fn name(&self) -> &'static str {
        match self {
            SoundEffect::Hit => "hit",
            SoundEffect::Bumper => "bumper",
            SoundEffect::Jackpot => "jackpot",
        }
    }
}

impl fmt::Display for SoundEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Backend that actually produces sound
pub trait AudioSink: Send {
    /// Play a one-shot effect at the given volume (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);

    /// Start or pause the ambient music loops
    fn set_music_playing(&mut self, playing: bool);

    /// Music volume (0.0 - 1.0)
    fn set_music_volume(&mut self, volume: f32);
}

/// Sink that only logs what would be played
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("[AUDIO] play {effect} (vol={volume:.2})");
    }

    fn set_music_playing(&mut self, playing: bool) {
        log::debug!("[AUDIO] music {}", if playing { "on" } else { "off" });
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("[AUDIO] music volume {volume:.2}");
    }
}

/// Audio manager for the scoreboard
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    music_on: bool,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(sink: Option<Box<dyn AudioSink>>) -> Self {
        if sink.is_none() {
            log::warn!("No audio output - sounds disabled");
        }
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.6,
            music_on: false,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
        let vol = self.music_volume;
        if let Some(sink) = &mut self.sink {
            sink.set_music_volume(vol);
        }
    }

    pub fn music_volume(&self) -> f32 {
        self.music_volume
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = &mut self.sink else { return };
        sink.play(effect, vol);
    }

    /// Start the ambient music loops
    pub fn start_music(&mut self) {
        self.set_music(true);
    }

    /// Toggle music, returning the new state
    pub fn toggle_music(&mut self) -> bool {
        self.set_music(!self.music_on);
        self.music_on
    }

    fn set_music(&mut self, on: bool) {
        self.music_on = on;
        log::info!("Music {}", if on { "ON" } else { "OFF" });
        if let Some(sink) = &mut self.sink {
            sink.set_music_playing(on);
        }
    }

    pub fn music_on(&self) -> bool {
        self.music_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<String>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect, volume: f32) {
            self.0.lock().unwrap().push(format!("{effect}@{volume:.2}"));
        }
        fn set_music_playing(&mut self, playing: bool) {
            self.0.lock().unwrap().push(format!("music:{playing}"));
        }
        fn set_music_volume(&mut self, volume: f32) {
            self.0.lock().unwrap().push(format!("musicvol:{volume:.1}"));
        }
    }

    #[test]
    fn test_no_sink_is_noop() {
        let mut audio = AudioManager::new(None);
        audio.play(SoundEffect::Hit);
        assert!(audio.toggle_music());
    }

    #[test]
    fn test_volume_and_mute() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Some(Box::new(recorder.clone())));
        audio.set_master_volume(0.5);
        audio.set_sfx_volume(2.0);
        audio.play(SoundEffect::Bumper);
        audio.set_muted(true);
        audio.play(SoundEffect::Jackpot);
        assert_eq!(*recorder.0.lock().unwrap(), vec!["bumper@0.50".to_string()]);
    }

    #[test]
    fn test_music_toggle_and_volume() {
        let recorder = Recorder::default();
        let mut audio = AudioManager::new(Some(Box::new(recorder.clone())));
        audio.start_music();
        assert!(!audio.toggle_music());
        audio.set_music_volume(-1.0);
        assert_eq!(audio.music_volume(), 0.0);
        assert_eq!(
            *recorder.0.lock().unwrap(),
            vec!["music:true", "music:false", "musicvol:0.0"]
        );
    }
}
