//! All-time high score
//!
//! Persisted as a plain-text file holding one integer. Written every time the
//! running score beats it, so an unclean shutdown never loses a record.

use std::path::PathBuf;

use crate::error::{Error, Result};

/// The persisted all-time high score
#[derive(Debug, Clone, Default)]
pub struct HighScore {
    best: u64,
    /// Backing file (None keeps the score in memory only)
    path: Option<PathBuf>,
}

impl HighScore {
    /// High score that is never written to disk
    pub fn in_memory(best: u64) -> Self {
        Self { best, path: None }
    }

    /// Load from a file. Missing or malformed content counts as zero.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match std::fs::read_to_string(&path) {
            Ok(text) => match text.trim().parse::<u64>() {
                Ok(value) => {
                    log::info!("Loaded high score {} from {}", value, path.display());
                    value
                }
                Err(_) => {
                    log::warn!("Malformed high score in {}, starting at 0", path.display());
                    0
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No high score at {}, starting fresh", path.display());
                0
            }
            Err(e) => {
                log::warn!("{}", Error::io(&path, e));
                0
            }
        };
        Self {
            best,
            path: Some(path),
        }
    }

    /// Current all-time best
    pub fn value(&self) -> u64 {
        self.best
    }

    /// Record a score. Returns true (and persists) when it beats the best.
    pub fn submit(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Err(e) = self.save() {
            log::warn!("High score not saved: {e}");
        }
        true
    }

    /// Overwrite the backing file with the current best
    pub fn save(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        std::fs::write(path, self.best.to_string()).map_err(|e| Error::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_zero_then_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pinball_highscore.txt");

        let mut high = HighScore::load(&path);
        assert_eq!(high.value(), 0);

        assert!(high.submit(1500));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1500");
    }

    #[test]
    fn test_malformed_file_is_zero() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.txt");
        std::fs::write(&path, "lots").unwrap();
        assert_eq!(HighScore::load(&path).value(), 0);
    }

    #[test]
    fn test_reads_trimmed_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.txt");
        std::fs::write(&path, "  4200\n").unwrap();
        assert_eq!(HighScore::load(&path).value(), 4200);
    }

    #[test]
    fn test_lower_score_does_not_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hs.txt");
        std::fs::write(&path, "9000").unwrap();

        let mut high = HighScore::load(&path);
        assert!(!high.submit(8000));
        assert!(!high.submit(9000));
        assert_eq!(high.value(), 9000);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "9000");
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be written as a file
        let mut high = HighScore::load(dir.path());
        assert!(high.submit(100));
        assert_eq!(high.value(), 100);
        assert!(high.save().is_err());
    }
}
