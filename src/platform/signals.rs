//! Process signals
//!
//! SIGINT/SIGTERM only raise the quit flag; the frame loop sees it at the top
//! of the next frame and runs the normal shutdown (pulses drained, coils off).

use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared "please stop" flag
#[derive(Debug, Clone, Default)]
pub struct QuitFlag(Arc<AtomicBool>);

impl QuitFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Raise `quit` on the first SIGINT or SIGTERM
pub fn watch_signals(quit: QuitFlag) -> io::Result<()> {
    std::thread::Builder::new()
        .name("signal-watch".into())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(e) => {
                    log::warn!("Signal handling unavailable: {e}");
                    return;
                }
            };
            match runtime.block_on(wait_for_signal()) {
                Ok(name) => {
                    log::info!("{name} received, shutting down");
                    quit.request();
                }
                Err(e) => log::warn!("Signal handling unavailable: {e}"),
            }
        })?;
    Ok(())
}

#[cfg(unix)]
async fn wait_for_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        result = tokio::signal::ctrl_c() => result.map(|()| "SIGINT"),
        _ = terminate.recv() => Ok("SIGTERM"),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await.map(|()| "Ctrl+C")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_the_flag() {
        let quit = QuitFlag::new();
        let handler = quit.clone();
        assert!(!quit.is_requested());
        handler.request();
        assert!(quit.is_requested());
    }
}
