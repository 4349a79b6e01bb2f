//! Progress spinner on stderr while network calls run.

use std::io::{IsTerminal as _, Write as _};
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel::{Sender, bounded};

/// 8-dot braille frames, same set the gh CLI uses.
const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

const FRAME_INTERVAL: Duration = Duration::from_millis(120);

/// Animates on stderr until stopped or dropped. Does nothing when stderr is
/// not a terminal, so redirected output stays clean.
pub struct Spinner {
    quit: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Spinner {
    pub fn start(msg: &str) -> Self {
        if !std::io::stderr().is_terminal() {
            return Self {
                quit: None,
                handle: None,
            };
        }

        let msg = msg.to_string();
        let (tx, rx) = bounded::<()>(1);
        let handle = std::thread::spawn(move || {
            // Locks per write so other threads can still reach stderr.
            let mut stderr = std::io::stderr();
            for frame in FRAMES.iter().cycle() {
                let _ = write!(stderr, "\r{frame} {msg}");
                let _ = stderr.flush();
                match rx.recv_timeout(FRAME_INTERVAL) {
                    // Explicit quit and a dropped sender both end the animation.
                    Ok(()) | Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => {}
                }
            }
            let _ = write!(stderr, "\r\x1b[K");
            let _ = stderr.flush();
        });

        Self {
            quit: Some(tx),
            handle: Some(handle),
        }
    }

    /// Stop the animation and clear the line.
    pub fn stop(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let Some(tx) = self.quit.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.finish();
    }
}
