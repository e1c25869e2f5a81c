//! An in-memory terminal that records everything written to it.
use std::{
    mem,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::{
    backend::Terminal,
    error::{Error, Result},
    geom::{Expanse, Point},
};

/// State shared between a `RecordingTerminal` and its test handle.
#[derive(Debug, Default)]
pub struct Recording {
    /// Every successful write, in order.
    pub writes: Vec<Vec<u8>>,
    /// Bytes written since the last `take`.
    pub pending: Vec<u8>,
    /// Number of flushes.
    pub flushes: usize,
    /// Fail this many upcoming writes.
    pub fail_writes: usize,
    /// Reported terminal size.
    pub size: Expanse,
    /// Is the terminal started?
    pub started: bool,
}

/// A terminal that records output in memory.
#[derive(Debug, Clone)]
pub struct RecordingTerminal {
    /// Shared recording.
    state: Arc<Mutex<Recording>>,
}

impl RecordingTerminal {
    /// A terminal of the given size, plus a handle for inspecting what was
    /// written to it after it has been handed to a screen.
    pub fn new(size: Expanse) -> (Self, Self) {
        let state = Arc::new(Mutex::new(Recording {
            size,
            ..Recording::default()
        }));
        let t = Self { state };
        (t.clone(), t)
    }

    /// Lock the shared recording.
    pub fn state(&self) -> MutexGuard<'_, Recording> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Take the output written since the last call, as a string.
    pub fn take(&self) -> String {
        let bytes = mem::take(&mut self.state().pending);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Make the next `n` writes fail.
    pub fn fail_next_writes(&self, n: usize) {
        self.state().fail_writes = n;
    }

    /// Change the reported size.
    pub fn set_size(&self, size: Expanse) {
        self.state().size = size;
    }
}

impl Terminal for RecordingTerminal {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        let mut s = self.state();
        if s.fail_writes > 0 {
            s.fail_writes -= 1;
            return Err(Error::Render("write failed".into()));
        }
        s.writes.push(bytes.to_vec());
        s.pending.extend_from_slice(bytes);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.state().flushes += 1;
        Ok(())
    }

    fn size(&self) -> Result<Expanse> {
        Ok(self.state().size)
    }

    fn cursor(&mut self) -> Result<Point> {
        Ok(Point::zero())
    }

    fn start(&mut self) -> Result<()> {
        self.state().started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.state().started = false;
        Ok(())
    }
}
