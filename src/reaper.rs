//! Expiry reaper
//!
//! A single background thread that wakes on a fixed interval, deletes
//! every expired entry through the store's normal mutation path, and
//! triggers compaction when a sweep evicted anything.
//!
//! The interval timer doubles as the shutdown signal: the thread blocks in
//! `recv_timeout` on a channel, a timeout means "sweep now", and a sent
//! unit value or a disconnected sender means "stop". An in-flight sweep or
//! compaction finishes before the signal is observed, so `stop` never
//! abandons a half-done swap.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::observability::Logger;
use crate::store::StoreCore;

/// Handle to the background expiry thread.
///
/// Stopping is idempotent and also happens on drop, so an engine that is
/// simply dropped still joins its reaper.
pub struct ExpiryReaper {
    /// Sending a unit value wakes and stops the loop
    shutdown: mpsc::Sender<()>,

    /// Taken on the first stop
    handle: Option<JoinHandle<()>>,
}

impl ExpiryReaper {
    /// Spawn the reaper thread over a shared engine core.
    pub fn spawn(core: Arc<StoreCore>, interval: Duration) -> Self {
        let (shutdown, ticks) = mpsc::channel();
        let handle = thread::spawn(move || run_loop(&core, &ticks, interval));

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal the thread and wait for it to exit.
    pub fn stop(mut self) {
        self.signal_and_join();
    }

    fn signal_and_join(&mut self) {
        let _ = self.shutdown.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for ExpiryReaper {
    fn drop(&mut self) {
        self.signal_and_join();
    }
}

fn run_loop(core: &StoreCore, ticks: &mpsc::Receiver<()>, interval: Duration) {
    loop {
        match ticks.recv_timeout(interval) {
            Err(mpsc::RecvTimeoutError::Timeout) => reap_once(core),
            Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }
    Logger::trace("REAPER_STOPPED", &[]);
}

/// One sweep plus the follow-up compaction.
///
/// Errors are logged and swallowed; the loop must survive a bad tick and
/// try again on the next one.
fn reap_once(core: &StoreCore) {
    let evicted = match core.sweep_expired() {
        Ok(count) => count,
        Err(err) => {
            let detail = err.to_string();
            Logger::error("REAPER_SWEEP_FAILED", &[("error", detail.as_str().into())]);
            return;
        }
    };
    if evicted == 0 {
        return;
    }

    Logger::info("REAPER_SWEEP", &[("evicted", evicted.into())]);
    if let Err(err) = core.compact() {
        let detail = err.to_string();
        Logger::error("REAPER_COMPACTION_FAILED", &[("error", detail.as_str().into())]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::LogPaths;
    use tempfile::TempDir;

    fn open_core(dir: &TempDir) -> Arc<StoreCore> {
        let (core, _) = StoreCore::open(LogPaths::new(dir.path())).unwrap();
        Arc::new(core)
    }

    #[test]
    fn test_stop_joins_idle_reaper() {
        let dir = TempDir::new().unwrap();
        let core = open_core(&dir);

        // A long interval: stop must not wait for a tick.
        let reaper = ExpiryReaper::spawn(Arc::clone(&core), Duration::from_secs(3600));
        reaper.stop();
    }

    #[test]
    fn test_drop_joins_reaper() {
        let dir = TempDir::new().unwrap();
        let core = open_core(&dir);

        let reaper = ExpiryReaper::spawn(Arc::clone(&core), Duration::from_secs(3600));
        drop(reaper);
    }

    #[test]
    fn test_reaper_evicts_expired_keys() {
        let dir = TempDir::new().unwrap();
        let core = open_core(&dir);

        core.put("stay", b"v", None).unwrap();
        core.put("go", b"v", Some(Duration::from_millis(5))).unwrap();

        let reaper = ExpiryReaper::spawn(Arc::clone(&core), Duration::from_millis(20));
        std::thread::sleep(Duration::from_millis(200));
        reaper.stop();

        assert_eq!(core.list_keys().unwrap(), vec!["stay"]);
    }

    #[test]
    fn test_reaper_leaves_live_keys_alone() {
        let dir = TempDir::new().unwrap();
        let core = open_core(&dir);

        core.put("a", b"1", None).unwrap();
        core.put("b", b"2", None).unwrap();

        let reaper = ExpiryReaper::spawn(Arc::clone(&core), Duration::from_millis(10));
        std::thread::sleep(Duration::from_millis(100));
        reaper.stop();

        assert_eq!(core.list_keys().unwrap(), vec!["a", "b"]);
        assert_eq!(core.get("a").unwrap(), b"1");
    }
}
