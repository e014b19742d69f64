//! Engine core and public facade
//!
//! `StoreCore` owns the lock-guarded mutable state (key directory plus log
//! writer) and implements every operation against it. `Store` wraps a core
//! in `Arc`, adds the background reaper and lifecycle logging, and is the
//! type callers hold.
//!
//! ## Concurrency Model
//!
//! One mutex guards the directory and the writer together. Every operation
//! that reads or mutates either acquires it, including the reaper's sweep
//! and the whole of compaction, so compaction always sees a consistent cut
//! and no two writers interleave on the log files.

use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;

use crate::compaction::{remove_temp_logs, CompactionStats, Compactor};
use crate::index::KeyDir;
use crate::log::{Entry, LogPaths, LogWriter};
use crate::observability::Logger;
use crate::reaper::ExpiryReaper;
use crate::recovery::{LoadStats, Loader};
use super::config::StoreConfig;
use super::errors::{StoreError, StoreResult};

/// Mutable engine state, always accessed under the core's mutex
struct StoreState {
    /// In-memory key directory, authoritative for reads
    keydir: KeyDir,
    /// Append handles for the live log pair
    writer: LogWriter,
    /// Set when a compaction swap left `writer` on replaced inodes; every
    /// operation refuses until the store is reopened
    halted: bool,
}

/// The engine core: recovered state plus the operations against it.
///
/// Carries no background machinery; `Store` adds that. Shared with the
/// reaper thread through `Arc`.
pub struct StoreCore {
    /// Log file locations inside the store directory
    paths: LogPaths,

    /// Guarded state; see the module docs for the locking discipline
    state: Mutex<StoreState>,
}

impl StoreCore {
    /// Open the store directory, recover the key directory from the log
    /// pair, and prepare append handles.
    ///
    /// Creates the directory if missing and removes compaction temporaries
    /// left behind by a crashed run before recovery reads anything.
    pub fn open(paths: LogPaths) -> StoreResult<(Self, LoadStats)> {
        fs::create_dir_all(paths.dir())?;
        remove_temp_logs(&paths);

        let (keydir, stats) = Loader::load(&paths)?;
        let writer = LogWriter::open(&paths)?;

        let core = Self {
            paths,
            state: Mutex::new(StoreState {
                keydir,
                writer,
                halted: false,
            }),
        };

        Ok((core, stats))
    }

    /// Store a value under a key, with an optional time-to-live.
    ///
    /// Durable in the log pair before the directory is updated; a zero TTL
    /// means the entry never expires.
    pub fn put(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()> {
        validate_key(key)?;
        let entry = Entry::new(value.to_vec(), ttl);

        let mut state = self.lock_state()?;
        state.writer.append(key, &entry)?;
        state.keydir.insert(key.to_string(), entry);
        Ok(())
    }

    /// Fetch the value for a key.
    ///
    /// An expired entry is evicted (tombstone plus directory removal) and
    /// reported as `NotFound`, indistinguishable from a key that never
    /// existed.
    pub fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        let now = Utc::now();
        let mut state = self.lock_state()?;

        let live_value = match state.keydir.get(key) {
            None => return Err(StoreError::NotFound),
            Some(entry) if entry.is_expired(now) => None,
            Some(entry) => Some(entry.value.clone()),
        };

        match live_value {
            Some(value) => Ok(value),
            None => {
                // Evict under the held lock; the tombstone reaches disk
                // before the directory forgets the key.
                state.writer.append_tombstone(key)?;
                state.keydir.remove(key);
                Err(StoreError::NotFound)
            }
        }
    }

    /// Remove a key. Idempotent: deleting an absent key succeeds.
    ///
    /// The tombstone is appended unconditionally so replay applies the
    /// same outcome regardless of what the directory held at the time.
    pub fn delete(&self, key: &str) -> StoreResult<()> {
        validate_key(key)?;

        let mut state = self.lock_state()?;
        state.writer.append_tombstone(key)?;
        state.keydir.remove(key);
        Ok(())
    }

    /// List the currently live, non-expired keys in sorted order.
    ///
    /// Expired entries are filtered out of the listing but left in place;
    /// eviction belongs to `get`, the reaper, and compaction.
    pub fn list_keys(&self) -> StoreResult<Vec<String>> {
        let now = Utc::now();
        let state = self.lock_state()?;

        let mut keys: Vec<String> = state
            .keydir
            .iter()
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    /// Force pending appends to disk with `sync_all` on both logs.
    pub fn sync(&self) -> StoreResult<()> {
        let mut state = self.lock_state()?;
        state.writer.sync()?;
        Ok(())
    }

    /// Rewrite the log pair from the current directory, dropping garbage,
    /// tombstoned history, and expired entries.
    ///
    /// Runs entirely under the state lock. After the swap the old append
    /// handles reference replaced inodes, so the writer is reopened; if
    /// that reopen fails the store halts and every later operation returns
    /// `Halted`, because appends through the stale handles would land in
    /// unlinked files. The on-disk pair is intact; reopening the directory
    /// recovers.
    pub fn compact(&self) -> StoreResult<CompactionStats> {
        let now = Utc::now();
        let mut state = self.lock_state()?;

        let stats = Compactor::compact(&self.paths, &state.keydir, now)?;
        state.writer = match LogWriter::open(&self.paths) {
            Ok(writer) => writer,
            Err(e) => {
                state.halted = true;
                let detail = e.to_string();
                Logger::error("STORE_HALTED", &[("error", detail.as_str().into())]);
                return Err(e.into());
            }
        };

        Logger::info(
            "COMPACTION_COMPLETED",
            &[
                ("entries_expired", stats.entries_expired.into()),
                ("entries_kept", stats.entries_kept.into()),
            ],
        );
        Ok(stats)
    }

    /// Delete every expired entry, returning how many keys were evicted.
    ///
    /// One lock hold for the whole sweep; an append failure aborts the
    /// sweep with the keys evicted so far already tombstoned.
    pub fn sweep_expired(&self) -> StoreResult<usize> {
        let now = Utc::now();
        let mut state = self.lock_state()?;

        let expired: Vec<String> = state
            .keydir
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            state.writer.append_tombstone(key)?;
            state.keydir.remove(key);
        }
        Ok(expired.len())
    }

    /// The directory holding the log pair
    pub fn data_dir(&self) -> &Path {
        self.paths.dir()
    }

    fn lock_state(&self) -> StoreResult<MutexGuard<'_, StoreState>> {
        let state = self.state.lock().map_err(|_| StoreError::LockPoisoned)?;
        if state.halted {
            return Err(StoreError::Halted);
        }
        Ok(state)
    }
}

/// Reject keys the hint log cannot represent.
///
/// The hint format is line-oriented, so keys must be non-empty and free of
/// line breaks. `:` is legal; hint parsing splits fields from the right.
fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey("key must not be empty".to_string()));
    }
    if key.contains('\n') || key.contains('\r') {
        return Err(StoreError::InvalidKey(
            "key must not contain line breaks".to_string(),
        ));
    }
    Ok(())
}

/// Handle to an open store: the engine core plus its background reaper.
pub struct Store {
    /// Shared with the reaper thread
    core: Arc<StoreCore>,

    /// Present unless the config disabled it; joined on close and on drop
    reaper: Option<ExpiryReaper>,
}

impl Store {
    /// Open a store in the given directory with default configuration.
    pub fn open(data_dir: impl Into<std::path::PathBuf>) -> StoreResult<Self> {
        Self::open_with(StoreConfig::new(data_dir))
    }

    /// Open a store with explicit configuration.
    ///
    /// Recovery runs to completion before this returns; the reaper thread
    /// is spawned last, so it only ever observes a fully recovered core.
    pub fn open_with(config: StoreConfig) -> StoreResult<Self> {
        let (core, stats) = StoreCore::open(LogPaths::new(&config.data_dir))?;
        let core = Arc::new(core);

        let dir = config.data_dir.display().to_string();
        Logger::info(
            "STORE_OPENED",
            &[
                ("dir", dir.as_str().into()),
                ("entries_loaded", stats.entries_loaded.into()),
                ("tombstones_applied", stats.tombstones_applied.into()),
            ],
        );
        if stats.records_skipped > 0 {
            Logger::warn(
                "RECOVERY_SKIPPED_RECORDS",
                &[("records_skipped", stats.records_skipped.into())],
            );
        }

        let reaper = if config.run_reaper {
            Some(ExpiryReaper::spawn(
                Arc::clone(&core),
                config.reap_interval,
            ))
        } else {
            None
        };

        Ok(Self { core, reaper })
    }

    /// Store a value under a key, with an optional time-to-live.
    pub fn put(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> StoreResult<()> {
        self.core.put(key, value, ttl)
    }

    /// Fetch the value for a key.
    pub fn get(&self, key: &str) -> StoreResult<Vec<u8>> {
        self.core.get(key)
    }

    /// Remove a key. Idempotent on absent keys.
    pub fn delete(&self, key: &str) -> StoreResult<()> {
        self.core.delete(key)
    }

    /// List the currently live keys in sorted order.
    pub fn list_keys(&self) -> StoreResult<Vec<String>> {
        self.core.list_keys()
    }

    /// Force pending appends to disk.
    pub fn sync(&self) -> StoreResult<()> {
        self.core.sync()
    }

    /// Rewrite the log pair from the current directory.
    pub fn compact(&self) -> StoreResult<CompactionStats> {
        self.core.compact()
    }

    /// Stop the reaper, flush both logs, and release the store.
    pub fn close(mut self) -> StoreResult<()> {
        if let Some(reaper) = self.reaper.take() {
            reaper.stop();
        }
        self.core.sync()?;

        let dir = self.core.data_dir().display().to_string();
        Logger::info("STORE_CLOSED", &[("dir", dir.as_str().into())]);
        Ok(())
    }

    /// The directory holding the log pair
    pub fn data_dir(&self) -> &Path {
        self.core.data_dir()
    }
}
