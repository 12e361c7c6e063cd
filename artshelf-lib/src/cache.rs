//! Two-tier cache over library scans.
//!
//! Scanning a large library is the expensive operation in this system, so
//! scan results live in a memory cache with TTL expiry, and the per-platform
//! aggregates are additionally mirrored to a persisted snapshot that
//! survives process restarts. Snapshot failures never surface to callers:
//! a fully degraded cache still answers correctly, just slower.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant, SystemTime};

use serde::{Deserialize, Serialize};

use artshelf_core::{AssetKind, platform};

use crate::error::CacheError;
use crate::fs::Filesystem;
use crate::locator::RootLocator;
use crate::scanner::{GameEntry, LibraryScanner};

/// How long a cached scan result stays valid.
pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Namespace the platform-info snapshot is persisted under.
pub const SNAPSHOT_NAMESPACE: &str = "platform_info";

/// A cached value with its computation time. Freshness is evaluated lazily
/// at read time; there is no background sweep.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    value: T,
    computed_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            computed_at: Instant::now(),
        }
    }

    /// Entry whose age is backdated, used when adopting a persisted
    /// snapshot that was written some time ago.
    fn aged(value: T, age: Duration) -> Self {
        Self {
            value,
            computed_at: Instant::now()
                .checked_sub(age)
                .unwrap_or_else(Instant::now),
        }
    }

    fn is_fresh(&self) -> bool {
        self.computed_at.elapsed() < CACHE_TTL
    }
}

/// Aggregate statistics for one platform, derived from its game list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformInfo {
    /// Raw platform folder name (used for path construction).
    pub key: String,
    /// Canonical display name from the platform table.
    pub display_name: String,
    /// Number of games discovered.
    pub game_count: usize,
    /// Games without hero artwork.
    pub missing_hero: usize,
    /// Games without logo artwork.
    pub missing_logo: usize,
    /// Games without a screenshot.
    pub missing_screenshot: usize,
    /// Representative icon path; empty string encodes "none".
    pub icon_path: String,
}

impl PlatformInfo {
    /// Compute aggregates from a scanned game list.
    pub fn compute(key: &str, games: &[GameEntry]) -> Self {
        let missing =
            |kind: AssetKind| games.iter().filter(|g| !g.has(kind)).count();
        let icon_path = games
            .iter()
            .find_map(|g| g.asset_path(AssetKind::Icon))
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            key: key.to_string(),
            display_name: platform::display_name_for(key),
            game_count: games.len(),
            missing_hero: missing(AssetKind::Hero),
            missing_logo: missing(AssetKind::Logo),
            missing_screenshot: missing(AssetKind::Screenshot),
            icon_path,
        }
    }

    /// The representative icon path, when one exists.
    pub fn icon(&self) -> Option<&Path> {
        if self.icon_path.is_empty() {
            None
        } else {
            Some(Path::new(&self.icon_path))
        }
    }
}

/// Key-value persistence for the platform-info snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Persist a complete snapshot under a namespace.
    fn put(&self, namespace: &str, bytes: &[u8], timestamp: u64) -> Result<(), CacheError>;

    /// Load a snapshot and its write timestamp, if one exists.
    fn get(&self, namespace: &str) -> Result<Option<(Vec<u8>, u64)>, CacheError>;

    /// Erase the snapshot for a namespace.
    fn clear(&self, namespace: &str) -> Result<(), CacheError>;
}

/// On-disk envelope for one persisted snapshot.
#[derive(Debug, Serialize, Deserialize)]
struct StoredBlob {
    timestamp: u64,
    payload: String,
}

/// Snapshot store writing one JSON envelope file per namespace.
pub struct FileSnapshotStore {
    fs: Arc<dyn Filesystem>,
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(fs: Arc<dyn Filesystem>, dir: PathBuf) -> Self {
        Self { fs, dir }
    }

    /// Default snapshot directory: `~/.cache/artshelf`.
    pub fn default_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("artshelf")
    }

    fn blob_path(&self, namespace: &str) -> PathBuf {
        self.dir.join(format!("{namespace}.json"))
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn put(&self, namespace: &str, bytes: &[u8], timestamp: u64) -> Result<(), CacheError> {
        let blob = StoredBlob {
            timestamp,
            payload: String::from_utf8_lossy(bytes).into_owned(),
        };
        let contents = serde_json::to_vec_pretty(&blob)?;
        self.fs.write(&self.blob_path(namespace), &contents)?;
        Ok(())
    }

    fn get(&self, namespace: &str) -> Result<Option<(Vec<u8>, u64)>, CacheError> {
        let path = self.blob_path(namespace);
        if !self.fs.is_file(&path) {
            return Ok(None);
        }
        let contents = self.fs.read(&path)?;
        let blob: StoredBlob = serde_json::from_slice(&contents)?;
        Ok(Some((blob.payload.into_bytes(), blob.timestamp)))
    }

    fn clear(&self, namespace: &str) -> Result<(), CacheError> {
        let path = self.blob_path(namespace);
        if self.fs.is_file(&path) {
            self.fs.remove_file(&path)?;
        }
        Ok(())
    }
}

#[derive(Default)]
struct CacheState {
    platforms: Option<CacheEntry<Vec<String>>>,
    games: HashMap<String, CacheEntry<Vec<GameEntry>>>,
    info: Option<CacheEntry<HashMap<String, PlatformInfo>>>,
    /// The persisted snapshot is consulted at most once per process unless
    /// the caches are cleared.
    snapshot_checked: bool,
}

/// Single source of truth for "what did we last see".
///
/// One mutex guards all cache maps; scans and snapshot I/O run outside the
/// critical section and results are swapped in atomically, so concurrent
/// readers never observe a half-updated cache.
pub struct CacheManager {
    fs: Arc<dyn Filesystem>,
    locator: RootLocator,
    scanner: LibraryScanner,
    store: Arc<dyn SnapshotStore>,
    state: Mutex<CacheState>,
}

impl CacheManager {
    pub fn new(
        fs: Arc<dyn Filesystem>,
        locator: RootLocator,
        store: Arc<dyn SnapshotStore>,
    ) -> Self {
        let scanner = LibraryScanner::new(fs.clone());
        Self {
            fs,
            locator,
            scanner,
            store,
            state: Mutex::new(CacheState::default()),
        }
    }

    /// The resolved library root (memoized by the locator).
    pub fn root(&self) -> PathBuf {
        self.locator.resolve()
    }

    fn lock(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Platform folder names, served from cache within the TTL.
    pub fn platforms(&self, force_refresh: bool) -> Vec<String> {
        if !force_refresh {
            let state = self.lock();
            if let Some(entry) = &state.platforms {
                if entry.is_fresh() {
                    return entry.value.clone();
                }
            }
        }

        let root = self.locator.resolve();
        let fresh = self.scanner.list_platforms(&root);
        self.lock().platforms = Some(CacheEntry::new(fresh.clone()));
        fresh
    }

    /// Game entries for one platform, served from cache within the TTL.
    pub fn games(&self, platform_key: &str, force_refresh: bool) -> Vec<GameEntry> {
        if !force_refresh {
            let state = self.lock();
            if let Some(entry) = state.games.get(platform_key) {
                if entry.is_fresh() {
                    return entry.value.clone();
                }
            }
        }

        let root = self.locator.resolve();
        let fresh = self.scanner.list_games(&root, platform_key);
        self.lock()
            .games
            .insert(platform_key.to_string(), CacheEntry::new(fresh.clone()));
        fresh
    }

    /// Aggregate info for every platform.
    ///
    /// Resolution order: fresh in-memory aggregates; then (once per
    /// process) a persisted snapshot within the TTL — adopted after
    /// re-verifying only that each recorded icon still exists, stale icon
    /// paths are nulled; otherwise a full rebuild that rescans every
    /// platform, refreshes the per-platform game caches, and writes one new
    /// snapshot through to the store.
    pub fn platform_info_list(&self, force_refresh: bool) -> Vec<PlatformInfo> {
        let platforms = self.platforms(force_refresh);

        if !force_refresh {
            {
                let state = self.lock();
                if let Some(entry) = &state.info {
                    if entry.is_fresh()
                        && platforms.iter().all(|p| entry.value.contains_key(p))
                    {
                        return platforms
                            .iter()
                            .filter_map(|p| entry.value.get(p).cloned())
                            .collect();
                    }
                }
            }

            if let Some((records, age)) = self.load_snapshot() {
                let map: HashMap<String, PlatformInfo> = records
                    .iter()
                    .map(|r| (r.key.clone(), r.clone()))
                    .collect();
                self.lock().info = Some(CacheEntry::aged(map, age));
                return records;
            }
        }

        self.rebuild_info(&platforms)
    }

    /// Drop one platform's game list and aggregate; the platform list and
    /// all other platforms are untouched. Any mutation that adds, removes,
    /// or replaces artwork must call this.
    pub fn invalidate(&self, platform_key: &str) {
        let mut state = self.lock();
        state.games.remove(platform_key);
        if let Some(entry) = &mut state.info {
            entry.value.remove(platform_key);
        }
    }

    /// Drop every in-memory entry, the memoized root, and the persisted
    /// snapshot.
    pub fn clear_all(&self) {
        *self.lock() = CacheState::default();
        self.locator.invalidate();
        if let Err(err) = self.store.clear(SNAPSHOT_NAMESPACE) {
            log::warn!("failed to clear persisted snapshot: {err}");
        }
    }

    /// Replace the user override root. The old library's cached data is
    /// meaningless under a new root, so this clears everything.
    pub fn set_override_root(&self, root: Option<PathBuf>) {
        self.locator.set_override(root);
        *self.lock() = CacheState::default();
        if let Err(err) = self.store.clear(SNAPSHOT_NAMESPACE) {
            log::warn!("failed to clear persisted snapshot: {err}");
        }
    }

    /// Full rebuild: scan every platform, compute aggregates, persist one
    /// snapshot, and swap everything into the cache maps atomically.
    fn rebuild_info(&self, platforms: &[String]) -> Vec<PlatformInfo> {
        let root = self.locator.resolve();

        let mut infos = Vec::with_capacity(platforms.len());
        let mut scanned = Vec::with_capacity(platforms.len());
        for key in platforms {
            // A platform that fails to scan contributes an empty list; it
            // must not prevent the others from being rebuilt.
            let games = self.scanner.list_games(&root, key);
            infos.push(PlatformInfo::compute(key, &games));
            scanned.push((key.clone(), games));
        }

        self.save_snapshot(&infos);

        let mut state = self.lock();
        for (key, games) in scanned {
            state.games.insert(key, CacheEntry::new(games));
        }
        let map = infos.iter().map(|i| (i.key.clone(), i.clone())).collect();
        state.info = Some(CacheEntry::new(map));
        state.snapshot_checked = true;

        infos
    }

    /// Try to adopt the persisted snapshot. Returns the records and their
    /// age when the snapshot is within the TTL and non-empty.
    ///
    /// Only the icon paths are re-verified against the filesystem before
    /// the snapshot is trusted; game counts and missing-asset counts are
    /// adopted as persisted, so files changed out-of-band within the TTL
    /// window are not reflected until the next rebuild.
    fn load_snapshot(&self) -> Option<(Vec<PlatformInfo>, Duration)> {
        {
            let mut state = self.lock();
            if state.snapshot_checked {
                return None;
            }
            state.snapshot_checked = true;
        }

        let (bytes, timestamp) = match self.store.get(SNAPSHOT_NAMESPACE) {
            Ok(Some(found)) => found,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("snapshot load failed, treating as miss: {err}");
                return None;
            }
        };

        let age = Duration::from_secs(unix_now().saturating_sub(timestamp));
        if age >= CACHE_TTL {
            log::debug!("persisted snapshot expired ({}s old)", age.as_secs());
            return None;
        }

        let mut records: Vec<PlatformInfo> = match serde_json::from_slice(&bytes) {
            Ok(records) => records,
            Err(err) => {
                log::warn!("snapshot deserialization failed, treating as miss: {err}");
                return None;
            }
        };
        if records.is_empty() {
            return None;
        }

        for record in &mut records {
            if !record.icon_path.is_empty()
                && !self.fs.is_file(Path::new(&record.icon_path))
            {
                log::debug!(
                    "snapshot icon {} no longer exists, nulling",
                    record.icon_path
                );
                record.icon_path.clear();
            }
        }

        Some((records, age))
    }

    fn save_snapshot(&self, infos: &[PlatformInfo]) {
        let bytes = match serde_json::to_vec(infos) {
            Ok(bytes) => bytes,
            Err(err) => {
                log::warn!("snapshot serialization failed: {err}");
                return;
            }
        };
        if let Err(err) = self.store.put(SNAPSHOT_NAMESPACE, &bytes, unix_now()) {
            log::warn!("snapshot save failed: {err}");
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod entry_tests {
    use super::*;

    #[test]
    fn fresh_entry_is_fresh() {
        let entry = CacheEntry::new(42);
        assert!(entry.is_fresh());
    }

    #[test]
    fn backdated_entry_past_ttl_is_stale() {
        let entry = CacheEntry::aged(42, CACHE_TTL + Duration::from_secs(1));
        assert!(!entry.is_fresh());
    }

    #[test]
    fn backdated_entry_within_ttl_is_fresh() {
        let entry = CacheEntry::aged(42, Duration::from_secs(60));
        assert!(entry.is_fresh());
    }
}

#[cfg(test)]
#[path = "tests/cache_tests.rs"]
mod tests;
