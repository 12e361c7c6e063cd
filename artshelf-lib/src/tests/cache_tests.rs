use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::*;
use crate::fs::RealFilesystem;
use crate::locator::PRIMARY_ROOT;
use crate::testutil::{MemoryFilesystem, MemorySnapshotStore};

/// Library fixture: snes with two games (one fully decorated, one bare)
/// and psx with one externally-supplied icon.
fn seed_library(fs: &MemoryFilesystem) {
    fs.add_file(format!("{PRIMARY_ROOT}/snes/Axelay/icon.png"));
    fs.add_file(format!("{PRIMARY_ROOT}/snes/Axelay/hero_1.png"));
    fs.add_dir(format!("{PRIMARY_ROOT}/snes/Bare Game"));
    fs.add_file(format!("{PRIMARY_ROOT}/psx/Ridge Racer/icon.jpg"));
}

fn manager(
    fs: &Arc<MemoryFilesystem>,
    store: &Arc<MemorySnapshotStore>,
) -> CacheManager {
    let dyn_fs = fs.clone() as Arc<dyn Filesystem>;
    CacheManager::new(
        dyn_fs.clone(),
        RootLocator::new(dyn_fs),
        store.clone() as Arc<dyn SnapshotStore>,
    )
}

fn setup() -> (Arc<MemoryFilesystem>, Arc<MemorySnapshotStore>, CacheManager) {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs);
    let store = Arc::new(MemorySnapshotStore::new());
    let cache = manager(&fs, &store);
    (fs, store, cache)
}

#[test]
fn games_within_ttl_do_not_rescan() {
    let (fs, _store, cache) = setup();

    let first = cache.games("snes", false);
    assert_eq!(first.len(), 2);

    let listings = fs.list_dir_calls();
    let second = cache.games("snes", false);
    assert_eq!(fs.list_dir_calls(), listings, "second read hit the filesystem");
    assert_eq!(first, second);
}

#[test]
fn invalidate_triggers_exactly_one_fresh_scan() {
    let (fs, _store, cache) = setup();
    cache.games("snes", false);

    cache.invalidate("snes");
    let listings = fs.list_dir_calls();
    cache.games("snes", false);
    assert_eq!(
        fs.list_dir_calls(),
        listings + 1,
        "expected exactly one platform-folder listing"
    );
}

#[test]
fn invalidate_leaves_other_platforms_cached() {
    let (fs, _store, cache) = setup();
    cache.games("snes", false);
    cache.games("psx", false);

    cache.invalidate("snes");
    let listings = fs.list_dir_calls();
    cache.games("psx", false);
    assert_eq!(fs.list_dir_calls(), listings);
}

#[test]
fn force_refresh_rescans_platforms() {
    let (fs, _store, cache) = setup();
    let platforms = cache.platforms(false);
    assert_eq!(platforms, vec!["psx", "snes"]);

    let listings = fs.list_dir_calls();
    cache.platforms(false);
    assert_eq!(fs.list_dir_calls(), listings);

    cache.platforms(true);
    assert!(fs.list_dir_calls() > listings);
}

#[test]
fn platform_info_aggregates_games() {
    let (_fs, _store, cache) = setup();

    let infos = cache.platform_info_list(false);
    assert_eq!(infos.len(), 2);

    let snes = infos.iter().find(|i| i.key == "snes").unwrap();
    assert_eq!(snes.display_name, "Super Nintendo Entertainment System");
    assert_eq!(snes.game_count, 2);
    assert_eq!(snes.missing_hero, 1);
    assert_eq!(snes.missing_logo, 2);
    assert_eq!(snes.missing_screenshot, 2);
    assert_eq!(
        snes.icon().unwrap(),
        Path::new(&format!("{PRIMARY_ROOT}/snes/Axelay/icon.png"))
    );

    let psx = infos.iter().find(|i| i.key == "psx").unwrap();
    assert_eq!(psx.display_name, "Sony PlayStation");
    assert_eq!(psx.game_count, 1);
    assert!(psx.icon().is_some());
}

#[test]
fn rebuild_primes_game_caches_and_serves_from_memory() {
    let (fs, _store, cache) = setup();
    cache.platform_info_list(false);

    // The rebuild scanned every platform as a side effect, so both the
    // info list and per-platform game lists now come from memory.
    let listings = fs.list_dir_calls();
    cache.platform_info_list(false);
    cache.games("snes", false);
    cache.games("psx", false);
    assert_eq!(fs.list_dir_calls(), listings);
}

#[test]
fn rebuild_writes_snapshot_through() {
    let (_fs, store, cache) = setup();
    cache.platform_info_list(false);

    let (bytes, timestamp) = store.stored(SNAPSHOT_NAMESPACE).expect("snapshot persisted");
    assert!(timestamp > 0);
    let records: Vec<PlatformInfo> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn snapshot_round_trips_into_a_new_process() {
    let (fs, store, cache) = setup();
    let original = cache.platform_info_list(false);

    // Same storage, fresh process: memory caches start empty.
    let fresh = manager(&fs, &store);
    let listings = fs.list_dir_calls();
    let adopted = fresh.platform_info_list(false);

    assert_eq!(adopted, original);
    // Root probe + platform listing only — no per-platform game scans.
    assert_eq!(fs.list_dir_calls(), listings + 2);
}

#[test]
fn adoption_nulls_missing_icon_paths() {
    let (fs, store, cache) = setup();
    cache.platform_info_list(false);

    // The icon disappears out-of-band before the next process starts.
    fs.remove(format!("{PRIMARY_ROOT}/snes/Axelay/icon.png"));

    let fresh = manager(&fs, &store);
    let adopted = fresh.platform_info_list(false);
    let snes = adopted.iter().find(|i| i.key == "snes").unwrap();
    assert_eq!(snes.icon(), None);

    let psx = adopted.iter().find(|i| i.key == "psx").unwrap();
    assert!(psx.icon().is_some(), "surviving icons are kept");
}

#[test]
fn snapshot_adoption_keeps_stale_counts() {
    // Known staleness boundary: adoption re-validates icon existence only.
    // Games added out-of-band within the TTL window are not reflected
    // until the next rebuild.
    let (fs, store, cache) = setup();
    let original = cache.platform_info_list(false);
    let original_snes = original.iter().find(|i| i.key == "snes").unwrap().clone();

    fs.add_dir(format!("{PRIMARY_ROOT}/snes/Brand New Game"));

    let fresh = manager(&fs, &store);
    let adopted = fresh.platform_info_list(false);
    let snes = adopted.iter().find(|i| i.key == "snes").unwrap();
    assert_eq!(snes.game_count, original_snes.game_count);

    // A forced refresh rebuilds and sees the new game.
    let rebuilt = fresh.platform_info_list(true);
    let snes = rebuilt.iter().find(|i| i.key == "snes").unwrap();
    assert_eq!(snes.game_count, original_snes.game_count + 1);
}

#[test]
fn expired_snapshot_is_ignored() {
    let (fs, store, _cache) = setup();

    let stale = vec![PlatformInfo {
        key: "snes".into(),
        display_name: "Super Nintendo Entertainment System".into(),
        game_count: 99,
        missing_hero: 99,
        missing_logo: 99,
        missing_screenshot: 99,
        icon_path: String::new(),
    }];
    let bytes = serde_json::to_vec(&stale).unwrap();
    store.seed(
        SNAPSHOT_NAMESPACE,
        bytes,
        unix_now().saturating_sub(CACHE_TTL.as_secs() + 60),
    );

    let cache = manager(&fs, &store);
    let infos = cache.platform_info_list(false);
    let snes = infos.iter().find(|i| i.key == "snes").unwrap();
    assert_eq!(snes.game_count, 2, "expired snapshot must not be adopted");
}

#[test]
fn corrupt_snapshot_degrades_to_rebuild() {
    let (fs, store, _cache) = setup();
    store.seed(SNAPSHOT_NAMESPACE, b"not json at all".to_vec(), unix_now());

    let cache = manager(&fs, &store);
    let infos = cache.platform_info_list(false);
    assert_eq!(infos.len(), 2);
}

#[test]
fn failing_store_never_surfaces_errors() {
    let (_fs, store, cache) = setup();
    store.set_failing(true);

    let infos = cache.platform_info_list(false);
    assert_eq!(infos.len(), 2);
    let games = cache.games("snes", false);
    assert_eq!(games.len(), 2);

    cache.clear_all();
    let infos = cache.platform_info_list(false);
    assert_eq!(infos.len(), 2);
}

#[test]
fn clear_all_drops_memory_and_snapshot() {
    let (fs, store, cache) = setup();
    cache.platform_info_list(false);
    assert!(store.stored(SNAPSHOT_NAMESPACE).is_some());

    cache.clear_all();
    assert!(store.stored(SNAPSHOT_NAMESPACE).is_none());

    let listings = fs.list_dir_calls();
    cache.games("snes", false);
    assert!(fs.list_dir_calls() > listings, "cleared cache must rescan");
}

#[test]
fn set_override_root_switches_library() {
    let (fs, store, cache) = setup();
    cache.platform_info_list(false);

    fs.add_file("/mnt/sdcard/library/gba/Wario Land 4/icon.png");
    cache.set_override_root(Some(PathBuf::from("/mnt/sdcard/library")));

    assert!(
        store.stored(SNAPSHOT_NAMESPACE).is_none(),
        "old library's snapshot must not survive a root change"
    );
    assert_eq!(cache.platforms(false), vec!["gba"]);
    assert_eq!(cache.root(), Path::new("/mnt/sdcard/library"));

    cache.set_override_root(None);
    assert_eq!(cache.root(), Path::new(PRIMARY_ROOT));
}

#[test]
fn file_snapshot_store_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    let fs: Arc<dyn Filesystem> = Arc::new(RealFilesystem::new());
    let store = FileSnapshotStore::new(fs, tmp.path().to_path_buf());

    assert!(store.get("platform_info").unwrap().is_none());

    store.put("platform_info", b"[1,2,3]", 1234).unwrap();
    let (bytes, timestamp) = store.get("platform_info").unwrap().unwrap();
    assert_eq!(bytes, b"[1,2,3]");
    assert_eq!(timestamp, 1234);

    store.clear("platform_info").unwrap();
    assert!(store.get("platform_info").unwrap().is_none());
}
