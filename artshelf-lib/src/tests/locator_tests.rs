use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::*;
use crate::testutil::MemoryFilesystem;

fn locator(fs: &Arc<MemoryFilesystem>) -> RootLocator {
    RootLocator::new(fs.clone() as Arc<dyn Filesystem>)
}

/// Build a minimal library at `root`: a couple of platform folders.
fn seed_library(fs: &MemoryFilesystem, root: &str) {
    fs.add_dir(format!("{root}/snes"));
    fs.add_dir(format!("{root}/psx"));
}

#[test]
fn override_wins_when_valid() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, "/mnt/custom/library");
    seed_library(&fs, PRIMARY_ROOT);

    let locator = RootLocator::with_override(
        fs.clone() as Arc<dyn Filesystem>,
        Some(PathBuf::from("/mnt/custom/library")),
    );
    assert_eq!(locator.resolve(), Path::new("/mnt/custom/library"));
}

#[test]
fn invalid_override_is_skipped_not_fatal() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, PRIMARY_ROOT);

    let locator = RootLocator::with_override(
        fs.clone() as Arc<dyn Filesystem>,
        Some(PathBuf::from("/mnt/gone")),
    );
    assert_eq!(locator.resolve(), Path::new(PRIMARY_ROOT));
}

#[test]
fn primary_root_is_preferred_over_later_candidates() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, PRIMARY_ROOT);
    seed_library(&fs, "/storage/emulated/0/ROMs");

    assert_eq!(locator(&fs).resolve(), Path::new(PRIMARY_ROOT));
}

#[test]
fn package_candidate_files_layout_is_found() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, "/storage/emulated/0/Android/data/com.iisu.launcher/files");

    assert_eq!(
        locator(&fs).resolve(),
        Path::new("/storage/emulated/0/Android/data/com.iisu.launcher/files")
    );
}

#[test]
fn package_candidate_itself_is_found() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, "/storage/emulated/0/Android/data/com.iisu.hub");

    assert_eq!(
        locator(&fs).resolve(),
        Path::new("/storage/emulated/0/Android/data/com.iisu.hub")
    );
}

#[test]
fn fuzzy_brand_scan_finds_unlisted_package() {
    let fs = Arc::new(MemoryFilesystem::new());
    // Not in the fixed candidate list, but the name contains the brand.
    seed_library(&fs, "/storage/emulated/0/Android/data/org.community.iisu-next/files");

    assert_eq!(
        locator(&fs).resolve(),
        Path::new("/storage/emulated/0/Android/data/org.community.iisu-next/files")
    );
}

#[test]
fn fuzzy_scan_ignores_unrelated_packages() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, "/storage/emulated/0/Android/data/com.other.game/files");
    seed_library(&fs, "/sdcard/iisu/roms");

    // The unrelated package holds a perfectly valid library but its name
    // lacks the brand, so the legacy path wins.
    assert_eq!(locator(&fs).resolve(), Path::new("/sdcard/iisu/roms"));
}

#[test]
fn shared_rom_folders_are_last_resort() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, "/storage/emulated/0/Games");

    assert_eq!(
        locator(&fs).resolve(),
        Path::new("/storage/emulated/0/Games")
    );
}

#[test]
fn falls_back_to_primary_when_nothing_found() {
    let fs = Arc::new(MemoryFilesystem::new());
    assert_eq!(locator(&fs).resolve(), Path::new(PRIMARY_ROOT));
}

#[test]
fn predicate_rejects_launcher_bookkeeping_dirs() {
    let fs = Arc::new(MemoryFilesystem::new());
    fs.add_dir("/data/app/cache");
    fs.add_dir("/data/app/databases");
    fs.add_dir("/data/app/shared_prefs");

    let locator = locator(&fs);
    assert!(!locator.looks_like_library(Path::new("/data/app")));
}

#[test]
fn predicate_accepts_platform_dirs_in_any_style() {
    let fs = Arc::new(MemoryFilesystem::new());
    fs.add_dir("/lib1/SNES");
    fs.add_dir("/lib2/super_nintendo");
    fs.add_dir("/lib3/Play-Station");

    let locator = locator(&fs);
    assert!(locator.looks_like_library(Path::new("/lib1")));
    assert!(locator.looks_like_library(Path::new("/lib2")));
    assert!(locator.looks_like_library(Path::new("/lib3")));
}

#[test]
fn predicate_ignores_platform_named_files() {
    let fs = Arc::new(MemoryFilesystem::new());
    fs.add_dir("/lib");
    fs.add_file("/lib/snes");

    assert!(!locator(&fs).looks_like_library(Path::new("/lib")));
}

#[test]
fn resolution_is_memoized() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, PRIMARY_ROOT);

    let locator = locator(&fs);
    locator.resolve();
    let listings_after_first = fs.list_dir_calls();
    locator.resolve();
    assert_eq!(fs.list_dir_calls(), listings_after_first);
}

#[test]
fn set_override_clears_the_memo() {
    let fs = Arc::new(MemoryFilesystem::new());
    seed_library(&fs, PRIMARY_ROOT);
    seed_library(&fs, "/mnt/new");

    let locator = locator(&fs);
    assert_eq!(locator.resolve(), Path::new(PRIMARY_ROOT));

    locator.set_override(Some(PathBuf::from("/mnt/new")));
    assert_eq!(locator.resolve(), Path::new("/mnt/new"));

    locator.set_override(None);
    assert_eq!(locator.resolve(), Path::new(PRIMARY_ROOT));
}
