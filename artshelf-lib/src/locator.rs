//! Library-root resolution across messy storage layouts.
//!
//! The launcher's library ends up in different places depending on install
//! method, firmware vintage, and user habits. The locator probes a fixed
//! priority chain of candidates and memoizes the first hit; resolution is
//! configuration-sensitive, not time-sensitive, so the memo only clears when
//! the override changes or the caches are explicitly cleared.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use artshelf_core::platform;

use crate::fs::Filesystem;

/// Most common install location; also the unconditional fallback when no
/// candidate matches. Callers must handle a non-existent root.
pub const PRIMARY_ROOT: &str = "/storage/emulated/0/iisu/roms";

/// Parent directory scanned for per-app data folders.
const APP_DATA_DIR: &str = "/storage/emulated/0/Android/data";

/// Known launcher package names probed under the app-data directory.
const PACKAGE_CANDIDATES: &[&str] = &[
    "com.iisu.launcher",
    "com.iisu.frontend",
    "com.iisu.hub",
];

/// Conventional layouts probed under each package candidate: a "files"
/// subfolder, a brand-named subfolder, or the candidate directory itself.
const CANDIDATE_LAYOUTS: &[&str] = &["files", "iisu", ""];

/// Brand substring used for the fuzzy app-data scan (case-insensitive).
const BRAND: &str = "iisu";

/// Install location used by firmware before the app-data migration.
const LEGACY_ROOT: &str = "/sdcard/iisu/roms";

/// Common shared ROM-library folders tried last.
const SHARED_ROOTS: &[&str] = &[
    "/storage/emulated/0/ROMs",
    "/storage/emulated/0/Roms",
    "/storage/emulated/0/roms",
    "/storage/emulated/0/Games",
];

/// Resolves and memoizes the library root directory.
pub struct RootLocator {
    fs: Arc<dyn Filesystem>,
    state: Mutex<LocatorState>,
}

#[derive(Default)]
struct LocatorState {
    override_root: Option<PathBuf>,
    resolved: Option<PathBuf>,
}

impl RootLocator {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self::with_override(fs, None)
    }

    /// Create a locator with a previously configured override root.
    pub fn with_override(fs: Arc<dyn Filesystem>, override_root: Option<PathBuf>) -> Self {
        Self {
            fs,
            state: Mutex::new(LocatorState {
                override_root,
                resolved: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LocatorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Resolve the library root, trying candidates in priority order.
    ///
    /// Never fails: when no candidate looks like a library this returns
    /// [`PRIMARY_ROOT`], which may not exist. The result is memoized until
    /// the override changes or [`invalidate`](Self::invalidate) is called.
    pub fn resolve(&self) -> PathBuf {
        let mut state = self.lock();
        if let Some(root) = &state.resolved {
            return root.clone();
        }
        let root = self.locate(state.override_root.as_deref());
        log::info!("library root resolved to {}", root.display());
        state.resolved = Some(root.clone());
        root
    }

    /// Replace the user override and drop the memoized root.
    pub fn set_override(&self, override_root: Option<PathBuf>) {
        let mut state = self.lock();
        state.override_root = override_root;
        state.resolved = None;
    }

    /// Drop the memoized root; the next [`resolve`](Self::resolve) re-probes.
    pub fn invalidate(&self) {
        self.lock().resolved = None;
    }

    fn locate(&self, override_root: Option<&Path>) -> PathBuf {
        // 1. User override, when it still looks like a library. An invalid
        // override is not an error; the chain just moves on.
        if let Some(root) = override_root {
            if self.looks_like_library(root) {
                return root.to_path_buf();
            }
            log::warn!(
                "configured override {} does not look like a library, ignoring",
                root.display()
            );
        }

        // 2. Most common install path.
        let primary = PathBuf::from(PRIMARY_ROOT);
        if self.looks_like_library(&primary) {
            return primary;
        }

        // 3. Known package names under the app-data directory.
        let app_data = Path::new(APP_DATA_DIR);
        for package in PACKAGE_CANDIDATES {
            if let Some(root) = self.probe_layouts(&app_data.join(package)) {
                return root;
            }
        }

        // 4. Fuzzy scan: any app-data folder whose name contains the brand.
        if let Ok(children) = self.fs.list_dir(app_data) {
            for child in children {
                let name = child
                    .file_name()
                    .map(|n| n.to_string_lossy().to_lowercase())
                    .unwrap_or_default();
                if name.contains(BRAND) && self.fs.is_dir(&child) {
                    if let Some(root) = self.probe_layouts(&child) {
                        return root;
                    }
                }
            }
        }

        // 5. Legacy install path.
        let legacy = PathBuf::from(LEGACY_ROOT);
        if self.looks_like_library(&legacy) {
            return legacy;
        }

        // 6. Shared ROM folders.
        for shared in SHARED_ROOTS {
            let candidate = PathBuf::from(shared);
            if self.looks_like_library(&candidate) {
                return candidate;
            }
        }

        log::warn!("no library found, falling back to {PRIMARY_ROOT}");
        PathBuf::from(PRIMARY_ROOT)
    }

    /// Probe the conventional layouts under a candidate directory.
    fn probe_layouts(&self, base: &Path) -> Option<PathBuf> {
        for layout in CANDIDATE_LAYOUTS {
            let candidate = if layout.is_empty() {
                base.to_path_buf()
            } else {
                base.join(layout)
            };
            if self.looks_like_library(&candidate) {
                return Some(candidate);
            }
        }
        None
    }

    /// Whether a directory looks like a library root: it must be listable
    /// and contain at least one immediate subdirectory that token-matches a
    /// known platform (reserved launcher folders never count).
    pub fn looks_like_library(&self, path: &Path) -> bool {
        if !self.fs.is_dir(path) {
            return false;
        }
        let children = match self.fs.list_dir(path) {
            Ok(children) => children,
            Err(err) => {
                log::debug!("cannot list {}: {err}", path.display());
                return false;
            }
        };
        children.iter().any(|child| {
            let Some(name) = child.file_name().map(|n| n.to_string_lossy()) else {
                return false;
            };
            !name.starts_with('.')
                && self.fs.is_dir(child)
                && platform::is_platform_folder(&name)
        })
    }
}

#[cfg(test)]
#[path = "tests/locator_tests.rs"]
mod tests;
