//! Directory scanner for platform and game folders.
//!
//! Layout: one folder per platform under the library root, one folder per
//! game under each platform, artwork files directly inside the game folder.
//! Scans are deterministic — entries come back in case-insensitive
//! alphabetical order so callers can diff lists positionally.

use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use artshelf_core::{AssetKind, clean_title, normalize_for_search, platform, search_variants};

use crate::fs::Filesystem;

/// Folder names inside a platform folder that hold artwork or launcher
/// bookkeeping rather than a game.
const GAME_FOLDER_EXCLUSIONS: &[&str] = &["cache", "media", "metadata", "images"];

/// One discovered game folder with its artwork presence.
///
/// Identity is the folder path: two entries with equal `folder_path` are
/// the same game across scans even when artwork changed in between.
#[derive(Debug, Clone)]
pub struct GameEntry {
    /// Literal folder name; used for all path construction, never cleaned.
    pub raw_name: String,
    /// Absolute path of the game folder.
    pub folder_path: PathBuf,
    /// Cleaned title for display, derived from `raw_name` at construction.
    pub display_name: String,
    /// Search-normalized title, derived from `raw_name` at construction.
    pub search_name: String,
    icon: Option<PathBuf>,
    hero: Option<PathBuf>,
    logo: Option<PathBuf>,
    screenshot: Option<PathBuf>,
}

impl GameEntry {
    /// Whether artwork of the given kind was found.
    pub fn has(&self, kind: AssetKind) -> bool {
        self.asset_path(kind).is_some()
    }

    /// Resolved artwork path for the given kind, when present.
    pub fn asset_path(&self, kind: AssetKind) -> Option<&Path> {
        match kind {
            AssetKind::Icon => self.icon.as_deref(),
            AssetKind::Hero => self.hero.as_deref(),
            AssetKind::Logo => self.logo.as_deref(),
            AssetKind::Screenshot => self.screenshot.as_deref(),
        }
    }

    /// Whether the resolved artwork for this kind was written by this tool
    /// (exact filename match) rather than supplied externally.
    pub fn is_generated(&self, kind: AssetKind) -> bool {
        self.asset_path(kind)
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .is_some_and(|name| kind.is_generated(name))
    }

    /// Search-query variants for this game, in priority order.
    pub fn search_variants(&self) -> Vec<String> {
        search_variants(&self.raw_name)
    }
}

impl PartialEq for GameEntry {
    fn eq(&self, other: &Self) -> bool {
        self.folder_path == other.folder_path
    }
}

impl Eq for GameEntry {}

impl Hash for GameEntry {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.folder_path.hash(state);
    }
}

/// Enumerates platforms and games under a resolved library root.
pub struct LibraryScanner {
    fs: Arc<dyn Filesystem>,
}

impl LibraryScanner {
    pub fn new(fs: Arc<dyn Filesystem>) -> Self {
        Self { fs }
    }

    /// List platform folder names under the root, alphabetically.
    ///
    /// A missing root yields an empty list, not an error; an unreadable
    /// root is logged and likewise contributes nothing.
    pub fn list_platforms(&self, root: &Path) -> Vec<String> {
        if !self.fs.is_dir(root) {
            log::debug!("library root {} does not exist", root.display());
            return Vec::new();
        }
        let children = match self.fs.list_dir(root) {
            Ok(children) => children,
            Err(err) => {
                log::warn!("failed to list {}: {err}", root.display());
                return Vec::new();
            }
        };

        let mut platforms: Vec<String> = children
            .into_iter()
            .filter(|child| self.fs.is_dir(child))
            .filter_map(|child| {
                child
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
            })
            .filter(|name| {
                !name.starts_with('.')
                    && !platform::is_reserved_folder(name)
                    && platform::is_platform_folder(name)
            })
            .collect();
        platforms.sort_by_key(|name| name.to_lowercase());
        platforms
    }

    /// List game entries inside a platform folder, case-insensitive
    /// alphabetical by raw name.
    ///
    /// A missing platform folder yields an empty list. Games with zero
    /// artwork are included; absent art is a normal state.
    pub fn list_games(&self, root: &Path, platform_folder: &str) -> Vec<GameEntry> {
        let platform_dir = root.join(platform_folder);
        if !self.fs.is_dir(&platform_dir) {
            log::debug!("platform folder {} does not exist", platform_dir.display());
            return Vec::new();
        }
        let children = match self.fs.list_dir(&platform_dir) {
            Ok(children) => children,
            Err(err) => {
                log::warn!("failed to list {}: {err}", platform_dir.display());
                return Vec::new();
            }
        };

        let mut games: Vec<GameEntry> = children
            .into_iter()
            .filter(|child| self.fs.is_dir(child))
            .filter_map(|child| {
                let name = child.file_name()?.to_string_lossy().into_owned();
                if name.starts_with('.')
                    || GAME_FOLDER_EXCLUSIONS
                        .iter()
                        .any(|x| x.eq_ignore_ascii_case(&name))
                {
                    return None;
                }
                Some(self.scan_game(child.clone(), name))
            })
            .collect();
        games.sort_by_key(|game| game.raw_name.to_lowercase());
        games
    }

    /// Probe a game folder for artwork under both naming conventions.
    fn scan_game(&self, folder_path: PathBuf, raw_name: String) -> GameEntry {
        let mut resolved: [Option<PathBuf>; 4] = [None, None, None, None];
        for (slot, kind) in resolved.iter_mut().zip(AssetKind::ALL) {
            for candidate in kind.candidate_names() {
                let path = folder_path.join(&candidate);
                if self.fs.is_file(&path) {
                    *slot = Some(path);
                    break;
                }
            }
        }
        let [icon, hero, logo, screenshot] = resolved;

        GameEntry {
            display_name: clean_title(&raw_name),
            search_name: normalize_for_search(&raw_name),
            raw_name,
            folder_path,
            icon,
            hero,
            logo,
            screenshot,
        }
    }
}

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod tests;
