//! Library discovery-and-caching engine for artshelf.
//!
//! The engine resolves the library root across heterogeneous storage
//! layouts ([`RootLocator`]), enumerates platforms, games, and per-game
//! artwork ([`LibraryScanner`]), and serves everything through a two-tier
//! cache with TTL expiry and fine-grained invalidation ([`CacheManager`]).
//! Filesystem and persistence access go through injected capability traits
//! so embedders and tests can substitute their own.

pub mod cache;
pub mod error;
pub mod fs;
pub mod locator;
pub mod scanner;
pub mod settings;

pub use artshelf_core::{AssetKind, clean_title, normalize_for_search, search_variants};
pub use cache::{CACHE_TTL, CacheManager, FileSnapshotStore, PlatformInfo, SnapshotStore};
pub use error::CacheError;
pub use fs::{Filesystem, RealFilesystem};
pub use locator::RootLocator;
pub use scanner::{GameEntry, LibraryScanner};

#[cfg(test)]
#[path = "tests/testutil.rs"]
pub(crate) mod testutil;
