//! Core data tables and pure text transforms for artshelf.
//!
//! This crate holds everything that needs no I/O: the platform token tables
//! used to recognize library folders, the title-cleaning pipeline that turns
//! raw game-folder names into display and search titles, and the artwork
//! filename conventions.

pub mod assets;
pub mod platform;
pub mod title;

pub use assets::AssetKind;
pub use platform::{PlatformDef, display_name_for, is_platform_folder, is_reserved_folder, match_platform};
pub use title::{clean_title, normalize_for_search, search_variants};
