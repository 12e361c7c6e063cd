//! Artwork kinds and filename conventions for game folders.
//!
//! Two conventions coexist in a library. Artwork written by this tool uses
//! fixed PNG names (`icon.png`, `hero_1.png`, ...). Artwork that predates
//! the tool arrives as JPEGs and numbered variants (`slide_3.jpg`,
//! `hero_2.jpeg`). Which convention produced a file must be decidable from
//! the resolved filename alone, so classification is an exact name match.

use std::fmt;
use std::str::FromStr;

/// A category of artwork associated with a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Square launcher icon.
    Icon,
    /// Wide banner artwork.
    Hero,
    /// Transparent title logo.
    Logo,
    /// In-game screenshot.
    Screenshot,
}

/// How many numbered variants (`hero_N`, `slide_N`) are probed per kind.
const NUMBERED_VARIANTS: u32 = 10;

impl AssetKind {
    /// All asset kinds, in presentation order.
    pub const ALL: [AssetKind; 4] = [
        AssetKind::Icon,
        AssetKind::Hero,
        AssetKind::Logo,
        AssetKind::Screenshot,
    ];

    /// Lowercase identifier ("icon", "hero", ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Icon => "icon",
            AssetKind::Hero => "hero",
            AssetKind::Logo => "logo",
            AssetKind::Screenshot => "screenshot",
        }
    }

    /// The fixed filename this tool writes for the kind.
    pub fn generated_name(&self) -> &'static str {
        match self {
            AssetKind::Icon => "icon.png",
            AssetKind::Hero => "hero_1.png",
            AssetKind::Logo => "logo.png",
            AssetKind::Screenshot => "screenshot.png",
        }
    }

    /// Whether a resolved filename is the application-generated name for
    /// this kind (exact match; anything else is externally supplied).
    pub fn is_generated(&self, file_name: &str) -> bool {
        file_name == self.generated_name()
    }

    /// Candidate filenames for this kind, in probe order. The first
    /// existing candidate wins.
    pub fn candidate_names(&self) -> Vec<String> {
        match self {
            AssetKind::Icon => base_candidates("icon", &["png", "jpg", "jpeg"]),
            AssetKind::Screenshot => {
                let mut names = base_candidates("screenshot", &["png", "jpg", "jpeg"]);
                for i in 1..=NUMBERED_VARIANTS {
                    for ext in ["png", "jpg", "jpeg"] {
                        names.push(format!("slide_{i}.{ext}"));
                    }
                }
                names
            }
            AssetKind::Hero => {
                let mut names = vec!["hero_1.png".to_string()];
                for i in 1..=NUMBERED_VARIANTS {
                    for ext in ["jpg", "jpeg", "png"] {
                        names.push(format!("hero_{i}.{ext}"));
                    }
                }
                names
            }
            AssetKind::Logo => {
                let mut names = base_candidates("logo", &["png", "jpg", "jpeg"]);
                names.extend(base_candidates("title", &["png", "jpg", "jpeg"]));
                names
            }
        }
    }
}

fn base_candidates(stem: &str, extensions: &[&str]) -> Vec<String> {
    extensions.iter().map(|ext| format!("{stem}.{ext}")).collect()
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error returned when a string cannot be parsed into an `AssetKind`.
#[derive(Debug, Clone)]
pub struct AssetKindParseError(pub String);

impl fmt::Display for AssetKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown asset kind: '{}'", self.0)
    }
}

impl std::error::Error for AssetKindParseError {}

impl FromStr for AssetKind {
    type Err = AssetKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "icon" => Ok(AssetKind::Icon),
            "hero" => Ok(AssetKind::Hero),
            "logo" => Ok(AssetKind::Logo),
            "screenshot" => Ok(AssetKind::Screenshot),
            _ => Err(AssetKindParseError(s.to_string())),
        }
    }
}
