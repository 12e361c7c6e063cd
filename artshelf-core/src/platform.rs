/// Platform definitions for library-folder recognition.
///
/// This table centralizes platform identity — canonical key, display name,
/// and accepted folder-name tokens — in one place, replacing ad-hoc string
/// matching. Synonym families ("genesis"/"megadrive"/"md") collapse to one
/// canonical entry; adding a platform means adding a row, not a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlatformDef {
    /// Canonical lowercase key ("snes", "psx", ...).
    pub key: &'static str,
    /// Display name shown in listings.
    pub display_name: &'static str,
    /// Accepted folder-name tokens, pre-normalized (lowercase, no
    /// hyphens/underscores/spaces). The first token is the canonical key.
    pub tokens: &'static [&'static str],
}

/// All recognized platforms.
pub const PLATFORMS: &[PlatformDef] = &[
    // Nintendo
    PlatformDef {
        key: "nes",
        display_name: "Nintendo Entertainment System",
        tokens: &["nes", "famicom", "fc"],
    },
    PlatformDef {
        key: "snes",
        display_name: "Super Nintendo Entertainment System",
        tokens: &["snes", "sfc", "superfamicom", "supernintendo", "snesna"],
    },
    PlatformDef {
        key: "n64",
        display_name: "Nintendo 64",
        tokens: &["n64", "nintendo64"],
    },
    PlatformDef {
        key: "gamecube",
        display_name: "Nintendo GameCube",
        tokens: &["gamecube", "gcn", "ngc", "gc"],
    },
    PlatformDef {
        key: "wii",
        display_name: "Nintendo Wii",
        tokens: &["wii"],
    },
    PlatformDef {
        key: "wiiu",
        display_name: "Nintendo Wii U",
        tokens: &["wiiu"],
    },
    PlatformDef {
        key: "gb",
        display_name: "Game Boy / Game Boy Color",
        tokens: &["gb", "gbc", "gameboy", "gameboycolor"],
    },
    PlatformDef {
        key: "gba",
        display_name: "Game Boy Advance",
        tokens: &["gba", "gameboyadvance"],
    },
    PlatformDef {
        key: "nds",
        display_name: "Nintendo DS",
        tokens: &["nds", "nintendods", "ds"],
    },
    PlatformDef {
        key: "3ds",
        display_name: "Nintendo 3DS",
        tokens: &["3ds", "n3ds", "nintendo3ds"],
    },
    PlatformDef {
        key: "virtualboy",
        display_name: "Nintendo Virtual Boy",
        tokens: &["virtualboy", "vb"],
    },
    // Sega
    PlatformDef {
        key: "sg1000",
        display_name: "Sega SG-1000",
        tokens: &["sg1000", "sc3000"],
    },
    PlatformDef {
        key: "sms",
        display_name: "Sega Master System",
        tokens: &["sms", "mastersystem", "markiii"],
    },
    PlatformDef {
        key: "genesis",
        display_name: "Sega Genesis / Mega Drive",
        tokens: &["genesis", "megadrive", "megadrivejp", "md", "gen", "smd"],
    },
    PlatformDef {
        key: "segacd",
        display_name: "Sega CD / Mega CD",
        tokens: &["segacd", "megacd"],
    },
    PlatformDef {
        key: "32x",
        display_name: "Sega 32X",
        tokens: &["32x", "sega32x"],
    },
    PlatformDef {
        key: "saturn",
        display_name: "Sega Saturn",
        tokens: &["saturn", "segasaturn"],
    },
    PlatformDef {
        key: "dreamcast",
        display_name: "Sega Dreamcast",
        tokens: &["dreamcast", "dc"],
    },
    PlatformDef {
        key: "gamegear",
        display_name: "Sega Game Gear",
        tokens: &["gamegear", "gg"],
    },
    // Sony
    PlatformDef {
        key: "psx",
        display_name: "Sony PlayStation",
        tokens: &["psx", "ps1", "playstation", "playstation1"],
    },
    PlatformDef {
        key: "ps2",
        display_name: "Sony PlayStation 2",
        tokens: &["ps2", "playstation2"],
    },
    PlatformDef {
        key: "ps3",
        display_name: "Sony PlayStation 3",
        tokens: &["ps3", "playstation3"],
    },
    PlatformDef {
        key: "psp",
        display_name: "Sony PlayStation Portable",
        tokens: &["psp", "playstationportable"],
    },
    PlatformDef {
        key: "psvita",
        display_name: "Sony PlayStation Vita",
        tokens: &["psvita", "vita", "playstationvita"],
    },
    // Microsoft
    PlatformDef {
        key: "xbox",
        display_name: "Microsoft Xbox",
        tokens: &["xbox", "ogxbox"],
    },
    PlatformDef {
        key: "xbox360",
        display_name: "Microsoft Xbox 360",
        tokens: &["xbox360", "x360"],
    },
    // Atari
    PlatformDef {
        key: "atari2600",
        display_name: "Atari 2600",
        tokens: &["atari2600", "2600", "vcs"],
    },
    PlatformDef {
        key: "atari7800",
        display_name: "Atari 7800",
        tokens: &["atari7800", "7800"],
    },
    PlatformDef {
        key: "lynx",
        display_name: "Atari Lynx",
        tokens: &["lynx", "atarilynx"],
    },
    PlatformDef {
        key: "jaguar",
        display_name: "Atari Jaguar",
        tokens: &["jaguar", "atarijaguar"],
    },
    // SNK
    PlatformDef {
        key: "neogeo",
        display_name: "SNK Neo Geo",
        tokens: &["neogeo", "neogeoaes", "neogeomvs"],
    },
    PlatformDef {
        key: "ngpc",
        display_name: "SNK Neo Geo Pocket Color",
        tokens: &["ngpc", "ngp", "neogeopocket"],
    },
    // NEC
    PlatformDef {
        key: "pcengine",
        display_name: "NEC PC Engine / TurboGrafx-16",
        tokens: &["pcengine", "turbografx", "turbografx16", "tg16", "pce"],
    },
    // Bandai
    PlatformDef {
        key: "wonderswan",
        display_name: "Bandai WonderSwan",
        tokens: &["wonderswan", "wonderswancolor", "wsc"],
    },
    // Computers & arcade
    PlatformDef {
        key: "arcade",
        display_name: "Arcade",
        tokens: &["arcade", "mame", "fbneo", "fba"],
    },
    PlatformDef {
        key: "dos",
        display_name: "MS-DOS",
        tokens: &["dos", "msdos"],
    },
    PlatformDef {
        key: "amiga",
        display_name: "Commodore Amiga",
        tokens: &["amiga"],
    },
    PlatformDef {
        key: "c64",
        display_name: "Commodore 64",
        tokens: &["c64", "commodore64"],
    },
];

/// Folder names the launcher uses for its own bookkeeping. These are never
/// platform folders and are excluded before any token matching so that e.g.
/// "databases" can't match the "nes" token by substring.
pub const RESERVED_FOLDERS: &[&str] = &[
    "platforms",
    "cache",
    "shared_prefs",
    "databases",
    "lib",
    "code_cache",
    "files",
    "no_backup",
    "app_webview",
];

/// Substring token matching is only allowed from this length up. Short
/// tokens ("md", "gg", "nes") match exactly to avoid false positives in
/// unrelated names.
const MIN_SUBSTRING_TOKEN_LEN: usize = 4;

/// Normalize a folder name for token comparison: lowercase and strip
/// hyphens, underscores, and spaces ("Play-Station" -> "playstation").
pub fn normalize_token(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Whether this folder name is one of the launcher's reserved system
/// folders (case-insensitive).
pub fn is_reserved_folder(name: &str) -> bool {
    RESERVED_FOLDERS
        .iter()
        .any(|r| r.eq_ignore_ascii_case(name))
}

/// Match a folder name against the platform table.
///
/// Exact token matches win over substring matches; among substring matches
/// the longest contained token wins, so "playstation2-roms" resolves to
/// PS2 rather than PS1.
pub fn match_platform(folder_name: &str) -> Option<&'static PlatformDef> {
    if is_reserved_folder(folder_name) {
        return None;
    }
    let normalized = normalize_token(folder_name);
    if normalized.is_empty() {
        return None;
    }

    for def in PLATFORMS {
        if def.tokens.iter().any(|t| *t == normalized) {
            return Some(def);
        }
    }

    let mut best: Option<(&'static PlatformDef, usize)> = None;
    for def in PLATFORMS {
        for token in def.tokens {
            if token.len() >= MIN_SUBSTRING_TOKEN_LEN
                && normalized.contains(token)
                && best.is_none_or(|(_, len)| token.len() > len)
            {
                best = Some((def, token.len()));
            }
        }
    }
    best.map(|(def, _)| def)
}

/// Whether a folder name looks like a platform folder.
pub fn is_platform_folder(folder_name: &str) -> bool {
    match_platform(folder_name).is_some()
}

/// Display name for a platform folder: the canonical name when the folder
/// matches the table, otherwise the raw name with separators replaced by
/// spaces and words title-cased.
pub fn display_name_for(folder_name: &str) -> String {
    if let Some(def) = match_platform(folder_name) {
        return def.display_name.to_string();
    }
    folder_name
        .split(['-', '_', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
