//! Title cleaning and search normalization for raw game-folder names.
//!
//! Library folders carry dump-convention noise:
//! ```text
//! Chrono Trigger (USA) (Rev 1) [!].sfc
//! ```
//! The cleaning pipeline strips that noise in a fixed rule order. The order
//! is a contract: extension stripping runs first so parenthetical rules
//! never see extension-adjacent text, and whitespace collapse runs last.

use std::sync::LazyLock;

use regex::Regex;

/// File extensions recognized as ROM/archive suffixes and stripped before
/// any tag rule runs.
const ROM_EXTENSIONS: &[&str] = &[
    "3ds", "7z", "a26", "a52", "a78", "bin", "chd", "cia", "cso", "cue", "gb", "gba", "gbc",
    "gcm", "gcz", "gen", "gg", "img", "iso", "jag", "lnx", "md", "n64", "nds", "nes", "ngc",
    "ngp", "nsp", "pbp", "pce", "rar", "rom", "rvz", "sfc", "smc", "smd", "sms", "v64", "wbfs",
    "ws", "wsc", "xci", "z64", "zip",
];

/// Region words accepted inside a parenthetical region tag.
const REGION_WORDS: &[&str] = &[
    "usa", "japan", "europe", "world", "australia", "korea", "china", "taiwan", "brazil",
    "france", "germany", "spain", "italy", "netherlands", "sweden", "norway", "denmark",
    "finland", "portugal", "russia", "asia", "canada", r"hong\s?kong", r"united\s?kingdom",
    "scandinavia", r"latin\s?america",
];

/// Special/status words that mark a whole parenthetical tag for removal.
const SPECIAL_TAGS: &[&str] = &[
    "proto", "prototype", "beta", "demo", "sample", "unl", "unlicensed", "pirate", "kiosk",
    "promo", "aftermarket", "homebrew", "hack", "debug", "alt", "alternate",
];

/// The ordered tag-stripping pipeline. Every rule replaces its match with a
/// single space; reordering rules changes output and is pinned by tests.
static TAG_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    let region = REGION_WORDS.join("|");
    let region_part = format!(r"(?:{region}|[a-z]{{2}})");
    let special = SPECIAL_TAGS.join("|");

    let patterns: Vec<String> = vec![
        // Bracketed dump-status tags: [!], [b], [T+Eng], ...
        r"\[[^\]]*\]".into(),
        // Parenthetical size annotations: (6.01 GB), (700 MB)
        r"(?i)\(\s*\d+(?:[.,]\d+)?\s*(?:[kmgt]i?b|bytes)\s*\)".into(),
        // Bare byte counts in parens: (1048576)
        r"\(\s*\d{6,}\s*\)".into(),
        // Region/language tags: (USA), (Japan), (En,Fr,De), (USA, Europe)
        format!(r"(?i)\(\s*{region_part}(?:\s*,\s*{region_part})*\s*\)"),
        // Special/status tags: (Proto), (Beta 2), (Demo), ...
        format!(r"(?i)\(\s*(?:{special})\b[^)]*\)"),
        // Revision tags: (Rev A), (Rev 1.1)
        r"(?i)\(\s*rev(?:ision)?\.?\s*[a-z0-9][a-z0-9.]*\s*\)".into(),
        // Version tags, parenthetical and bare: (v1.1), v1.2, version 3
        r"(?i)\(\s*v\.?\s*\d[^)]*\)".into(),
        r"(?i)\bv\d+(?:\.\d+)+\b".into(),
        r"(?i)\bversion\s+\d+(?:\.\d+)*\b".into(),
        // Disc annotations: (Disc 1), (Disc 1 of 3), (CD 2), (Side A).
        // A digit (or a lone side letter) is required so "(Discovery)"
        // and "(Sidekick)" survive.
        r"(?i)\(\s*(?:dis[ck]|cd)[\s#._-]*\d+[^)]*\)".into(),
        r"(?i)\(\s*side\s+[a-z0-9]\s*\)".into(),
        // Update/DLC/patch markers
        r"(?i)\(\s*(?:update|dlc|patch)\b[^)]*\)".into(),
        r"(?i)\s*\+\s*(?:update|dlc)s?\b".into(),
        // Parens emptied by earlier rules
        r"\(\s*\)".into(),
    ];

    patterns
        .into_iter()
        .map(|p| (Regex::new(&p).expect("tag rule pattern"), " "))
        .collect()
});

/// Symbol substitutions applied during search normalization.
const SYMBOL_SUBSTITUTIONS: &[(char, &str)] = &[
    ('&', " and "),
    ('+', " plus "),
    ('@', " at "),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2013}', "-"),
    ('\u{2014}', "-"),
    ('\u{2026}', "..."),
    ('\u{2122}', ""),
    ('\u{00AE}', ""),
    ('\u{00A9}', ""),
];

/// Accent-folding table: accented Latin characters to their ASCII base.
const ACCENT_FOLD: &[(char, &str)] = &[
    ('á', "a"), ('à', "a"), ('â', "a"), ('ä', "a"), ('ã', "a"), ('å', "a"),
    ('Á', "A"), ('À', "A"), ('Â', "A"), ('Ä', "A"), ('Ã', "A"), ('Å', "A"),
    ('é', "e"), ('è', "e"), ('ê', "e"), ('ë', "e"),
    ('É', "E"), ('È', "E"), ('Ê', "E"), ('Ë', "E"),
    ('í', "i"), ('ì', "i"), ('î', "i"), ('ï', "i"),
    ('Í', "I"), ('Ì', "I"), ('Î', "I"), ('Ï', "I"),
    ('ó', "o"), ('ò', "o"), ('ô', "o"), ('ö', "o"), ('õ', "o"), ('ø', "o"),
    ('Ó', "O"), ('Ò', "O"), ('Ô', "O"), ('Ö', "O"), ('Õ', "O"), ('Ø', "O"),
    ('ú', "u"), ('ù', "u"), ('û', "u"), ('ü', "u"),
    ('Ú', "U"), ('Ù', "U"), ('Û', "U"), ('Ü', "U"),
    ('ā', "a"), ('ē', "e"), ('ī', "i"), ('ō', "o"), ('ū', "u"),
    ('Ā', "A"), ('Ē', "E"), ('Ī', "I"), ('Ō', "O"), ('Ū', "U"),
    ('ý', "y"), ('ÿ', "y"), ('Ý', "Y"),
    ('ñ', "n"), ('Ñ', "N"),
    ('ç', "c"), ('Ç', "C"),
    ('æ', "ae"), ('Æ', "Ae"),
    ('œ', "oe"), ('Œ', "Oe"),
    ('ß', "ss"),
    ('š', "s"), ('Š', "S"),
    ('ž', "z"), ('Ž', "Z"),
];

/// Roman-numeral substitutions tried for search variants. Applied as
/// whole-word replacements; single-letter numerals (V, X) are deliberately
/// absent since they collide with initials.
const ROMAN_NUMERALS: &[(&str, &str)] = &[
    ("II", "2"),
    ("III", "3"),
    ("IV", "4"),
    ("VI", "6"),
    ("VII", "7"),
    ("VIII", "8"),
    ("IX", "9"),
    ("XI", "11"),
    ("XII", "12"),
];

static ROMAN_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ROMAN_NUMERALS
        .iter()
        .map(|(numeral, digit)| {
            (
                Regex::new(&format!(r"\b{numeral}\b")).expect("roman numeral pattern"),
                *digit,
            )
        })
        .collect()
});

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

/// Strip a recognized ROM/archive extension from the end of a raw name.
fn strip_known_extension(raw: &str) -> &str {
    if let Some(idx) = raw.rfind('.') {
        let ext = &raw[idx + 1..];
        if ROM_EXTENSIONS
            .iter()
            .any(|known| known.eq_ignore_ascii_case(ext))
        {
            return &raw[..idx];
        }
    }
    raw
}

/// Collapse runs of whitespace and trim trailing separator characters.
fn finalize(s: &str) -> String {
    let collapsed = WHITESPACE.replace_all(s, " ");
    collapsed
        .trim()
        .trim_end_matches([' ', '-', '_', '.'])
        .to_string()
}

/// Clean a raw folder/file name into a display title.
///
/// Strips, in order: a known ROM/archive extension, bracketed dump tags,
/// size annotations, region/language tags, special/status tags,
/// revision/version markers, disc numbers, update/DLC markers, and any
/// parens emptied along the way; then collapses whitespace and trims
/// trailing separators.
pub fn clean_title(raw: &str) -> String {
    let mut working = strip_known_extension(raw).to_string();
    for (rule, replacement) in TAG_RULES.iter() {
        working = rule.replace_all(&working, *replacement).into_owned();
    }
    finalize(&working)
}

/// Normalize a raw name into a search-friendly title.
///
/// Runs `clean_title`, folds accented characters to ASCII, substitutes a
/// fixed symbol table (& -> "and", smart punctuation -> ASCII, trademark
/// glyphs removed), strips remaining punctuation except apostrophe and
/// hyphen, and collapses whitespace. Idempotent.
pub fn normalize_for_search(raw: &str) -> String {
    let cleaned = clean_title(raw);
    let mut substituted = String::with_capacity(cleaned.len());
    'chars: for ch in cleaned.chars() {
        for (sym, replacement) in SYMBOL_SUBSTITUTIONS {
            if ch == *sym {
                substituted.push_str(replacement);
                continue 'chars;
            }
        }
        for (accented, base) in ACCENT_FOLD {
            if ch == *accented {
                substituted.push_str(base);
                continue 'chars;
            }
        }
        substituted.push(ch);
    }

    let stripped: String = substituted
        .chars()
        .map(|ch| {
            if ch.is_alphanumeric() || ch.is_whitespace() || ch == '\'' || ch == '-' {
                ch
            } else {
                ' '
            }
        })
        .collect();

    finalize(&stripped)
}

/// Produce search-query variants for a raw name, in priority order.
///
/// Variants: the cleaned title; the normalized title (when different); the
/// title truncated before a colon-separated subtitle; the title truncated
/// before a " - " subtitle; and one variant per successful whole-word
/// Roman-numeral substitution on the cleaned title. Never contains
/// duplicates or empty strings.
pub fn search_variants(raw: &str) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();

    let cleaned = clean_title(raw);
    push_unique(&mut variants, cleaned.clone());
    push_unique(&mut variants, normalize_for_search(raw));

    if let Some(idx) = cleaned.find(':') {
        push_unique(&mut variants, cleaned[..idx].trim().to_string());
    }
    if let Some(idx) = cleaned.find(" - ") {
        push_unique(&mut variants, cleaned[..idx].trim().to_string());
    }

    for (rule, digit) in ROMAN_RULES.iter() {
        if rule.is_match(&cleaned) {
            push_unique(&mut variants, rule.replace_all(&cleaned, *digit).into_owned());
        }
    }

    variants
}

fn push_unique(variants: &mut Vec<String>, candidate: String) {
    if !candidate.is_empty() && !variants.contains(&candidate) {
        variants.push(candidate);
    }
}
