//! Name folding shared by every fuzzy lookup in the resolver.
//!
//! A `NameKey` lower-cases a name, folds the plural on its last word, and
//! drops separators so `"Wall Types"`, `"WallType"` and `"walltypes"` all land
//! on `walltype`. Plural folding is table-driven rather than a blanket
//! "strip s/es" so pairs like `Space`/`Spaces` and `Niche`/`Niches` agree and
//! words like `Species` or `Glass` survive untouched.

use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier prefix used by the host's language-neutral category catalog.
const IDENTIFIER_PREFIX: &str = "ost_";

// Words whose singular/plural relation no suffix rule gets right.
const IRREGULAR: &[(&str, &str)] = &[
    ("species", "species"),
    ("series", "series"),
    ("analyses", "analysis"),
    ("vertices", "vertex"),
    ("indices", "index"),
    ("children", "child"),
    ("people", "person"),
];

// Plural endings that take "es"; everything else takes a bare "s".
const ES_ENDINGS: &[&str] = &["sses", "xes", "ches", "shes", "zzes"];

// Singular endings whose "e" the matching "es" plural hides (`niche`/`niches`).
const SILENT_E_ENDINGS: &[&str] = &["sse", "xe", "che", "she"];

// Singular endings that already end in "s" and must not be stripped.
const SINGULAR_S_ENDINGS: &[&str] = &["ss", "us", "is"];

const SPATIAL_TOKENS: &[&str] = &["room", "area", "space"];

/// Folded, separator-free comparison key.
///
/// Equality and hashing look only at the folded key; the word list is kept
/// for checks that must respect word boundaries.
#[derive(Clone, Debug)]
pub struct NameKey {
    key: String,
    words: Vec<String>,
}

impl NameKey {
    pub fn new(raw: &str) -> Self {
        let lowered = raw.trim().to_lowercase();
        let mut words: Vec<String> = lowered
            .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(last) = words.last_mut() {
            *last = fold_plural(last);
        }
        NameKey {
            key: words.concat(),
            words,
        }
    }

    /// Key for a language-neutral identifier such as `OST_Walls`.
    pub fn from_identifier(raw: &str) -> Self {
        let trimmed = raw.trim();
        let stripped = match trimmed.get(..IDENTIFIER_PREFIX.len()) {
            Some(prefix) if prefix.eq_ignore_ascii_case(IDENTIFIER_PREFIX) => {
                &trimmed[IDENTIFIER_PREFIX.len()..]
            }
            _ => trimmed,
        };
        NameKey::new(stripped)
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }

    /// True when any single word mentions a spatial category.
    pub fn mentions_spatial(&self) -> bool {
        self.words
            .iter()
            .any(|word| SPATIAL_TOKENS.iter().any(|token| word.contains(token)))
    }

    /// True when the key is exactly one bare spatial token (`room`, `area`, `space`).
    pub fn is_spatial_token(&self) -> bool {
        SPATIAL_TOKENS.contains(&self.key.as_str())
    }
}

impl PartialEq for NameKey {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for NameKey {}

impl Hash for NameKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// Fold one lower-cased word to its comparison stem.
///
/// Singulars and plurals of the same word reach the same stem; the stem is
/// not always the dictionary singular (`niche` and `niches` both give `nich`).
pub fn fold_plural(word: &str) -> String {
    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == word) {
        return (*singular).to_string();
    }
    if word.len() > 4 {
        if let Some(stem) = word.strip_suffix("ies") {
            return format!("{stem}y");
        }
    }
    if word.len() > 3 {
        if let Some(stem) = word.strip_suffix("ie") {
            return format!("{stem}y");
        }
    }
    if ES_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
        return word[..word.len() - 2].to_string();
    }
    if SILENT_E_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
        return word[..word.len() - 1].to_string();
    }
    if SINGULAR_S_ENDINGS.iter().any(|ending| word.ends_with(ending)) {
        return word.to_string();
    }
    match word.strip_suffix('s') {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => word.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_plural_rule_table() {
        let cases = [
            ("walls", "wall"),
            ("wall", "wall"),
            ("dimensions", "dimension"),
            ("spaces", "space"),
            ("space", "space"),
            ("areas", "area"),
            ("rooms", "room"),
            ("assemblies", "assembly"),
            ("boxes", "box"),
            ("switches", "switch"),
            ("glasses", "glass"),
            ("glass", "glass"),
            ("status", "status"),
            ("analysis", "analysis"),
            ("analyses", "analysis"),
            ("species", "species"),
            ("series", "series"),
            ("ties", "tie"),
            ("movies", "movy"),
            ("movie", "movy"),
            ("sizes", "size"),
            ("niches", "nich"),
            ("niche", "nich"),
            ("caches", "cach"),
            ("buzzes", "buzz"),
            ("s", "s"),
        ];
        for (input, expected) in cases {
            assert_eq!(fold_plural(input), expected, "folding {input}");
        }
    }

    #[test]
    fn singular_and_plural_agree_for_e_endings() {
        for word in [
            "Size", "Niche", "Cache", "Ache", "Crevasse", "Annexe", "Axe", "Movie", "Tie", "Pie",
            "Space", "Type", "Style", "Line", "House", "Phase", "Glaze", "Tile", "Base",
        ] {
            assert_eq!(NameKey::new(word), NameKey::new(&format!("{word}s")), "{word}");
        }
    }

    #[test]
    fn keys_ignore_case_separators_and_plural() {
        assert_eq!(NameKey::new("Wall Types"), NameKey::new("WallType"));
        assert_eq!(NameKey::new("walltypes"), NameKey::new("WallType"));
        assert_eq!(NameKey::new("Generic Models").as_str(), "genericmodel");
        assert_eq!(NameKey::new("  Doors ").as_str(), "door");
        assert_eq!(NameKey::new("Structural_Columns").as_str(), "structuralcolumn");
        assert!(NameKey::new("   ").is_empty());
    }

    #[test]
    fn identifier_keys_strip_prefix() {
        assert_eq!(NameKey::from_identifier("OST_Rooms").as_str(), "room");
        assert_eq!(NameKey::from_identifier("ost_MEPSpaces").as_str(), "mepspace");
        assert_eq!(NameKey::from_identifier("Walls").as_str(), "wall");
    }

    #[test]
    fn spatial_detection() {
        assert!(NameKey::new("Rooms").is_spatial_token());
        assert!(NameKey::new("Space").is_spatial_token());
        assert!(!NameKey::new("Room Tags").is_spatial_token());
        assert!(NameKey::new("Room Tags").mentions_spatial());
        assert!(NameKey::new("MEP Spaces").mentions_spatial());
        assert!(!NameKey::new("Walls").mentions_spatial());
        assert!(!NameKey::new("Rear Easement").mentions_spatial());
        assert!(!NameKey::new("rear_easements").mentions_spatial());
    }
}
