//! Color dataset: palette, theme mapping and semantic mapping
//!
//! The three structures are loaded once (usually from the site's static JSON
//! files) and never mutated afterwards. Resolution only ever borrows them.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

use crate::error::DatasetError;

/// File names the site ships its color data under.
pub const PALETTE_FILE: &str = "color_palette.json";
pub const THEME_MAPPING_FILE: &str = "theme_color_mapping.json";
pub const SEMANTIC_MAPPING_FILE: &str = "semantic_color_mapping.json";

/// Lookup key for a palette family: whitespace removed, lowercased.
///
/// `"Gray Alpha"`, `"GrayAlpha"` and `"grayalpha"` all map to `grayalpha`.
pub fn family_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A single entry within a palette family
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shade {
    /// Level label, e.g. `"500"` or `"alpha (10%)"`. Numeric levels in the
    /// JSON are stored as their decimal text.
    #[serde(deserialize_with = "level_from_json")]
    pub level: String,
    pub hex: String,
    #[serde(default)]
    pub rgb: String,
    /// Design-tool variable name, e.g. `Blue/500`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable: Option<String>,
    /// Dark-mode override for this shade
    #[serde(
        default,
        rename = "hexDark",
        skip_serializing_if = "Option::is_none"
    )]
    pub hex_dark: Option<String>,
}

impl Shade {
    pub fn new(level: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            hex: hex.into(),
            rgb: String::new(),
            variable: None,
            hex_dark: None,
        }
    }

    /// Whether this shade's trimmed level equals `level` trimmed.
    pub fn matches_level(&self, level: &str) -> bool {
        self.level.trim() == level.trim()
    }

    /// Whether this shade's design-tool variable is `{family}/{level}`,
    /// e.g. `Red/alpha` for the `alpha (10%)` shade.
    pub fn matches_variable(&self, family: &str, level: &str) -> bool {
        let Some((var_family, var_level)) =
            self.variable.as_deref().and_then(|v| v.split_once('/'))
        else {
            return false;
        };
        family_key(var_family) == family_key(family) && var_level.trim() == level.trim()
    }
}

fn level_from_json<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Level {
        Text(String),
        Integer(i64),
        Float(f64),
    }

    Ok(match Level::deserialize(deserializer)? {
        Level::Text(s) => s,
        Level::Integer(n) => n.to_string(),
        Level::Float(f) => f.to_string(),
    })
}

/// Raw color families, indexed by family key for lookup.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    families: IndexMap<String, Vec<Shade>>,
    by_key: FxHashMap<String, usize>,
}

impl Palette {
    /// Build a palette, enforcing unique levels within each family and unique
    /// family keys across families.
    pub fn from_families(families: IndexMap<String, Vec<Shade>>) -> Result<Self, DatasetError> {
        let mut by_key = FxHashMap::default();

        for (idx, (name, shades)) in families.iter().enumerate() {
            let key = family_key(name);
            if let Some(&prev) = by_key.get(&key) {
                let first = families
                    .get_index(prev)
                    .map(|(n, _)| n.clone())
                    .unwrap_or_default();
                return Err(DatasetError::DuplicateFamilyKey {
                    key,
                    first,
                    second: name.clone(),
                });
            }
            by_key.insert(key, idx);

            for (i, shade) in shades.iter().enumerate() {
                if shades[..i].iter().any(|s| s.matches_level(&shade.level)) {
                    return Err(DatasetError::DuplicateShade {
                        family: name.clone(),
                        level: shade.level.clone(),
                    });
                }
            }
        }

        Ok(Self { families, by_key })
    }

    /// Look up a family by name or family key.
    pub fn family(&self, name: &str) -> Option<&[Shade]> {
        let idx = *self.by_key.get(&family_key(name))?;
        self.families.get_index(idx).map(|(_, s)| s.as_slice())
    }

    /// Shade by level, falling back to the design-tool variable name.
    pub fn shade(&self, family: &str, level: &str) -> Option<&Shade> {
        let shades = self.family(family)?;
        shades
            .iter()
            .find(|s| s.matches_level(level))
            .or_else(|| shades.iter().find(|s| s.matches_variable(family, level)))
    }

    /// Families in authored order
    pub fn families(&self) -> impl Iterator<Item = (&str, &[Shade])> {
        self.families
            .iter()
            .map(|(name, shades)| (name.as_str(), shades.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }
}

/// Theme roles grouped by category: `category -> theme token -> reference`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThemeMapping {
    categories: IndexMap<String, IndexMap<String, String>>,
}

impl ThemeMapping {
    pub fn new(categories: IndexMap<String, IndexMap<String, String>>) -> Self {
        Self { categories }
    }

    pub fn category(&self, name: &str) -> Option<&IndexMap<String, String>> {
        self.categories.get(name)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}

/// One semantic token and the mode-agnostic theme token it maps to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SemanticEntry {
    /// Semantic (developer-facing) name, e.g. `text.error`
    pub dev_token: String,
    /// Name used in the design tool
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_token: Option<String>,
    /// Base theme token, e.g. `color_error_text`
    pub value: String,
}

/// A semantic category may be authored either as a plain
/// `name -> base` object or as an array of entries.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawSemanticCategory {
    Entries(Vec<SemanticEntry>),
    Map(IndexMap<String, String>),
}

impl RawSemanticCategory {
    fn into_entries(self) -> Vec<SemanticEntry> {
        match self {
            Self::Entries(entries) => entries,
            Self::Map(map) => map
                .into_iter()
                .map(|(dev_token, value)| SemanticEntry {
                    dev_token,
                    design_token: None,
                    value,
                })
                .collect(),
        }
    }
}

/// Semantic tokens grouped by category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SemanticMapping {
    categories: IndexMap<String, Vec<SemanticEntry>>,
}

impl<'de> Deserialize<'de> for SemanticMapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = IndexMap::<String, RawSemanticCategory>::deserialize(deserializer)?;
        Ok(Self {
            categories: raw
                .into_iter()
                .map(|(name, category)| (name, category.into_entries()))
                .collect(),
        })
    }
}

impl SemanticMapping {
    pub fn new(categories: IndexMap<String, Vec<SemanticEntry>>) -> Self {
        Self { categories }
    }

    pub fn category(&self, name: &str) -> Option<&[SemanticEntry]> {
        self.categories.get(name).map(Vec::as_slice)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }
}

/// The complete, immutable color dataset
#[derive(Clone, Debug, Default)]
pub struct ColorDataset {
    pub palette: Palette,
    pub theme: ThemeMapping,
    pub semantic: SemanticMapping,
}

impl ColorDataset {
    pub fn new(palette: Palette, theme: ThemeMapping, semantic: SemanticMapping) -> Self {
        let dataset = Self {
            palette,
            theme,
            semantic,
        };
        dataset.warn_malformed();
        dataset
    }

    /// Parse the three JSON documents.
    pub fn from_json(palette: &str, theme: &str, semantic: &str) -> Result<Self, DatasetError> {
        let families: IndexMap<String, Vec<Shade>> =
            serde_json::from_str(palette).map_err(|source| DatasetError::Json {
                what: "palette",
                source,
            })?;
        let theme: ThemeMapping =
            serde_json::from_str(theme).map_err(|source| DatasetError::Json {
                what: "theme mapping",
                source,
            })?;
        let semantic: SemanticMapping =
            serde_json::from_str(semantic).map_err(|source| DatasetError::Json {
                what: "semantic mapping",
                source,
            })?;

        Ok(Self::new(Palette::from_families(families)?, theme, semantic))
    }

    /// Load `color_palette.json`, `theme_color_mapping.json` and
    /// `semantic_color_mapping.json` from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).map_err(|source| DatasetError::Io { path, source })
        };

        let palette = read(PALETTE_FILE)?;
        let theme = read(THEME_MAPPING_FILE)?;
        let semantic = read(SEMANTIC_MAPPING_FILE)?;

        let dataset = Self::from_json(&palette, &theme, &semantic)?;
        debug!(
            "ColorDataset::load_dir: {} families, {} theme categories from {}",
            dataset.palette.len(),
            dataset.theme.category_names().count(),
            dir.display()
        );
        Ok(dataset)
    }

    fn warn_malformed(&self) {
        for (family, shades) in self.palette.families() {
            for shade in shades {
                if !is_hex_color(&shade.hex) {
                    warn!(
                        "palette {}/{}: `{}` is not a hex color",
                        family, shade.level, shade.hex
                    );
                }
                if let Some(dark) = shade.hex_dark.as_deref() {
                    if !is_hex_color(dark) {
                        warn!(
                            "palette {}/{}: dark override `{}` is not a hex color",
                            family, shade.level, dark
                        );
                    }
                }
            }
        }
    }
}

/// `#RGB`, `#RRGGBB` or `#RRGGBBAA`
pub fn is_hex_color(s: &str) -> bool {
    let Some(digits) = s.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6 | 8) && digits.chars().all(|c| c.is_ascii_hexdigit())
}
