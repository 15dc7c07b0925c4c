//! Resolver configuration (usually the `[resolver]` table of `hue.toml`)

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::resolver::SemanticColors;

/// Category order of the site's theme source document
pub const DEFAULT_CATEGORY_PRIORITY: [&str; 6] =
    ["brand", "neutral", "error", "loading", "success", "avatar"];

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Categories searched first, in this order. Categories not listed here
    /// are searched afterwards in lexicographic order of their names.
    pub category_priority: Vec<String>,

    /// Colors returned for semantic tokens that do not resolve
    pub fallback: SemanticColors,

    /// Exact-match token rewrites applied before resolution, for references
    /// the dataset spells differently from its own keys.
    pub aliases: IndexMap<String, String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            category_priority: DEFAULT_CATEGORY_PRIORITY
                .iter()
                .map(|s| s.to_string())
                .collect(),
            fallback: SemanticColors::default(),
            aliases: IndexMap::new(),
        }
    }
}

impl ResolverConfig {
    pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(src)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let src = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&src)
    }

    /// Order `names` for first-match lookups: prioritized categories first,
    /// then the rest sorted by name.
    pub fn order_categories<'a>(&self, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let names: Vec<&str> = names.into_iter().collect();

        let mut ordered: Vec<String> = Vec::with_capacity(names.len());
        for p in &self.category_priority {
            if names.contains(&p.as_str()) && !ordered.contains(p) {
                ordered.push(p.clone());
            }
        }

        let mut rest: Vec<&str> = names
            .into_iter()
            .filter(|n| !self.category_priority.iter().any(|p| p == n))
            .collect();
        rest.sort_unstable();
        rest.dedup();
        ordered.extend(rest.into_iter().map(String::from));

        ordered
    }

    /// Alias target for `token`, or `token` itself
    pub fn alias<'a>(&'a self, token: &'a str) -> &'a str {
        self.aliases.get(token).map(String::as_str).unwrap_or(token)
    }
}
