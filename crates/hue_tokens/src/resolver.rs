//! Color token resolution
//!
//! A token is resolved by walking up to three layers of indirection:
//! semantic mapping -> theme mapping -> palette shade. Theme references may
//! chain through any number of other theme tokens (`color_light_*`,
//! `color_dark_*`, ...). The current chain is tracked so a cyclic mapping is
//! reported instead of recursing forever.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::cache::{CacheStats, ResolutionCache};
use crate::config::ResolverConfig;
use crate::dataset::{ColorDataset, SemanticEntry};
use crate::error::ResolveError;
use crate::token::{ParsedToken, PaletteRef, ThemeMode};

/// A resolved color, with the shade's dark-mode override when it has one
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ResolvedColor {
    pub hex: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hex_dark: Option<String>,
}

impl ResolvedColor {
    pub fn new(hex: impl Into<String>) -> Self {
        Self {
            hex: hex.into(),
            hex_dark: None,
        }
    }

    /// Dark-mode hex, falling back to the light value
    pub fn dark_or_light(&self) -> &str {
        self.hex_dark.as_deref().unwrap_or(&self.hex)
    }
}

/// Light and dark colors of a semantic token
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticColors {
    pub light: String,
    pub dark: String,
}

impl Default for SemanticColors {
    fn default() -> Self {
        Self {
            light: "#FFFFFF".to_string(),
            dark: "#000000".to_string(),
        }
    }
}

/// One semantic token with its resolved colors
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SemanticRow {
    pub category: String,
    pub dev_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub design_token: Option<String>,
    /// Mode-agnostic theme token the semantic token maps to
    pub base: String,
    pub colors: SemanticColors,
}

/// Problems found by [`TokenResolver::check`]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DatasetReport {
    /// Distinct reference cycles, each as the chain that closes on itself
    pub cycles: Vec<Vec<String>>,
    /// Theme keys whose reference does not resolve, as `(category, key, reference)`
    pub dangling: Vec<(String, String, String)>,
    /// Semantic tokens where neither the light nor the dark variant resolves
    pub unresolved_semantic: Vec<String>,
}

impl DatasetReport {
    /// No cycles. Dangling references degrade to fallbacks, so they are
    /// reported but don't make a dataset unusable.
    pub fn is_ok(&self) -> bool {
        self.cycles.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        self.cycles.is_empty() && self.dangling.is_empty() && self.unresolved_semantic.is_empty()
    }
}

/// Resolves color tokens against an immutable [`ColorDataset`].
///
/// Each resolver owns its cache, so independent resolvers never share
/// results. The resolver is `Send + Sync`; the cache is internally locked.
#[derive(Debug)]
pub struct TokenResolver {
    dataset: ColorDataset,
    config: ResolverConfig,
    theme_order: Vec<String>,
    semantic_order: Vec<String>,
    cache: ResolutionCache,
}

impl TokenResolver {
    pub fn new(dataset: ColorDataset) -> Self {
        Self::with_config(dataset, ResolverConfig::default())
    }

    pub fn with_config(dataset: ColorDataset, config: ResolverConfig) -> Self {
        let theme_order = config.order_categories(dataset.theme.category_names());
        let semantic_order = config.order_categories(dataset.semantic.category_names());
        debug!(
            "TokenResolver: theme categories {:?}, semantic categories {:?}",
            theme_order, semantic_order
        );

        Self {
            dataset,
            config,
            theme_order,
            semantic_order,
            cache: ResolutionCache::new(),
        }
    }

    pub fn dataset(&self) -> &ColorDataset {
        &self.dataset
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Theme categories in lookup order
    pub fn theme_categories(&self) -> &[String] {
        &self.theme_order
    }

    /// Semantic categories in lookup order
    pub fn semantic_categories(&self) -> &[String] {
        &self.semantic_order
    }

    // ========== Single Tokens ==========

    /// Resolve a token reference to a hex color.
    ///
    /// Literal colors (`#...`) are returned unchanged and `None` stays `None`.
    /// Anything that doesn't resolve is `Ok(None)`; only a reference cycle in
    /// the dataset is an error.
    pub fn resolve_color_token(
        &self,
        token_ref: Option<&str>,
    ) -> Result<Option<String>, ResolveError> {
        Ok(self.resolve_color_data(token_ref)?.map(|c| c.hex))
    }

    /// Like [`resolve_color_token`](Self::resolve_color_token), keeping the
    /// shade's dark-mode override.
    pub fn resolve_color_data(
        &self,
        token_ref: Option<&str>,
    ) -> Result<Option<ResolvedColor>, ResolveError> {
        let Some(token) = token_ref else {
            return Ok(None);
        };
        let mut path = Vec::new();
        self.resolve_token(token, &mut path)
    }

    fn resolve_token(
        &self,
        token: &str,
        path: &mut Vec<String>,
    ) -> Result<Option<ResolvedColor>, ResolveError> {
        if token.starts_with('#') {
            return Ok(Some(ResolvedColor::new(token)));
        }
        if let Some(hit) = self.cache.get(token) {
            trace!("resolve {:?}: cached {:?}", token, hit);
            return Ok(hit);
        }

        let target = self.config.alias(token);
        let parsed = ParsedToken::parse(target, |key| self.is_theme_key(key));
        trace!("resolve {:?}: {:?}", token, parsed);

        let resolved = match parsed {
            ParsedToken::LiteralHex(hex) => Some(ResolvedColor::new(hex)),
            ParsedToken::ThemeReference { keys, fallback } => {
                let mut found = None;
                for key in &keys {
                    found = self.resolve_theme_key(key, path)?;
                    if found.is_some() {
                        break;
                    }
                }
                found.or_else(|| fallback.and_then(|r| self.palette_color(&r)))
            }
            ParsedToken::PaletteReference(r) => self.palette_color(&r),
            ParsedToken::Unparseable => None,
        };

        if resolved.is_none() {
            debug!("resolve {:?}: unresolvable", token);
        }
        self.cache.insert(token, resolved.clone());
        Ok(resolved)
    }

    /// Follow a theme key through every category that defines it, in lookup
    /// order; the first reference that resolves wins.
    fn resolve_theme_key(
        &self,
        key: &str,
        path: &mut Vec<String>,
    ) -> Result<Option<ResolvedColor>, ResolveError> {
        if let Some(start) = path.iter().position(|p| p == key) {
            let mut chain = path[start..].to_vec();
            chain.push(key.to_string());
            debug!("resolve: cycle {}", chain.join(" -> "));
            return Err(ResolveError::CyclicReference { chain });
        }

        path.push(key.to_string());
        let result = self.resolve_theme_targets(key, path);
        path.pop();
        result
    }

    fn resolve_theme_targets(
        &self,
        key: &str,
        path: &mut Vec<String>,
    ) -> Result<Option<ResolvedColor>, ResolveError> {
        for (category, mapped) in self.theme_targets(key) {
            if let Some(mode) = ThemeMode::of(mapped) {
                trace!("{}: {} -> {} ({:?})", category, key, mapped, mode);
            } else {
                trace!("{}: {} -> {}", category, key, mapped);
            }
            if let Some(color) = self.resolve_token(mapped, path)? {
                return Ok(Some(color));
            }
        }
        Ok(None)
    }

    fn theme_targets<'a>(&'a self, key: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.theme_order.iter().filter_map(move |category| {
            self.dataset
                .theme
                .category(category)?
                .get(key)
                .map(|mapped| (category.as_str(), mapped.as_str()))
        })
    }

    fn is_theme_key(&self, key: &str) -> bool {
        self.theme_targets(key).next().is_some()
    }

    fn palette_color(&self, r: &PaletteRef) -> Option<ResolvedColor> {
        let shade = self.dataset.palette.shade(&r.family, &r.level)?;
        Some(ResolvedColor {
            hex: shade.hex.clone(),
            hex_dark: shade.hex_dark.clone(),
        })
    }

    // ========== Semantic Tokens ==========

    /// Semantic mapping entry for `semantic`, searching categories in lookup
    /// order.
    pub fn semantic_entry(&self, semantic: &str) -> Option<&SemanticEntry> {
        self.semantic_order.iter().find_map(|category| {
            self.dataset
                .semantic
                .category(category)?
                .iter()
                .find(|e| e.dev_token == semantic)
        })
    }

    /// Resolve a semantic token to its light and dark colors.
    ///
    /// The mapped base theme token `color_x` is split into `color_light_x`
    /// and `color_dark_x`. Unknown tokens and variants that don't resolve
    /// get the configured fallback colors.
    pub fn resolve_semantic_token(&self, semantic: &str) -> Result<SemanticColors, ResolveError> {
        match self.semantic_entry(semantic) {
            Some(entry) => self.resolve_semantic_base(&entry.value),
            None => {
                debug!("resolve_semantic_token: unknown {:?}", semantic);
                Ok(self.config.fallback.clone())
            }
        }
    }

    fn resolve_semantic_base(&self, base: &str) -> Result<SemanticColors, ResolveError> {
        let light = self.resolve_mode(base, ThemeMode::Light)?;
        let dark = self.resolve_mode(base, ThemeMode::Dark)?;

        Ok(SemanticColors {
            light: light.unwrap_or_else(|| self.config.fallback.light.clone()),
            dark: dark.unwrap_or_else(|| self.config.fallback.dark.clone()),
        })
    }

    fn resolve_mode(&self, base: &str, mode: ThemeMode) -> Result<Option<String>, ResolveError> {
        let token = mode.theme_token(base);
        self.resolve_color_token(Some(&token))
    }

    /// Every semantic token with its resolved colors, categories in lookup
    /// order and entries in authored order.
    pub fn semantic_colors(&self) -> Result<Vec<SemanticRow>, ResolveError> {
        let mut rows = Vec::new();
        for category in &self.semantic_order {
            let Some(entries) = self.dataset.semantic.category(category) else {
                continue;
            };
            for entry in entries {
                rows.push(SemanticRow {
                    category: category.clone(),
                    dev_token: entry.dev_token.clone(),
                    design_token: entry.design_token.clone(),
                    base: entry.value.clone(),
                    colors: self.resolve_semantic_base(&entry.value)?,
                });
            }
        }
        Ok(rows)
    }

    // ========== Dataset Checks ==========

    /// Resolve every theme key and semantic token, collecting cycles and
    /// references that lead nowhere.
    pub fn check(&self) -> DatasetReport {
        let mut report = DatasetReport::default();

        for category in &self.theme_order {
            let Some(entries) = self.dataset.theme.category(category) else {
                continue;
            };
            for (key, mapped) in entries {
                match self.resolve_color_token(Some(mapped)) {
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        report
                            .dangling
                            .push((category.clone(), key.clone(), mapped.clone()));
                    }
                    Err(ResolveError::CyclicReference { chain }) => {
                        if !report.cycles.iter().any(|c| same_cycle(c, &chain)) {
                            report.cycles.push(chain);
                        }
                    }
                }
            }
        }

        for category in &self.semantic_order {
            let Some(entries) = self.dataset.semantic.category(category) else {
                continue;
            };
            for entry in entries {
                let light = self.resolve_mode(&entry.value, ThemeMode::Light);
                let dark = self.resolve_mode(&entry.value, ThemeMode::Dark);
                if matches!((light, dark), (Ok(None), Ok(None))) {
                    report.unresolved_semantic.push(entry.dev_token.clone());
                }
            }
        }

        debug!(
            "check: {} cycles, {} dangling, {} unresolved semantic",
            report.cycles.len(),
            report.dangling.len(),
            report.unresolved_semantic.len()
        );
        report
    }
}

/// Whether two closed chains (`[a, b, a]`, `[b, a, b]`) are the same cycle.
fn same_cycle(a: &[String], b: &[String]) -> bool {
    let (Some((_, a)), Some((_, b))) = (a.split_last(), b.split_last()) else {
        return false;
    };
    if a.len() != b.len() {
        return false;
    }
    (0..a.len()).any(|shift| a.iter().cycle().skip(shift).take(a.len()).eq(b.iter()))
}
