//! Hue color tokens
//!
//! Resolves design-system color tokens to hex values.
//!
//! # Overview
//!
//! A design system's colors are authored in three layers:
//!
//! - **Palette**: raw color families and their shades (`Blue` / `500` -> `#3B82F6`)
//! - **Theme mapping**: theme roles pointing at shades or other roles,
//!   including light/dark specific ones (`color_light_primary` -> `color_blue_500`)
//! - **Semantic mapping**: intent-based names pointing at a mode-agnostic role
//!   (`text.error` -> `color_error_text`)
//!
//! [`TokenResolver`] walks those layers, caching every result for the life of
//! the resolver.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use hue_tokens::{ColorDataset, TokenResolver};
//!
//! let dataset = ColorDataset::load_dir("src/data")?;
//! let resolver = TokenResolver::new(dataset);
//!
//! let hex = resolver.resolve_color_token(Some("color_blue_500"))?;
//! let colors = resolver.resolve_semantic_token("text.error")?;
//! println!("{} / {}", colors.light, colors.dark);
//! ```
//!
//! # Lookup order
//!
//! When several categories define the same key, the first category in lookup
//! order wins. Categories listed in [`ResolverConfig::category_priority`] come
//! first; the rest follow sorted by name.

mod cache;
mod config;
mod dataset;
mod error;
mod resolver;
mod token;

pub use cache::{CacheStats, ResolutionCache};
pub use config::{ResolverConfig, DEFAULT_CATEGORY_PRIORITY};
pub use dataset::{
    family_key, is_hex_color, ColorDataset, Palette, SemanticEntry, SemanticMapping, Shade,
    ThemeMapping, PALETTE_FILE, SEMANTIC_MAPPING_FILE, THEME_MAPPING_FILE,
};
pub use error::{ConfigError, DatasetError, ResolveError};
pub use resolver::{DatasetReport, ResolvedColor, SemanticColors, SemanticRow, TokenResolver};
pub use token::{normalize, palette_ref, theme_key_candidates, PaletteRef, ParsedToken, ThemeMode};
