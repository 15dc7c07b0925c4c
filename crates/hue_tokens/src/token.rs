//! Token reference classification
//!
//! Token strings come in a handful of shapes:
//!
//! - `#3B82F6` - a literal color
//! - `color_brand_60`, `color/brand/60` - a theme token (path separators are
//!   normalized to `_`)
//! - `color_Blue_500`, `color_grayalpha_alpha (10%)` - a palette shade
//! - `Blue/500` - a palette shade in design-tool notation
//! - `brand/60`, `avatar/yellowOrange/20` - design-tool names for theme tokens
//!
//! [`ParsedToken::parse`] classifies a string once, so resolution can dispatch
//! on the variant instead of re-inspecting the string at every step.

/// Prefix every theme and palette token starts with
pub const COLOR_PREFIX: &str = "color_";

/// Light or dark variant of a mode-agnostic theme token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ThemeMode {
    Light,
    Dark,
}

impl ThemeMode {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Light => "color_light_",
            Self::Dark => "color_dark_",
        }
    }

    /// Derive the mode-specific token from a base theme token.
    ///
    /// `color_primary` -> `color_light_primary`. Only the first `color_` is
    /// replaced; a base without it is returned unchanged.
    pub fn theme_token(self, base: &str) -> String {
        base.replacen(COLOR_PREFIX, self.prefix(), 1)
    }

    /// Mode of a `color_light_*` / `color_dark_*` token, if any
    pub fn of(token: &str) -> Option<Self> {
        if token.starts_with(Self::Light.prefix()) {
            Some(Self::Light)
        } else if token.starts_with(Self::Dark.prefix()) {
            Some(Self::Dark)
        } else {
            None
        }
    }
}

/// A `family` + `level` pair naming one palette shade
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaletteRef {
    pub family: String,
    pub level: String,
}

/// A token string classified by shape
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParsedToken {
    /// Already a color
    LiteralHex(String),
    /// Matches one or more theme-mapping keys. `fallback` is tried when none
    /// of the keys resolve.
    ThemeReference {
        keys: Vec<String>,
        fallback: Option<PaletteRef>,
    },
    PaletteReference(PaletteRef),
    Unparseable,
}

impl ParsedToken {
    /// Classify `token`. `is_theme_key` reports whether a normalized key is
    /// present in the theme mapping.
    pub fn parse(token: &str, is_theme_key: impl Fn(&str) -> bool) -> Self {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Self::Unparseable;
        }
        if trimmed.starts_with('#') {
            return Self::LiteralHex(token.to_string());
        }

        let palette = palette_ref(token);
        let keys: Vec<String> = theme_key_candidates(token)
            .into_iter()
            .filter(|k| is_theme_key(k))
            .collect();

        if !keys.is_empty() {
            Self::ThemeReference {
                keys,
                fallback: palette,
            }
        } else if let Some(palette) = palette {
            Self::PaletteReference(palette)
        } else {
            Self::Unparseable
        }
    }
}

/// Replace path separators with `_`: `color/brand/60` -> `color_brand_60`.
pub fn normalize(token: &str) -> String {
    token.replace('/', "_")
}

/// Theme-mapping keys `token` may be stored under, most specific first.
pub fn theme_key_candidates(token: &str) -> Vec<String> {
    let mut keys = vec![normalize(token)];

    // Design-tool names: `brand/60` -> `color_brand_60`,
    // `avatar/yellowOrange/20` -> `color_avatar_yellow_orange_20`
    if !token.to_ascii_lowercase().starts_with("color") {
        let parts: Vec<&str> = token.split('/').map(str::trim).collect();
        let key = match parts.as_slice() {
            [family, level] if !family.is_empty() && !level.is_empty() => {
                Some(format!("{COLOR_PREFIX}{family}_{level}").to_lowercase())
            }
            ["avatar", sub, level] if !sub.is_empty() && !level.is_empty() => Some(
                format!("{COLOR_PREFIX}avatar_{}_{level}", snake_case(sub)).to_lowercase(),
            ),
            _ => None,
        };
        if let Some(key) = key {
            if !keys.contains(&key) {
                keys.push(key);
            }
        }
    }

    keys
}

/// Parse a palette shade reference.
///
/// Accepts `color_<family>_<level>` where `<family>` is letters and spaces and
/// `<level>` is the non-empty remainder, and the design-tool form
/// `<Family>/<Level>`.
pub fn palette_ref(token: &str) -> Option<PaletteRef> {
    let normalized = normalize(token);
    if let Some(rest) = normalized.strip_prefix(COLOR_PREFIX) {
        let (family, level) = rest.split_once('_')?;
        return family_and_level(family, level);
    }

    let (family, level) = token.split_once('/')?;
    if level.contains('/') {
        return None;
    }
    family_and_level(family, level)
}

fn family_and_level(family: &str, level: &str) -> Option<PaletteRef> {
    let family_ok = !family.trim().is_empty()
        && family
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c.is_whitespace());
    if !family_ok || level.trim().is_empty() {
        return None;
    }
    Some(PaletteRef {
        family: family.to_string(),
        level: level.to_string(),
    })
}

/// `yellowOrange` -> `yellow_orange`
fn snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    for (i, c) in s.trim().chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else if c.is_whitespace() {
            out.push('_');
        } else {
            out.push(c);
        }
    }
    out
}
