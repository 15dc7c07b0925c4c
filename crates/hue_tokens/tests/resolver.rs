use hue_tokens::{ColorDataset, ResolveError, SemanticColors, TokenResolver};
use pretty_assertions::assert_eq;
use serde_json::json;

const GRAY_900: &str = "#111827";

fn site_dataset() -> ColorDataset {
    let palette = json!({
        "Blue": [
            { "level": "500", "hex": "#3B82F6", "rgb": "rgb(59,130,246)" },
            { "level": 600, "hex": "#2563EB", "rgb": "rgb(37,99,235)", "hexDark": "#60A5FA" }
        ],
        "Gray": [
            { "level": "900", "hex": GRAY_900, "rgb": "rgb(17,24,39)" },
            { "level": "white", "hex": "#FFFFFF", "rgb": "rgb(255,255,255)" }
        ],
        "Gray Alpha": [
            { "level": "alpha (10%)", "hex": "#00000019", "rgb": "rgb(0,0,0)" }
        ]
    });
    let theme = json!({
        "brand": {
            "color_brand_60": "color_Blue_500",
            "color_light_primary": "color_blue_500",
            "color_dark_primary": "color_gray_900",
            "color_accent": "Blue/600"
        },
        "neutral": {
            "color_light_surface": "color_neutral_white",
            "color_neutral_white": "color_Gray_white"
        },
        "error": {
            "color_light_only": "color_brand_60"
        }
    });
    let semantic = json!({
        "text": {
            "text.primary": "color_primary",
            "text.only-light": "color_only"
        },
        "surface": [
            { "devToken": "surface.base", "designToken": "Surface/Base", "value": "color_surface" }
        ]
    });

    ColorDataset::from_json(
        &palette.to_string(),
        &theme.to_string(),
        &semantic.to_string(),
    )
    .unwrap()
}

fn resolve(resolver: &TokenResolver, token: &str) -> Option<String> {
    resolver.resolve_color_token(Some(token)).unwrap()
}

#[test]
fn literal_hex_is_returned_unchanged() {
    let resolver = TokenResolver::new(site_dataset());
    for hex in ["#3B82F6", "#fff", "#not-a-color"] {
        assert_eq!(resolve(&resolver, hex).as_deref(), Some(hex));
    }
    assert_eq!(resolver.resolve_color_token(None).unwrap(), None);
}

#[test]
fn direct_palette_reference() {
    let resolver = TokenResolver::new(site_dataset());
    assert_eq!(resolve(&resolver, "color_blue_500").as_deref(), Some("#3B82F6"));
    assert_eq!(resolve(&resolver, "color/Blue/500").as_deref(), Some("#3B82F6"));
    assert_eq!(resolve(&resolver, "Blue/500").as_deref(), Some("#3B82F6"));
    assert_eq!(resolve(&resolver, "color_blue_600").as_deref(), Some("#2563EB"));
}

#[test]
fn family_with_spaces_and_descriptive_level() {
    let resolver = TokenResolver::new(site_dataset());
    assert_eq!(
        resolve(&resolver, "color_grayalpha_alpha (10%)").as_deref(),
        Some("#00000019")
    );
}

#[test]
fn theme_mapped_tokens() {
    let resolver = TokenResolver::new(site_dataset());
    assert_eq!(resolve(&resolver, "color_brand_60").as_deref(), Some("#3B82F6"));
    assert_eq!(resolve(&resolver, "color/brand/60").as_deref(), Some("#3B82F6"));
    assert_eq!(resolve(&resolver, "brand/60").as_deref(), Some("#3B82F6"));
    // two hops: light surface -> neutral white -> Gray/white
    assert_eq!(
        resolve(&resolver, "color_light_surface").as_deref(),
        Some("#FFFFFF")
    );
}

#[test]
fn dark_override_is_kept_in_color_data() {
    let resolver = TokenResolver::new(site_dataset());
    let color = resolver
        .resolve_color_data(Some("color_accent"))
        .unwrap()
        .unwrap();
    assert_eq!(color.hex, "#2563EB");
    assert_eq!(color.hex_dark.as_deref(), Some("#60A5FA"));
    assert_eq!(color.dark_or_light(), "#60A5FA");

    assert_eq!(resolve(&resolver, "color_accent").as_deref(), Some("#2563EB"));
}

#[test]
fn shade_found_by_variable_name() {
    let palette = json!({
        "Red": [
            { "level": "500", "hex": "#EF4444", "rgb": "rgb(239,68,68)", "variable": "Red/500" },
            { "level": "alpha (10%)", "hex": "#EF44441A", "rgb": "rgb(239,68,68)", "variable": "Red/alpha" }
        ]
    });
    let theme = json!({ "error": { "color_error_bg": "Red/alpha" } });
    let dataset =
        ColorDataset::from_json(&palette.to_string(), &theme.to_string(), "{}").unwrap();
    let resolver = TokenResolver::new(dataset);

    assert_eq!(resolve(&resolver, "Red/alpha").as_deref(), Some("#EF44441A"));
    assert_eq!(resolve(&resolver, "color_error_bg").as_deref(), Some("#EF44441A"));
    assert_eq!(resolve(&resolver, "color_red_alpha (10%)").as_deref(), Some("#EF44441A"));
}

#[test]
fn unresolvable_tokens_are_none() {
    let resolver = TokenResolver::new(site_dataset());
    for token in ["", "primary", "color_purple_500", "color_blue_950", "avatar/red/20"] {
        assert_eq!(resolve(&resolver, token), None, "token={token:?}");
    }
}

#[test]
fn second_resolution_is_a_cache_hit() {
    let resolver = TokenResolver::new(site_dataset());

    let first = resolve(&resolver, "color_light_surface");
    let after_first = resolver.cache_stats();
    assert!(after_first.misses > 0);

    let second = resolve(&resolver, "color_light_surface");
    let after_second = resolver.cache_stats();

    assert_eq!(first, second);
    assert_eq!(after_second.misses, after_first.misses);
    assert_eq!(after_second.hits, after_first.hits + 1);
    assert_eq!(after_second.entries, after_first.entries);
}

#[test]
fn unresolvable_results_are_cached_too() {
    let resolver = TokenResolver::new(site_dataset());
    assert_eq!(resolve(&resolver, "color_purple_500"), None);
    let misses = resolver.cache_stats().misses;

    assert_eq!(resolve(&resolver, "color_purple_500"), None);
    assert_eq!(resolver.cache_stats().misses, misses);
    assert!(resolver.cache().contains("color_purple_500"));
}

#[test]
fn resolvers_do_not_share_caches() {
    let a = TokenResolver::new(site_dataset());
    let b = TokenResolver::new(site_dataset());

    resolve(&a, "color_brand_60");
    assert!(a.cache().contains("color_brand_60"));
    assert!(b.cache().is_empty());
}

#[test]
fn semantic_token_resolves_both_modes() {
    let resolver = TokenResolver::new(site_dataset());
    assert_eq!(
        resolver.resolve_semantic_token("text.primary").unwrap(),
        SemanticColors {
            light: "#3B82F6".to_string(),
            dark: GRAY_900.to_string(),
        }
    );
}

#[test]
fn semantic_token_in_entry_array_category() {
    let resolver = TokenResolver::new(site_dataset());
    let colors = resolver.resolve_semantic_token("surface.base").unwrap();
    assert_eq!(colors.light, "#FFFFFF");
    // no color_dark_surface in the theme mapping
    assert_eq!(colors.dark, "#000000");
}

#[test]
fn missing_mode_uses_fallback_for_that_mode_only() {
    let resolver = TokenResolver::new(site_dataset());
    let colors = resolver.resolve_semantic_token("text.only-light").unwrap();
    assert_eq!(colors.light, "#3B82F6");
    assert_eq!(colors.dark, "#000000");
}

#[test]
fn unknown_semantic_token_falls_back_to_white_and_black() {
    let resolver = TokenResolver::new(site_dataset());
    assert_eq!(
        resolver.resolve_semantic_token("nonexistent").unwrap(),
        SemanticColors {
            light: "#FFFFFF".to_string(),
            dark: "#000000".to_string(),
        }
    );
}

#[test]
fn semantic_table_lists_every_token() {
    let resolver = TokenResolver::new(site_dataset());
    let rows = resolver.semantic_colors().unwrap();

    // neither category is prioritized, so they sort by name; json! objects
    // serialize their keys sorted as well
    assert_eq!(resolver.semantic_categories(), ["surface", "text"]);
    let tokens: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.category.as_str(), r.dev_token.as_str()))
        .collect();
    assert_eq!(
        tokens,
        vec![
            ("surface", "surface.base"),
            ("text", "text.only-light"),
            ("text", "text.primary"),
        ]
    );
    assert_eq!(rows[0].design_token.as_deref(), Some("Surface/Base"));
    assert_eq!(rows[2].base, "color_primary");
    assert_eq!(rows[2].colors.dark, GRAY_900);
}

fn cyclic_dataset() -> ColorDataset {
    let theme = json!({
        "brand": {
            "color_a": "color_b",
            "color_b": "color_a",
            "color_light_loop": "color_a",
            "color_dark_loop": "color_blue_500"
        }
    });
    let semantic = json!({ "loop": { "loop.bg": "color_loop" } });
    ColorDataset::from_json(
        &json!({ "Blue": [{ "level": "500", "hex": "#3B82F6" }] }).to_string(),
        &theme.to_string(),
        &semantic.to_string(),
    )
    .unwrap()
}

#[test]
fn cyclic_theme_mapping_is_an_error() {
    let resolver = TokenResolver::new(cyclic_dataset());

    let err = resolver.resolve_color_token(Some("color_a")).unwrap_err();
    assert_eq!(
        err,
        ResolveError::CyclicReference {
            chain: vec![
                "color_a".to_string(),
                "color_b".to_string(),
                "color_a".to_string(),
            ],
        }
    );

    // reported again rather than cached as unresolvable
    assert!(resolver.resolve_color_token(Some("color_a")).is_err());
    assert!(!resolver.cache().contains("color_a"));

    // unrelated tokens still resolve
    assert_eq!(
        resolve(&resolver, "color_dark_loop").as_deref(),
        Some("#3B82F6")
    );
}

#[test]
fn cycle_surfaces_through_semantic_resolution() {
    let resolver = TokenResolver::new(cyclic_dataset());
    let err = resolver.resolve_semantic_token("loop.bg").unwrap_err();
    assert!(matches!(err, ResolveError::CyclicReference { .. }));
}

#[test]
fn check_reports_cycles_once() {
    let resolver = TokenResolver::new(cyclic_dataset());
    let report = resolver.check();

    assert_eq!(report.cycles.len(), 1);
    assert!(!report.is_ok());
}

#[test]
fn check_reports_dangling_references() {
    let theme = json!({
        "brand": {
            "color_ok": "color_blue_500",
            "color_gone": "color_purple_500"
        }
    });
    let semantic = json!({ "text": { "text.gone": "color_nothing" } });
    let dataset = ColorDataset::from_json(
        &json!({ "Blue": [{ "level": "500", "hex": "#3B82F6" }] }).to_string(),
        &theme.to_string(),
        &semantic.to_string(),
    )
    .unwrap();

    let report = TokenResolver::new(dataset).check();
    assert!(report.is_ok());
    assert!(!report.is_clean());
    assert_eq!(
        report.dangling,
        vec![(
            "brand".to_string(),
            "color_gone".to_string(),
            "color_purple_500".to_string()
        )]
    );
    assert_eq!(report.unresolved_semantic, vec!["text.gone".to_string()]);
}

#[test]
fn load_dir_reads_the_three_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(hue_tokens::PALETTE_FILE),
        json!({ "Blue": [{ "level": "500", "hex": "#3B82F6" }] }).to_string(),
    )
    .unwrap();
    std::fs::write(
        dir.path().join(hue_tokens::THEME_MAPPING_FILE),
        json!({ "brand": { "color_brand_60": "color_blue_500" } }).to_string(),
    )
    .unwrap();
    std::fs::write(dir.path().join(hue_tokens::SEMANTIC_MAPPING_FILE), "{}").unwrap();

    let resolver = TokenResolver::new(ColorDataset::load_dir(dir.path()).unwrap());
    assert_eq!(resolve(&resolver, "color_brand_60").as_deref(), Some("#3B82F6"));
}

#[test]
fn load_dir_reports_missing_files() {
    let dir = tempfile::tempdir().unwrap();
    let err = ColorDataset::load_dir(dir.path()).unwrap_err();
    assert!(matches!(err, hue_tokens::DatasetError::Io { .. }));
}
