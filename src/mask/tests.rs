use std::collections::HashMap;

use serde_json::json;

use super::core::ParamOverride;
use super::Mask;
use crate::RouteError;

fn overrides(entries: &[(&str, Option<&str>, Option<serde_json::Value>)]) -> HashMap<String, ParamOverride> {
    entries
        .iter()
        .map(|(name, pattern, default)| {
            (
                (*name).to_string(),
                ParamOverride {
                    pattern: pattern.map(str::to_string),
                    default: default.clone(),
                },
            )
        })
        .collect()
}

#[test]
fn plain_placeholder() {
    let mask = Mask::compile("<presenter>").unwrap();
    assert!(!mask.is_absolute());
    assert_eq!(mask.placeholders().len(), 1);
    assert_eq!(mask.placeholders()[0].pattern, "[^/]+");

    let raw = mask.match_relative_path("homepage").unwrap();
    assert_eq!(raw[0].as_deref(), Some("homepage"));
    assert!(mask.match_relative_path("homepage/extra").is_none());
    assert!(mask.match_relative_path("").is_none());
}

#[test]
fn literal_segments_must_be_present() {
    let mask = Mask::compile("shop/<id>").unwrap();
    assert!(mask.match_relative_path("shop/7").is_some());
    assert!(mask.match_relative_path("7").is_none());
    assert!(mask.match_relative_path("cart/7").is_none());
}

#[test]
fn placeholder_token_heuristic() {
    // a token with regex metacharacters is the pattern
    let mask = Mask::compile("<id \\d+>").unwrap();
    assert_eq!(mask.placeholders()[0].pattern, "\\d+");
    assert_eq!(mask.placeholders()[0].default, None);

    // a plain token is the default
    let mask = Mask::compile("<action list>").unwrap();
    assert_eq!(mask.placeholders()[0].pattern, "[^/]+");
    assert_eq!(mask.placeholders()[0].default, Some(json!("list")));

    // both, in grammar order
    let mask = Mask::compile("<id \\d+ 5>").unwrap();
    assert_eq!(mask.placeholders()[0].pattern, "\\d+");
    assert_eq!(mask.placeholders()[0].default, Some(json!("5")));
}

#[test]
fn duplicate_placeholder_is_rejected() {
    match Mask::compile("<a>/<a>") {
        Err(RouteError::DuplicateParameter { name, .. }) => assert_eq!(name, "a"),
        other => panic!("expected DuplicateParameter, got {:?}", other),
    }
}

#[test]
fn unbalanced_brackets_are_rejected() {
    assert!(matches!(
        Mask::compile("<p>[/x"),
        Err(RouteError::MaskSyntax { .. })
    ));
    assert!(matches!(
        Mask::compile("a]b"),
        Err(RouteError::MaskSyntax { .. })
    ));
    assert!(matches!(
        Mask::compile("<p"),
        Err(RouteError::MaskSyntax { .. })
    ));
}

#[test]
fn invalid_pattern_fragment_is_rejected() {
    assert!(matches!(
        Mask::compile("<id [>"),
        Err(RouteError::MaskSyntax { .. })
    ));
}

#[test]
fn optional_tail_group() {
    let mask = Mask::compile("<presenter>[/<id>]").unwrap();

    let raw = mask.match_relative_path("article").unwrap();
    assert_eq!(raw[0].as_deref(), Some("article"));
    assert_eq!(raw[1], None);

    let raw = mask.match_relative_path("article/7").unwrap();
    assert_eq!(raw[1].as_deref(), Some("7"));
}

#[test]
fn trailing_slash_is_significant_but_tolerated_on_match() {
    let mask = Mask::compile("feed/").unwrap();
    assert!(mask.has_trailing_slash());
    assert!(mask.match_relative_path("feed").is_some());
    assert!(mask.match_relative_path("feed/").is_some());

    let bare = Mask::compile("feed").unwrap();
    assert!(!bare.has_trailing_slash());
}

#[test]
fn defaulted_tail_segments_become_optional() {
    let with_defaults = overrides(&[
        ("presenter", None, Some(json!("home"))),
        ("action", None, Some(json!("default"))),
    ]);
    let mask = Mask::compile_with("<presenter>/<action>", &with_defaults).unwrap();

    assert!(mask.match_relative_path("").is_some());
    let raw = mask.match_relative_path("shop").unwrap();
    assert_eq!(raw[0].as_deref(), Some("shop"));
    assert_eq!(raw[1], None);
    let raw = mask.match_relative_path("shop/list").unwrap();
    assert_eq!(raw[1].as_deref(), Some("list"));
}

#[test]
fn literal_segment_stops_the_implicit_optional_scan() {
    let with_default = overrides(&[("id", None, Some(json!("0")))]);
    let mask = Mask::compile_with("archive/<id>", &with_default).unwrap();

    // the literal must stay; only the defaulted tail may drop
    assert!(mask.match_relative_path("archive").is_some());
    assert!(mask.match_relative_path("archive/9").is_some());
    assert!(mask.match_relative_path("").is_none());
}

#[test]
fn pattern_override_reshapes_the_regex() {
    let with_pattern = overrides(&[("id", Some("\\d+"), None)]);
    let mask = Mask::compile_with("<id>", &with_pattern).unwrap();
    assert!(mask.match_relative_path("42").is_some());
    assert!(mask.match_relative_path("abc").is_none());
}

#[test]
fn wildcard_tail_spans_segments() {
    let mask = Mask::compile("files/<path .+>").unwrap();
    let raw = mask.match_relative_path("files/docs/2024/report.pdf").unwrap();
    assert_eq!(raw[0].as_deref(), Some("docs/2024/report.pdf"));
    assert!(mask.match_relative_path("files").is_none());
}

#[test]
fn absolute_mask_matches_host() {
    let mask = Mask::compile("//<subdomain>.example.com/<presenter>").unwrap();
    assert!(mask.is_absolute());

    let raw = mask.match_host("api.example.com").unwrap();
    let sub = mask.placeholder_index("subdomain").unwrap();
    assert_eq!(raw[sub].as_deref(), Some("api"));
    assert!(mask.match_host("example.com").is_none());
    assert!(mask.match_host("api.other.org").is_none());
}

#[test]
fn host_variables_expand_against_the_request_host() {
    let mask = Mask::compile("//admin.%domain%/<presenter>").unwrap();
    assert!(mask.match_host("admin.example.com").is_some());
    assert!(mask.match_host("www.example.com").is_none());
}
