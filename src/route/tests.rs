use serde_json::{json, Value};

use super::{ParamMeta, Route};
use crate::filter::map_filter;
use crate::urls::{RefUrl, RequestUrl};
use crate::RouteError;

fn request(path: &str) -> RequestUrl {
    RequestUrl::new("http", "localhost", path)
}

fn reference() -> RefUrl {
    RefUrl::new("http", "localhost", "/")
}

#[test]
fn defaults_fill_absent_placeholders() {
    let route = Route::new(
        "<presenter>/<action>",
        vec![
            ("presenter".to_string(), ParamMeta::value(json!("home"))),
            ("action".to_string(), ParamMeta::value(json!("default"))),
        ],
    )
    .unwrap();

    let params = route.match_url(&request("/")).unwrap();
    assert_eq!(params.get("presenter"), Some(&json!("home")));
    assert_eq!(params.get("action"), Some(&json!("default")));

    let params = route.match_url(&request("/shop")).unwrap();
    assert_eq!(params.get("presenter"), Some(&json!("shop")));
    assert_eq!(params.get("action"), Some(&json!("default")));
}

#[test]
fn defaults_are_elided_on_construction() {
    let route = Route::new(
        "<presenter>/<action>",
        vec![
            ("presenter".to_string(), ParamMeta::value(json!("home"))),
            ("action".to_string(), ParamMeta::value(json!("default"))),
        ],
    )
    .unwrap();

    let all_default: crate::Params = vec![
        ("presenter".to_string(), json!("home")),
        ("action".to_string(), json!("default")),
    ]
    .into_iter()
    .collect();
    assert_eq!(
        route.construct_url(&all_default, &reference()).as_deref(),
        Some("http://localhost/")
    );

    let shop: crate::Params = vec![("presenter".to_string(), json!("shop"))]
        .into_iter()
        .collect();
    assert_eq!(
        route.construct_url(&shop, &reference()).as_deref(),
        Some("http://localhost/shop")
    );

    // a non-default deeper in the tail forces the defaulted segment out
    let deep: crate::Params = vec![("action".to_string(), json!("list"))]
        .into_iter()
        .collect();
    assert_eq!(
        route.construct_url(&deep, &reference()).as_deref(),
        Some("http://localhost/home/list")
    );
}

#[test]
fn required_placeholder_without_value_fails_construction() {
    let route = Route::new("<presenter>", Vec::new()).unwrap();
    assert_eq!(route.construct_url(&crate::Params::new(), &reference()), None);
}

#[test]
fn supplied_value_must_round_trip_through_its_pattern() {
    let route = Route::new(
        "<id>",
        vec![("id".to_string(), ParamMeta::pattern("\\d{1,3}"))],
    )
    .unwrap();

    let ok: crate::Params = vec![("id".to_string(), json!("42"))].into_iter().collect();
    assert!(route.construct_url(&ok, &reference()).is_some());

    let bad: crate::Params = vec![("id".to_string(), json!("abcd"))]
        .into_iter()
        .collect();
    assert_eq!(route.construct_url(&bad, &reference()), None);
}

#[test]
fn constants_appear_on_match_and_gate_construction() {
    let route = Route::new(
        "catalog",
        vec![("presenter".to_string(), ParamMeta::value(json!("products")))],
    )
    .unwrap();

    let params = route.match_url(&request("/catalog")).unwrap();
    assert_eq!(params.get("presenter"), Some(&json!("products")));

    assert_eq!(
        route.construct_url(&params, &reference()).as_deref(),
        Some("http://localhost/catalog")
    );

    let contradicting: crate::Params = vec![("presenter".to_string(), json!("other"))]
        .into_iter()
        .collect();
    assert_eq!(route.construct_url(&contradicting, &reference()), None);
}

#[test]
fn fixed_value_conflicting_with_mask_default_is_rejected() {
    let result = Route::new(
        "<presenter home>",
        vec![("presenter".to_string(), ParamMeta::constant(json!("away")))],
    );
    assert!(matches!(
        result,
        Err(RouteError::DuplicateParameter { .. })
    ));
}

#[test]
fn residual_query_parameters_pass_through() {
    let route = Route::new("<presenter>", Vec::new()).unwrap();
    let req = request("/shop")
        .with_query_param("page", "2")
        .with_query_param("presenter", "ignored");

    let params = route.match_url(&req).unwrap();
    assert_eq!(params.get("page"), Some(&json!("2")));
    // the path value wins over a query parameter of the same name
    assert_eq!(params.get("presenter"), Some(&json!("shop")));
}

#[test]
fn leftover_parameters_become_the_query_string() {
    let route = Route::new("<presenter>", Vec::new()).unwrap();
    let params: crate::Params = vec![
        ("presenter".to_string(), json!("shop")),
        ("page".to_string(), json!(2)),
        ("missing".to_string(), Value::Null),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        route.construct_url(&params, &reference()).as_deref(),
        Some("http://localhost/shop?page=2")
    );
}

#[test]
fn non_scalar_path_parameter_fails_construction() {
    let route = Route::new("<presenter>", Vec::new()).unwrap();
    let params: crate::Params = vec![("presenter".to_string(), json!(["a", "b"]))]
        .into_iter()
        .collect();
    assert_eq!(route.construct_url(&params, &reference()), None);
}

#[test]
fn global_filters_transform_the_whole_mapping() {
    let route = Route::new("<presenter>", Vec::new())
        .unwrap()
        .with_global_filter_in(map_filter(|mut params| {
            params.insert("seen", json!(true));
            Some(params)
        }))
        .with_global_filter_out(map_filter(|mut params| {
            params.remove("seen");
            Some(params)
        }));

    let params = route.match_url(&request("/shop")).unwrap();
    assert_eq!(params.get("seen"), Some(&json!(true)));

    // the outbound filter strips the synthetic parameter again
    assert_eq!(
        route.construct_url(&params, &reference()).as_deref(),
        Some("http://localhost/shop")
    );
}

#[test]
fn global_filter_rejection_fails_the_route() {
    let route = Route::new("<presenter>", Vec::new())
        .unwrap()
        .with_global_filter_in(map_filter(|_params| None));
    assert_eq!(route.match_url(&request("/shop")), None);
}

#[test]
fn trailing_slash_mask_constructs_canonical_urls() {
    let route = Route::new("feed/", vec![("presenter".to_string(), ParamMeta::value(json!("feed")))])
        .unwrap();

    let params = route.match_url(&request("/feed")).unwrap();
    assert_eq!(
        route.construct_url(&params, &reference()).as_deref(),
        Some("http://localhost/feed/")
    );
}

#[test]
fn absolute_route_constructs_its_host() {
    let route = Route::new("//<subdomain>.example.com/<presenter>", Vec::new()).unwrap();

    let req = RequestUrl::new("http", "api.example.com", "/stats");
    let params = route.match_url(&req).unwrap();
    assert_eq!(params.get("subdomain"), Some(&json!("api")));
    assert_eq!(params.get("presenter"), Some(&json!("stats")));

    let other_host = RequestUrl::new("http", "other.org", "/stats");
    assert_eq!(route.match_url(&other_host), None);

    let url = route.construct_url(&params, &RefUrl::new("http", "example.com", "/"));
    assert_eq!(url.as_deref(), Some("http://api.example.com/stats"));
}
