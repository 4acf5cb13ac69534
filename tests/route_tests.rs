use maskroute::{ParamMeta, Params, RefUrl, RequestUrl, Route};
use serde_json::{json, Value};

fn request(path: &str) -> RequestUrl {
    RequestUrl::new("http", "localhost", path)
}

fn reference() -> RefUrl {
    RefUrl::new("http", "localhost", "/")
}

fn params(pairs: &[(&str, Value)]) -> Params {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

#[test]
fn plain_presenter() {
    let route = Route::new("<presenter>", Vec::new()).unwrap();

    let matched = route.match_url(&request("/homepage")).unwrap();
    assert_eq!(matched.get("presenter"), Some(&json!("homepage")));

    let url = route.construct_url(&params(&[("presenter", json!("homepage"))]), &reference());
    assert_eq!(url.as_deref(), Some("http://localhost/homepage"));
}

#[test]
fn reversing_filters_apply_in_both_directions() {
    let reverse = |s: &str| s.chars().rev().collect::<String>();
    let route = Route::new(
        "<presenter>",
        vec![(
            "presenter".to_string(),
            ParamMeta::default()
                .with_filter_in(move |raw| Some(Value::String(raw.chars().rev().collect())))
                .with_filter_out(move |value| match value {
                    Value::String(s) => Some(s.chars().rev().collect()),
                    _ => None,
                }),
        )],
    )
    .unwrap();

    let matched = route.match_url(&request("/abc")).unwrap();
    assert_eq!(matched.get("presenter"), Some(&json!(reverse("abc"))));

    let url = route.construct_url(
        &params(&[("presenter", json!("cba")), ("test", json!("x"))]),
        &reference(),
    );
    assert_eq!(url.as_deref(), Some("http://localhost/abc?test=x"));

    // filter symmetry: re-matching the constructed URL reproduces the value
    let rematched = route
        .match_url(&RequestUrl::parse(url.as_deref().unwrap()).unwrap())
        .unwrap();
    assert_eq!(rematched.get("presenter"), Some(&json!("cba")));
    assert_eq!(rematched.get("test"), Some(&json!("x")));
}

#[test]
fn regex_constrained_placeholder() {
    let route = Route::new("<presenter>/<action>/<id \\d{1,3}>", Vec::new()).unwrap();

    let matched = route.match_url(&request("/product/detail/42")).unwrap();
    assert_eq!(matched.get("presenter"), Some(&json!("product")));
    assert_eq!(matched.get("action"), Some(&json!("detail")));
    assert_eq!(matched.get("id"), Some(&json!("42")));

    assert_eq!(route.match_url(&request("/product/detail/abcd")), None);
    assert_eq!(route.match_url(&request("/product/detail/9999")), None);
}

#[test]
fn optional_tail() {
    let route = Route::new("<presenter>[/<id>]", Vec::new()).unwrap();

    let matched = route.match_url(&request("/article")).unwrap();
    assert_eq!(matched.get("presenter"), Some(&json!("article")));
    assert_eq!(matched.get("id"), Some(&Value::Null));

    let matched = route.match_url(&request("/article/7")).unwrap();
    assert_eq!(matched.get("id"), Some(&json!("7")));

    let url = route.construct_url(&params(&[("presenter", json!("article"))]), &reference());
    assert_eq!(url.as_deref(), Some("http://localhost/article"));

    let url = route.construct_url(
        &params(&[("presenter", json!("article")), ("id", json!("7"))]),
        &reference(),
    );
    assert_eq!(url.as_deref(), Some("http://localhost/article/7"));
}

#[test]
fn matched_parameters_round_trip_to_the_canonical_url() {
    let route = Route::new(
        "<presenter>/<action>[/<id \\d+>]",
        vec![("action".to_string(), ParamMeta::value(json!("default")))],
    )
    .unwrap();

    for path in ["/blog/default/7", "/blog/list", "/blog/default"] {
        let req = request(path);
        let matched = route.match_url(&req).expect("path matches the mask");
        let rebuilt = route
            .construct_url(&matched, &RefUrl::from_request(&req))
            .expect("matched parameters construct a URL");

        // canonical form elides the defaulted action when nothing after
        // it is present
        let canonical = match path {
            "/blog/default" => "http://localhost/blog".to_string(),
            other => format!("http://localhost{}", other),
        };
        assert_eq!(rebuilt, canonical, "canonical form of {}", path);
    }
}

#[test]
fn construction_is_idempotent_across_a_rematch() {
    let route = Route::new(
        "<presenter>/<action>[/<id \\d+>]",
        vec![("action".to_string(), ParamMeta::value(json!("default")))],
    )
    .unwrap();

    let first = route
        .construct_url(
            &params(&[
                ("presenter", json!("blog")),
                ("id", json!("7")),
                ("page", json!("2")),
            ]),
            &reference(),
        )
        .unwrap();

    let reparsed = RequestUrl::parse(&first).unwrap();
    let matched = route.match_url(&reparsed).unwrap();
    let second = route
        .construct_url(&matched, &RefUrl::from_request(&reparsed))
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn query_parameters_survive_a_match_construct_cycle() {
    let route = Route::new("<presenter>", Vec::new()).unwrap();
    let req = request("/shop").with_query_param("page", "3");

    let matched = route.match_url(&req).unwrap();
    assert_eq!(matched.get("page"), Some(&json!("3")));

    let url = route
        .construct_url(&matched, &RefUrl::from_request(&req))
        .unwrap();
    assert_eq!(url, "http://localhost/shop?page=3");
}
