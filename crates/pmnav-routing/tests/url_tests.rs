use pmnav_model::{NavParams, ParamValue, ViewId};
use pmnav_routing::RouteTable;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn parameterless_view() -> impl Strategy<Value = ViewId> {
    prop_oneof![
        Just(ViewId::Dashboard),
        Just(ViewId::Projects),
        Just(ViewId::Resources),
        Just(ViewId::Risks),
        Just(ViewId::Gantt),
        Just(ViewId::Reports),
        Just(ViewId::Settings),
        Just(ViewId::Backlog),
        Just(ViewId::AiChat),
    ]
}

fn param_value() -> impl Strategy<Value = ParamValue> {
    prop_oneof![
        any::<i64>().prop_map(|n| ParamValue::Number(n.into())),
        "\\PC{0,16}".prop_map(ParamValue::Text),
        // Text that looks like a number or JSON must stay text
        "-?[0-9]{1,6}".prop_map(ParamValue::Text),
        Just(ParamValue::Text("true".to_string())),
        Just(ParamValue::Text("a=b&c=d".to_string())),
    ]
}

fn nav_params() -> impl Strategy<Value = NavParams> {
    proptest::collection::btree_map("[a-z][a-z0-9_]{0,8}", param_value(), 0..6)
        .prop_map(|pairs| pairs.into_iter().collect())
}

proptest! {
    #[test]
    fn prop_build_url_round_trips_through_resolve(
        view in parameterless_view(),
        params in nav_params(),
    ) {
        let table = RouteTable::default();
        let url = table.build_url(&view, &params).unwrap();

        let resolved = table.resolve_location(&url).unwrap();
        prop_assert!(resolved.matched);
        prop_assert_eq!(resolved.view, view);
        prop_assert_eq!(resolved.params, params);
    }

    #[test]
    fn prop_absolute_url_resolves_like_path(
        view in parameterless_view(),
        params in nav_params(),
    ) {
        let table = RouteTable::default();
        let url = table.build_url(&view, &params).unwrap();

        let from_path = table.resolve_location(&url).unwrap();
        let from_absolute = table
            .resolve_location(&format!("https://pm.example.com{url}"))
            .unwrap();
        prop_assert_eq!(from_path, from_absolute);
    }
}

#[test]
fn test_status_filter_round_trips() {
    let table = RouteTable::default();
    let params = NavParams::new().with("status", "Active").with("page", 2_i64);

    let url = table.build_url(&ViewId::Projects, &params).unwrap();
    assert_eq!(url, "/projects?status=%22Active%22&page=2");
    assert_eq!(table.resolve_location(&url).unwrap().params, params);
}
