use pmnav_core::{LoadOutcome, LoadPhase, NavError};
use pmnav_model::{HistoryState, NavParams, ViewId};
use pmnav_routing::RouteTable;
use pmnav_test_utils::{default_fragment, harness, SurfaceEvent};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[tokio::test]
async fn test_start_resolves_mapped_path() {
    let h = harness();

    let outcome = h.navigator.start("/projects").await.unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded(ViewId::Projects));
    assert_eq!(h.navigator.current_view(), Some(ViewId::Projects));
    assert_eq!(h.navigator.current_params(), Some(NavParams::new()));
    // Initial route replaces, never pushes
    assert!(h.surface.history().is_empty());
}

#[tokio::test]
async fn test_start_falls_back_to_dashboard() {
    let h = harness();

    let outcome = h.navigator.start("/foobar").await.unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded(ViewId::Dashboard));
    assert_eq!(h.fetcher.call_count("/dashboard"), 1);
}

#[tokio::test]
async fn test_navigate_pushes_history_title_and_breadcrumbs() {
    let h = harness();
    let params = NavParams::new().with("status", "Active");

    h.navigator
        .navigate_to(ViewId::Projects, params.clone(), true)
        .await
        .unwrap();

    let history = h.surface.history();
    assert_eq!(history.len(), 1);
    let (state, url) = &history[0];
    assert_eq!(state, &HistoryState::new(ViewId::Projects, params.clone()));
    assert_eq!(url, "/projects?status=%22Active%22");

    // The URL round-trips through deep linking
    let resolved = RouteTable::default().resolve_location(url).unwrap();
    assert_eq!(resolved.view, ViewId::Projects);
    assert_eq!(resolved.params, params);

    assert_eq!(h.surface.titles(), vec!["Projects - PM Dashboard".to_string()]);
    assert!(h
        .surface
        .events()
        .contains(&SurfaceEvent::Breadcrumbs(vec![ViewId::Projects])));
}

#[tokio::test]
async fn test_project_detail_fills_path_template() {
    let h = harness();
    let params = NavParams::new().with("id", 42_i64);

    h.navigator
        .navigate_to(ViewId::ProjectDetail, params, true)
        .await
        .unwrap();

    assert_eq!(h.surface.history()[0].1, "/projects/42");
    assert_eq!(h.fetcher.call_count("/projects/42"), 1);
    assert_eq!(h.surface.titles(), vec!["Project #42 - PM Dashboard".to_string()]);
}

#[tokio::test]
async fn test_missing_path_param_is_an_error() {
    let h = harness();

    let err = h
        .navigator
        .navigate_to(ViewId::ProjectDetail, NavParams::new(), true)
        .await
        .unwrap_err();

    assert!(matches!(err, NavError::Route(_)));
    assert!(h.fetcher.calls().is_empty());
    assert!(h.navigator.breadcrumbs().is_empty());
}

#[tokio::test]
async fn test_history_pop_replays_without_pushing() {
    let h = harness();
    let state = HistoryState::new(ViewId::Risks, NavParams::new().with("severity", "high"));

    let outcome = h.navigator.on_history_pop(Some(state)).await.unwrap();

    assert_eq!(outcome, Some(LoadOutcome::Loaded(ViewId::Risks)));
    assert_eq!(h.navigator.current_view(), Some(ViewId::Risks));
    assert!(h.surface.history().is_empty());
    assert_eq!(h.navigator.breadcrumbs().len(), 1);
}

#[tokio::test]
async fn test_history_pop_without_state_is_ignored() {
    let h = harness();

    assert_eq!(h.navigator.on_history_pop(None).await.unwrap(), None);
    assert!(h.fetcher.calls().is_empty());
    assert_eq!(h.navigator.current_view(), None);
}

#[tokio::test]
async fn test_navigate_to_breadcrumb() {
    let h = harness();
    h.navigator
        .navigate_to(ViewId::Dashboard, NavParams::new(), true)
        .await
        .unwrap();
    h.navigator
        .navigate_to(ViewId::Risks, NavParams::new(), true)
        .await
        .unwrap();

    let outcome = h.navigator.navigate_to_breadcrumb(0).await.unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded(ViewId::Dashboard));
    assert_eq!(h.navigator.breadcrumbs().len(), 3);

    let err = h.navigator.navigate_to_breadcrumb(99).await.unwrap_err();
    assert!(matches!(err, NavError::UnknownBreadcrumb(99)));
}

#[tokio::test]
async fn test_placeholders_filled_from_params_and_user() {
    let h = harness();
    h.fetcher
        .push_ok("/projects/42", "<h1>{{id}} for {{current_user}} on {{current_view}}</h1>");
    h.navigator.set_current_user(Some("Ana".to_string()));

    h.navigator
        .navigate_to(ViewId::ProjectDetail, NavParams::new().with("id", 42_i64), true)
        .await
        .unwrap();

    assert_eq!(
        h.renderer.last().as_deref(),
        Some("<h1>42 for Ana on project-detail</h1>")
    );
    assert_eq!(h.navigator.phase(), LoadPhase::Idle);
}

#[tokio::test]
async fn test_loading_placeholder_precedes_fragment() {
    let h = harness();

    h.navigator
        .navigate_to(ViewId::Gantt, NavParams::new(), true)
        .await
        .unwrap();

    let renders = h.renderer.renders();
    assert_eq!(renders.len(), 2);
    assert!(renders[0].contains("Loading Work Plan"));
    assert_eq!(renders[1], default_fragment("/gantt"));
}

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

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_breadcrumbs_keep_last_ten_in_order(
        views in proptest::collection::vec(parameterless_view(), 1..30)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let h = harness();

        runtime.block_on(async {
            for view in &views {
                h.navigator
                    .navigate_to(view.clone(), NavParams::new(), true)
                    .await
                    .unwrap();
            }
        });

        let trail: Vec<ViewId> = h.navigator.breadcrumbs().into_iter().map(|e| e.view).collect();
        let expected: Vec<ViewId> = views.iter().rev().take(10).rev().cloned().collect();
        prop_assert!(trail.len() <= 10);
        prop_assert_eq!(trail, expected);
    }
}

#[tokio::test]
async fn test_custom_route_table() {
    use pmnav_routing::RouteSpec;

    let mut h = harness();
    let mut routes = RouteTable::default();
    routes.register(RouteSpec::new(ViewId::Risks, "/risk-register").with_fragment("/fragments/risks"));
    routes.alias("/home", ViewId::Dashboard);
    h.navigator = h.navigator.with_routes(routes);

    let outcome = h.navigator.start("/risk-register").await.unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded(ViewId::Risks));
    assert_eq!(h.fetcher.call_count("/fragments/risks"), 1);

    let home = h.navigator.start("/home").await.unwrap();
    assert_eq!(home, LoadOutcome::Loaded(ViewId::Dashboard));
}
