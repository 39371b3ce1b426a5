use pmnav_core::{
    FetchError, InitError, InitializerRegistry, LoadOutcome, LoadPhase, NavError, NavigatorConfig,
    RecoveryAction,
};
use pmnav_model::{NavParams, ViewId};
use pmnav_test_utils::{default_fragment, harness, harness_with};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::time::Instant;

#[tokio::test(start_paused = true)]
async fn test_three_server_errors_exhaust_retries() {
    let h = harness();
    h.fetcher
        .push_errs("/risks", &FetchError::Status { status: 503 }, 3);

    let outcome = h
        .navigator
        .navigate_to(ViewId::Risks, NavParams::new(), true)
        .await
        .unwrap();

    let times = h.fetcher.call_times("/risks");
    assert_eq!(times.len(), 3);
    assert_eq!(times[1] - times[0], Duration::from_millis(1000));
    assert_eq!(times[2] - times[1], Duration::from_millis(2000));

    let LoadOutcome::Failed(error) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(error.retry_count, 3);
    assert_eq!(error.view, ViewId::Risks);
    assert_eq!(h.navigator.phase(), LoadPhase::ErrorDisplayed);
    assert_eq!(h.navigator.error_state(), Some(error));

    let panel = h.renderer.last().unwrap();
    assert!(panel.contains("Retry (3/3)"));
    assert!(panel.contains("Go to Dashboard"));
}

#[tokio::test(start_paused = true)]
async fn test_resumed_retry_count_stays_within_max() {
    for starting in [2, 3, 7] {
        let h = harness();
        h.fetcher
            .push_errs("/risks", &FetchError::Status { status: 503 }, 5);

        let outcome = h
            .navigator
            .load_view_content(&ViewId::Risks, &NavParams::new(), starting)
            .await;

        assert_eq!(h.fetcher.call_count("/risks"), 1, "starting at {starting}");
        let LoadOutcome::Failed(error) = outcome else {
            panic!("expected failure, got {outcome:?}");
        };
        assert_eq!(error.retry_count, 3, "starting at {starting}");
        assert_eq!(h.navigator.error_state(), Some(error));
        let panel = h.renderer.last().unwrap();
        assert!(panel.contains("Retry (3/3)"), "starting at {starting}");
    }
}

#[tokio::test(start_paused = true)]
async fn test_resumed_retry_count_one_leaves_two_attempts() {
    let h = harness();
    h.fetcher
        .push_errs("/risks", &FetchError::Status { status: 503 }, 5);

    let outcome = h
        .navigator
        .load_view_content(&ViewId::Risks, &NavParams::new(), 1)
        .await;

    let times = h.fetcher.call_times("/risks");
    assert_eq!(times.len(), 2);
    assert_eq!(times[1] - times[0], Duration::from_millis(2000));
    let LoadOutcome::Failed(error) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(error.retry_count, 3);
}

#[tokio::test(start_paused = true)]
async fn test_client_error_is_not_retried() {
    let h = harness();
    h.fetcher
        .push_err("/projects", FetchError::Status { status: 404 });
    let start = Instant::now();

    let outcome = h
        .navigator
        .navigate_to(ViewId::Projects, NavParams::new(), true)
        .await
        .unwrap();

    assert_eq!(h.fetcher.call_count("/projects"), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
    let LoadOutcome::Failed(error) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(error.retry_count, 0);
    assert_eq!(error.error, "HTTP 404");
    assert_eq!(h.navigator.phase(), LoadPhase::ErrorDisplayed);
}

#[tokio::test(start_paused = true)]
async fn test_transient_failure_then_success() {
    let h = harness();
    h.fetcher
        .push_err("/backlog", FetchError::Network("connection reset".to_string()));
    h.fetcher.push_ok("/backlog", "<ul class=\"backlog\"></ul>");

    let outcome = h
        .navigator
        .navigate_to(ViewId::Backlog, NavParams::new(), true)
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded(ViewId::Backlog));
    assert_eq!(h.fetcher.call_count("/backlog"), 2);
    assert_eq!(h.navigator.error_state(), None);
    assert_eq!(h.renderer.last().as_deref(), Some("<ul class=\"backlog\"></ul>"));
}

#[tokio::test(start_paused = true)]
async fn test_slow_fragment_times_out_and_retries() {
    let h = harness_with(
        NavigatorConfig::default().with_request_timeout(Duration::from_secs(10)),
        InitializerRegistry::new(),
    );
    h.fetcher
        .push_delayed("/reports", Duration::from_secs(15), Ok("<p>late</p>".to_string()));
    let start = Instant::now();

    let outcome = h
        .navigator
        .navigate_to(ViewId::Reports, NavParams::new(), true)
        .await
        .unwrap();

    assert_eq!(outcome, LoadOutcome::Loaded(ViewId::Reports));
    assert_eq!(start.elapsed(), Duration::from_secs(11));
    assert_eq!(h.renderer.last(), Some(default_fragment("/reports")));
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_is_discarded() {
    let h = harness();
    h.fetcher.push_delayed(
        "/risks",
        Duration::from_millis(500),
        Ok("<p>risks</p>".to_string()),
    );

    let (slow, fast) = tokio::join!(
        h.navigator.navigate_to(ViewId::Risks, NavParams::new(), true),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            h.navigator
                .navigate_to(ViewId::Projects, NavParams::new(), true)
                .await
        }
    );

    assert_eq!(slow.unwrap(), LoadOutcome::Superseded);
    assert_eq!(fast.unwrap(), LoadOutcome::Loaded(ViewId::Projects));
    assert_eq!(h.renderer.last(), Some(default_fragment("/projects")));
    assert!(h.renderer.renders().iter().all(|r| r != "<p>risks</p>"));
    assert_eq!(h.navigator.current_view(), Some(ViewId::Projects));
    assert_eq!(h.navigator.phase(), LoadPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_stale_failure_leaves_no_error_state() {
    let h = harness();
    h.fetcher.push_delayed(
        "/risks",
        Duration::from_millis(500),
        Err(FetchError::Status { status: 404 }),
    );

    let (slow, fast) = tokio::join!(
        h.navigator.navigate_to(ViewId::Risks, NavParams::new(), true),
        async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            h.navigator
                .navigate_to(ViewId::Settings, NavParams::new(), true)
                .await
        }
    );

    assert_eq!(slow.unwrap(), LoadOutcome::Superseded);
    assert!(fast.unwrap().is_loaded());
    assert_eq!(h.navigator.error_state(), None);
    assert_eq!(h.navigator.phase(), LoadPhase::Idle);
}

#[tokio::test]
async fn test_initializer_failure_surfaces_without_retry() {
    let mut initializers = InitializerRegistry::new();
    initializers.register_fn(ViewId::Gantt, |_, _| {
        Err(InitError::new("timeline container missing"))
    });
    let h = harness_with(NavigatorConfig::default(), initializers);

    let outcome = h
        .navigator
        .navigate_to(ViewId::Gantt, NavParams::new(), true)
        .await
        .unwrap();

    assert_eq!(h.fetcher.call_count("/gantt"), 1);
    let LoadOutcome::Failed(error) = outcome else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(
        error.error,
        "initializer for 'gantt' failed: timeline container missing"
    );
    assert_eq!(error.retry_count, 0);
}

#[tokio::test]
async fn test_success_clears_previous_error() {
    let h = harness();
    h.fetcher
        .push_err("/risks", FetchError::Status { status: 404 });

    h.navigator
        .navigate_to(ViewId::Risks, NavParams::new(), true)
        .await
        .unwrap();
    assert!(h.navigator.error_state().is_some());

    h.navigator
        .navigate_to(ViewId::Projects, NavParams::new(), true)
        .await
        .unwrap();
    assert_eq!(h.navigator.error_state(), None);
    assert_eq!(h.navigator.phase(), LoadPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_recover_retry_starts_fresh_budget() {
    let h = harness();
    h.fetcher
        .push_errs("/risks", &FetchError::Status { status: 503 }, 3);
    h.navigator
        .navigate_to(ViewId::Risks, NavParams::new(), true)
        .await
        .unwrap();

    let outcome = h.navigator.recover(RecoveryAction::Retry).await.unwrap();

    assert_eq!(outcome, Some(LoadOutcome::Loaded(ViewId::Risks)));
    assert_eq!(h.fetcher.call_count("/risks"), 4);
    assert_eq!(h.navigator.error_state(), None);
    // Retrying the same view adds no breadcrumb or history entry
    assert_eq!(h.navigator.breadcrumbs().len(), 1);
    assert_eq!(h.surface.history().len(), 1);
}

#[tokio::test]
async fn test_recover_reload_and_home() {
    let h = harness();
    h.fetcher
        .push_err("/reports", FetchError::Status { status: 403 });
    h.navigator
        .navigate_to(ViewId::Reports, NavParams::new(), true)
        .await
        .unwrap();

    assert_eq!(h.navigator.recover(RecoveryAction::ReloadPage).await.unwrap(), None);
    assert_eq!(h.surface.reloads(), 1);

    let home = h.navigator.recover(RecoveryAction::GoToDefault).await.unwrap();
    assert_eq!(home, Some(LoadOutcome::Loaded(ViewId::Dashboard)));
    assert_eq!(h.navigator.current_view(), Some(ViewId::Dashboard));
}

#[tokio::test]
async fn test_recover_before_navigation() {
    let h = harness();
    let err = h.navigator.recover(RecoveryAction::Retry).await.unwrap_err();
    assert!(matches!(err, NavError::NoActiveView));
}

#[tokio::test]
async fn test_configured_default_view_used_for_home() {
    let h = harness_with(
        NavigatorConfig::default().with_default_view(ViewId::Projects),
        InitializerRegistry::new(),
    );

    let outcome = h.navigator.start("/nowhere").await.unwrap();
    assert_eq!(outcome, LoadOutcome::Loaded(ViewId::Projects));

    let home = h.navigator.recover(RecoveryAction::GoToDefault).await.unwrap();
    assert_eq!(home, Some(LoadOutcome::Loaded(ViewId::Projects)));
}
