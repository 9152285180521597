//! End-to-end harvest runs against the scripted site

use crate::support::{Action, FakePage, FakeSite};
use email_sweep::config::Config;
use email_sweep::crawler::{run_harvest, Coordinator, StopReason, VisitOutcome};
use email_sweep::{canonicalize, HarvestError, PageProgress, UrlError};
use std::time::Duration;

const START: &str = "http://example.com";

fn emails(report: &email_sweep::RunReport) -> Vec<String> {
    report.emails.iter().map(str::to_string).collect()
}

#[tokio::test]
async fn test_page_without_elements_completes_in_one_visit() {
    let site = FakeSite::new().page("example.com", FakePage::new("<p>nothing here</p>"));

    let report = run_harvest(site.browser(), START, &Config::default())
        .await
        .expect("harvest failed");

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.frontier.tracked, 1);
    assert_eq!(report.frontier.explored, 1);
    assert_eq!(report.frontier.pending, 0);
    assert!(report.emails.is_empty());
    assert_eq!(site.total_clicks(), 0);
    assert_eq!(site.sessions_opened(), 1);
    assert_eq!(site.sessions_closed(), 1);
}

#[tokio::test]
async fn test_extracts_email_from_markup() {
    let site = FakeSite::new().page(
        "example.com",
        FakePage::new("<p>contact us at jane.doe@example.com!</p>"),
    );

    let report = run_harvest(site.browser(), START, &Config::default())
        .await
        .expect("harvest failed");

    assert_eq!(emails(&report), vec!["jane.doe@example.com"]);

    let mut listing = Vec::new();
    report.write_emails(&mut listing).unwrap();
    assert_eq!(
        String::from_utf8(listing).unwrap(),
        "Emails:\njane.doe@example.com\n"
    );
}

#[tokio::test]
async fn test_navigating_click_ends_visit() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("<div>start</div>")
                .element(Action::Nothing)
                .element(Action::Nothing)
                .element(Action::Navigate("example.com/p2".to_string()))
                .element(Action::Nothing)
                .element(Action::Nothing),
        )
        .page("example.com/p2", FakePage::new("<p>p2@example.com</p>"));

    let mut coordinator = Coordinator::new(site.browser(), START, &Config::default().harvest)
        .expect("coordinator");
    let stop_reason = coordinator.run().await.expect("run failed");

    assert_eq!(stop_reason, StopReason::Exhausted);
    assert_eq!(site.clicks_on("example.com"), vec![0, 1, 2]);

    let p2 = canonicalize("example.com/p2");
    assert!(coordinator.state().frontier.contains(&p2));
    assert!(coordinator.state().frontier.is_page_complete(&p2));
    assert!(coordinator.state().emails.contains("p2@example.com"));

    let report = coordinator.finish(stop_reason).await;
    assert_eq!(report.frontier.tracked, 2);
    assert_eq!(report.frontier.retired, 0);
}

#[tokio::test]
async fn test_navigating_click_skips_rest_of_visit() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("")
                .element(Action::Nothing)
                .element(Action::Nothing)
                .element(Action::Navigate("example.com/p2".to_string()))
                .element(Action::Nothing)
                .element(Action::Nothing),
        )
        .page("example.com/p2", FakePage::new(""));

    let mut coordinator = Coordinator::new(site.browser(), START, &Config::default().harvest)
        .expect("coordinator");
    coordinator.start().await.expect("start failed");

    let outcome = coordinator.step().await.expect("step failed");
    assert_eq!(
        outcome,
        Some(VisitOutcome::Navigated {
            from: canonicalize("example.com"),
            to: canonicalize("example.com/p2"),
        })
    );
    assert_eq!(site.clicks_on("example.com"), vec![0, 1, 2]);

    let start = canonicalize("example.com");
    assert!(coordinator.state().frontier.is_page_complete(&start));
    assert_eq!(coordinator.state().frontier.next_click(&start), None);

    let outcome = coordinator.step().await.expect("step failed");
    assert_eq!(
        outcome,
        Some(VisitOutcome::Finished {
            page: canonicalize("example.com/p2"),
        })
    );
    assert!(coordinator.state().frontier.is_empty());
}

#[tokio::test]
async fn test_redirected_page_is_retired_without_visit() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("")
                .link("http://example.com/login")
                .link("http://example.com/x"),
        )
        .page(
            "example.com/login",
            FakePage::new("<p>login@example.com</p>").redirect("example.com"),
        )
        .page("example.com/x", FakePage::new("<p>x@example.com</p>"));

    let mut coordinator = Coordinator::new(site.browser(), START, &Config::default().harvest)
        .expect("coordinator");
    let stop_reason = coordinator.run().await.expect("run failed");

    assert_eq!(stop_reason, StopReason::Exhausted);

    let frontier = &coordinator.state().frontier;
    assert_eq!(
        frontier.progress(&canonicalize("example.com/login")),
        Some(PageProgress::Retired)
    );
    assert!(frontier.is_page_complete(&canonicalize("example.com/x")));

    let navigations = site.navigations();
    assert_eq!(
        navigations.iter().filter(|n| *n == "example.com/login").count(),
        1
    );
    assert!(navigations.contains(&"example.com/x".to_string()));

    let emails = &coordinator.state().emails;
    assert!(emails.contains("x@example.com"));
    assert!(!emails.contains("login@example.com"));
}

#[tokio::test]
async fn test_unreachable_page_is_retired() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("")
                .link("http://example.com/down")
                .link("http://example.com/up"),
        )
        .page("example.com/down", FakePage::new("").unreachable())
        .page("example.com/up", FakePage::new("<b>up@example.com</b>"));

    let report = run_harvest(site.browser(), START, &Config::default())
        .await
        .expect("harvest failed");

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.frontier.tracked, 3);
    assert_eq!(report.frontier.retired, 1);
    assert_eq!(report.frontier.explored, 2);
    assert_eq!(emails(&report), vec!["up@example.com"]);
}

#[tokio::test]
async fn test_unreachable_start_page_aborts_with_report() {
    let site = FakeSite::new().page("example.com", FakePage::new("").unreachable());

    let report = run_harvest(site.browser(), START, &Config::default())
        .await
        .expect("a failed run still reports");

    assert!(matches!(report.stop_reason, StopReason::Aborted(_)));
    assert!(report.emails.is_empty());
    assert_eq!(site.sessions_closed(), 1);
}

#[tokio::test]
async fn test_start_url_without_domain_is_rejected() {
    let site = FakeSite::new();

    let result = run_harvest(site.browser(), "", &Config::default()).await;

    assert!(matches!(
        result,
        Err(HarvestError::UrlError(UrlError::MissingDomain(_)))
    ));
    assert_eq!(site.sessions_opened(), 0);
}

#[tokio::test]
async fn test_budget_expiry_keeps_collected_emails() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("<p>first@example.com</p>")
                .link("http://example.com/later")
                .element(Action::Sleep(Duration::from_millis(150))),
        )
        .page("example.com/later", FakePage::new("<p>later@example.com</p>"));

    let mut coordinator =
        Coordinator::with_budget(site.browser(), START, Duration::from_millis(50))
            .expect("coordinator");
    let stop_reason = coordinator.run().await.expect("run failed");
    let report = coordinator.finish(stop_reason).await;

    assert_eq!(report.stop_reason, StopReason::OutOfTime);
    assert_eq!(report.frontier.pending, 1);
    assert_eq!(emails(&report), vec!["first@example.com"]);
}

#[tokio::test]
async fn test_lost_session_is_replaced() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("")
                .link("http://example.com/b")
                .element(Action::Navigate("example.com/a".to_string())),
        )
        .page("example.com/a", FakePage::new("<p>a@example.com</p>"))
        .page("example.com/b", FakePage::new("<p>b@example.com</p>"))
        .lose_session_on("example.com/a");

    let mut coordinator = Coordinator::new(site.browser(), START, &Config::default().harvest)
        .expect("coordinator");

    let stop_reason = coordinator.run().await.expect("run failed");
    assert_eq!(stop_reason, StopReason::Exhausted);
    assert_eq!(site.sessions_opened(), 2);

    let frontier = &coordinator.state().frontier;
    assert_eq!(
        frontier.progress(&canonicalize("example.com/a")),
        Some(PageProgress::Retired)
    );
    assert!(frontier.is_page_complete(&canonicalize("example.com/b")));
    assert!(coordinator.state().emails.contains("b@example.com"));

    coordinator.finish(stop_reason).await;
    assert_eq!(site.sessions_closed(), 2);
}

#[tokio::test]
async fn test_off_domain_popups_are_closed() {
    let site = FakeSite::new().page(
        "example.com",
        FakePage::new("")
            .element(Action::Popup("http://ads.other.com/win".to_string()))
            .element(Action::Popup("http://example.com/help".to_string())),
    );

    let report = run_harvest(site.browser(), START, &Config::default())
        .await
        .expect("harvest failed");

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(site.clicks_on("example.com"), vec![0, 1]);
    assert_eq!(site.closed_windows(), vec!["popup-0"]);
}

#[tokio::test]
async fn test_mutation_is_harvested_and_failures_skipped() {
    let site = FakeSite::new().page(
        "example.com",
        FakePage::new("<div>menu</div>")
            .hidden_element()
            .element(Action::Fail)
            .element(Action::Mutate("<span>hidden@example.com</span>".to_string()))
            .element(Action::Nothing),
    );

    let report = run_harvest(site.browser(), START, &Config::default())
        .await
        .expect("harvest failed");

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    // The hidden element is never counted, so it is never clicked
    assert_eq!(site.clicks_on("example.com"), vec![1, 2, 3]);
    assert_eq!(emails(&report), vec!["hidden@example.com"]);
}

#[tokio::test]
async fn test_only_visible_same_domain_links_are_tracked() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("")
                .link("http://other.com/elsewhere")
                .link("mailto:me@example.com")
                .link("")
                .hidden_link("http://example.com/secret")
                .link("https://www.example.com/about?ref=home"),
        )
        .page("example.com/about", FakePage::new(""));

    let mut coordinator = Coordinator::new(site.browser(), START, &Config::default().harvest)
        .expect("coordinator");
    let stop_reason = coordinator.run().await.expect("run failed");

    assert_eq!(stop_reason, StopReason::Exhausted);

    let tracked: Vec<String> = coordinator
        .state()
        .frontier
        .iter()
        .map(|(page, _)| page.to_string())
        .collect();
    assert_eq!(tracked, vec!["example.com", "example.com/about"]);
}

#[tokio::test]
async fn test_step_outcomes() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("").element(Action::Navigate("example.com/next".to_string())),
        )
        .page("example.com/next", FakePage::new(""));

    let mut coordinator = Coordinator::new(site.browser(), START, &Config::default().harvest)
        .expect("coordinator");
    let stop_reason = coordinator.run().await.expect("run failed");
    assert_eq!(stop_reason, StopReason::Exhausted);

    // Everything is done, so a further step finds no page with work left
    let outcome = coordinator.step().await.expect("step failed");
    assert_eq!(outcome, None::<VisitOutcome>);
}

#[tokio::test]
async fn test_session_lost_during_visibility_check_is_replaced() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("")
                .link("http://example.com/a")
                .link("http://example.com/b"),
        )
        .page(
            "example.com/a",
            FakePage::new("<p>a@example.com</p>").dying_element(),
        )
        .page("example.com/b", FakePage::new("<p>b@example.com</p>"));

    let mut coordinator = Coordinator::new(site.browser(), START, &Config::default().harvest)
        .expect("coordinator");

    let stop_reason = coordinator.run().await.expect("run failed");
    assert_eq!(stop_reason, StopReason::Exhausted);
    assert_eq!(site.sessions_opened(), 2);

    let frontier = &coordinator.state().frontier;
    assert_eq!(
        frontier.progress(&canonicalize("example.com/a")),
        Some(PageProgress::Retired)
    );
    assert!(frontier.is_page_complete(&canonicalize("example.com/b")));

    let emails = &coordinator.state().emails;
    assert!(emails.contains("a@example.com"));
    assert!(emails.contains("b@example.com"));
}

#[tokio::test]
async fn test_mutual_redirects_terminate() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("")
                .link("http://example.com/x")
                .link("http://example.com/y"),
        )
        .page("example.com/x", FakePage::new("").redirect("example.com/y"))
        .page("example.com/y", FakePage::new("").redirect("example.com/x"));

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        run_harvest(site.browser(), START, &Config::default()),
    )
    .await
    .expect("harvest did not terminate")
    .expect("harvest failed");

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.frontier.retired, 2);
    assert_eq!(report.frontier.pending, 0);
    assert_eq!(
        site.navigations(),
        vec!["example.com", "example.com/x", "example.com/y"]
    );
}

#[tokio::test]
async fn test_all_unreachable_pages_terminate() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("<p>home@example.com</p>")
                .link("http://example.com/a")
                .link("http://example.com/b")
                .link("http://example.com/c"),
        )
        .page("example.com/a", FakePage::new("").unreachable())
        .page("example.com/b", FakePage::new("").unreachable())
        .page("example.com/c", FakePage::new("").unreachable());

    let report = tokio::time::timeout(
        Duration::from_secs(5),
        run_harvest(site.browser(), START, &Config::default()),
    )
    .await
    .expect("harvest did not terminate")
    .expect("harvest failed");

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(report.frontier.tracked, 4);
    assert_eq!(report.frontier.explored, 1);
    assert_eq!(report.frontier.retired, 3);
    assert_eq!(report.frontier.pending, 0);
    assert_eq!(emails(&report), vec!["home@example.com"]);
}

#[tokio::test]
async fn test_listing_failure_aborts_and_keeps_emails() {
    let site = FakeSite::new()
        .page(
            "example.com",
            FakePage::new("<p>kept@example.com</p>")
                .link("http://example.com/never")
                .element(Action::Nothing),
        )
        .page("example.com/never", FakePage::new(""))
        .fail_listing_on("example.com");

    let report = run_harvest(site.browser(), START, &Config::default())
        .await
        .expect("a failed run still reports");

    assert!(matches!(report.stop_reason, StopReason::Aborted(_)));
    assert_eq!(emails(&report), vec!["kept@example.com"]);
    assert_eq!(site.total_clicks(), 0);
    assert_eq!(site.sessions_opened(), 1);
    assert_eq!(site.sessions_closed(), 1);
}

#[tokio::test]
async fn test_start_url_is_loaded_as_given() {
    let site = FakeSite::new().page("example.com", FakePage::new("<p>www@example.com</p>"));

    let report = run_harvest(
        site.browser(),
        "https://www.example.com/?ref=ad",
        &Config::default(),
    )
    .await
    .expect("harvest failed");

    assert_eq!(report.stop_reason, StopReason::Exhausted);
    assert_eq!(
        site.requested_urls().first().map(String::as_str),
        Some("https://www.example.com/")
    );
    assert_eq!(emails(&report), vec!["www@example.com"]);
}
