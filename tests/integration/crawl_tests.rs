//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use site_ripple::config::CrawlConfig;
use site_ripple::crawler::{crawl_site, run_crawl, PageRecord};
use site_ripple::state::PageOutcome;
use site_ripple::url::normalize_url;
use std::time::{Duration, Instant};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// An HTML response with the given body
fn html_page(body: impl Into<String>) -> ResponseTemplate {
    let body: String = body.into();
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// A page body linking to each of `hrefs`
fn page_with_links(heading: &str, hrefs: &[String]) -> String {
    let links: String = hrefs
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    format!(
        "<html><body><h1>{}</h1><p>About {}</p>{}</body></html>",
        heading, heading, links
    )
}

/// Mounts a GET handler for `route` that must be hit exactly `times` times
async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Normalized key of `route` on the mock server
fn key(server: &MockServer, route: &str) -> String {
    normalize_url(&format!("{}{}", server.uri(), route)).expect("Failed to normalize test URL")
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("Request recording is enabled")
        .len()
}

#[tokio::test]
async fn test_seed_page_extraction() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        html_page(
            r#"<html><body>
              <h1>Test Title</h1>
              <p>This is the first paragraph.</p>
              <a href="/link1">Link 1</a>
              <img src="/image1.jpg" alt="Image 1">
            </body></html>"#,
        ),
        1,
    )
    .await;
    mount_page(&server, "/link1", ResponseTemplate::new(404), 1).await;

    let pages = crawl_site(&base_url, 10, 3).await.expect("Crawl failed");

    assert_eq!(pages.len(), 1);
    let expected = PageRecord {
        url: base_url.clone(),
        heading: "Test Title".to_string(),
        first_paragraph: "This is the first paragraph.".to_string(),
        outgoing_links: vec![format!("{}/link1", base_url)],
        image_urls: vec![format!("{}/image1.jpg", base_url)],
    };
    assert_eq!(pages[&key(&server, "/")], expected);
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        html_page(page_with_links(
            "Home",
            &[format!("{}/page1", base_url), "/page2".to_string()],
        )),
        1,
    )
    .await;
    mount_page(
        &server,
        "/page1",
        html_page(page_with_links("Page 1", &["page2".to_string()])),
        1,
    )
    .await;
    mount_page(
        &server,
        "/page2",
        html_page(page_with_links("Page 2", &["/".to_string()])),
        1,
    )
    .await;

    let report = run_crawl(CrawlConfig::new(base_url, 4, 10))
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.pages[&key(&server, "/page1")].heading, "Page 1");
    assert_eq!(report.pages[&key(&server, "/page2")].first_paragraph, "About Page 2");
    assert_eq!(report.claimed, 3);
    assert_eq!(report.outcomes[&PageOutcome::Recorded], 3);
    assert!(!report.budget_exhausted);
}

#[tokio::test]
async fn test_max_pages_one_records_only_seed() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(page_with_links(
            "Home",
            &["/a".to_string(), "/b".to_string(), "/c".to_string()],
        )),
        1,
    )
    .await;
    for route in ["/a", "/b", "/c"] {
        mount_page(&server, route, html_page("<p>child</p>"), 0).await;
    }

    let report = run_crawl(CrawlConfig::new(server.uri(), 3, 1))
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages.len(), 1);
    assert!(report.pages.contains_key(&key(&server, "/")));
    assert!(report.budget_exhausted);
}

#[tokio::test]
async fn test_seed_not_found_yields_empty_map() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        ResponseTemplate::new(404).insert_header("content-type", "text/html"),
        1,
    )
    .await;

    let report = run_crawl(CrawlConfig::new(server.uri(), 2, 10))
        .await
        .expect("Crawl must complete even when the seed fails");

    assert!(report.pages.is_empty());
    assert_eq!(report.outcomes[&PageOutcome::DeadLink], 1);
}

#[tokio::test]
async fn test_non_html_seed_yields_empty_map() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/",
        ResponseTemplate::new(200)
            .set_body_raw(r#"{"hello": "world"}"#, "application/json"),
        1,
    )
    .await;

    let pages = crawl_site(&server.uri(), 10, 2).await.expect("Crawl failed");
    assert!(pages.is_empty());
}

#[tokio::test]
async fn test_failed_children_are_skipped() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        html_page(page_with_links(
            "Home",
            &["/ok".to_string(), "/missing".to_string(), "/data".to_string()],
        )),
        1,
    )
    .await;
    mount_page(&server, "/ok", html_page("<h1>Fine</h1>"), 1).await;
    mount_page(&server, "/missing", ResponseTemplate::new(410), 1).await;
    mount_page(
        &server,
        "/data",
        ResponseTemplate::new(200)
            .set_body_raw("a,b,c", "text/csv"),
        1,
    )
    .await;

    let report = run_crawl(CrawlConfig::new(server.uri(), 3, 10))
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.pages[&key(&server, "/ok")].heading, "Fine");
    assert_eq!(report.outcomes[&PageOutcome::Recorded], 2);
    assert_eq!(report.outcomes[&PageOutcome::DeadLink], 1);
    assert_eq!(report.outcomes[&PageOutcome::ContentMismatch], 1);
}

#[tokio::test]
async fn test_off_host_links_are_never_fetched() {
    let server = MockServer::start().await;
    let other = MockServer::start().await;

    // Same machine, but "localhost" is a different hostname than "127.0.0.1"
    let other_port = other.address().port();
    let off_host = format!("http://localhost:{}/elsewhere", other_port);

    mount_page(
        &server,
        "/",
        html_page(page_with_links(
            "Home",
            &[
                off_host,
                "https://example.invalid/page".to_string(),
                "mailto:someone@example.com".to_string(),
            ],
        )),
        1,
    )
    .await;
    mount_page(&other, "/elsewhere", html_page("<p>other site</p>"), 0).await;

    let report = run_crawl(CrawlConfig::new(server.uri(), 2, 10))
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.claimed, 1);
    assert_eq!(request_count(&other).await, 0);
}

#[tokio::test]
async fn test_each_page_fetched_once() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    mount_page(
        &server,
        "/",
        html_page(page_with_links(
            "Home",
            &[
                "/a".to_string(),
                "/b".to_string(),
                "/a".to_string(),
                "/#top".to_string(),
                base_url.clone(),
                format!("{}/", base_url),
            ],
        )),
        1,
    )
    .await;
    mount_page(
        &server,
        "/a",
        html_page(page_with_links(
            "A",
            &["/b".to_string(), "/".to_string(), "/a/".to_string()],
        )),
        1,
    )
    .await;
    mount_page(
        &server,
        "/b",
        html_page(page_with_links(
            "B",
            &["/a/".to_string(), "/".to_string(), "/b?page=2".to_string()],
        )),
        1,
    )
    .await;
    // "/a/" normalizes to the same key as "/a" and must never be requested
    mount_page(&server, "/a/", html_page("<p>duplicate</p>"), 0).await;

    let pages = crawl_site(&base_url, 50, 8).await.expect("Crawl failed");

    assert_eq!(pages.len(), 3);
    assert_eq!(request_count(&server).await, 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_no_duplicate_fetches_under_high_concurrency() {
    let server = MockServer::start().await;
    let routes: Vec<String> = (0..15).map(|i| format!("/p{}", i)).collect();

    // Every page links to every other page, including itself and the seed
    let mut everything = routes.clone();
    everything.push("/".to_string());

    mount_page(&server, "/", html_page(page_with_links("Home", &everything)), 1).await;
    for route in &routes {
        mount_page(&server, route, html_page(page_with_links(route, &everything)), 1).await;
    }

    let pages = crawl_site(&server.uri(), 100, 16).await.expect("Crawl failed");

    assert_eq!(pages.len(), 16);
    assert_eq!(request_count(&server).await, 16);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_budget_never_exceeded_with_wide_fan_out() {
    let server = MockServer::start().await;
    let routes: Vec<String> = (0..20).map(|i| format!("/p{}", i)).collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(page_with_links("Home", &routes)))
        .mount(&server)
        .await;
    for route in &routes {
        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .respond_with(html_page(page_with_links(route, &routes)))
            .mount(&server)
            .await;
    }

    let report = run_crawl(CrawlConfig::new(server.uri(), 4, 5))
        .await
        .expect("Crawl failed");

    assert!(report.pages.len() <= 5);
    assert_eq!(report.claimed, 5);
    assert!(report.budget_exhausted);
    assert!(request_count(&server).await <= 5);
}

#[tokio::test]
async fn test_siblings_after_budget_produce_no_record() {
    let server = MockServer::start().await;
    let children: Vec<String> = ["/a", "/b", "/c", "/d", "/e"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(page_with_links("Home", &children)))
        .expect(1)
        .mount(&server)
        .await;
    for child in &children {
        Mock::given(method("GET"))
            .and(path(child.as_str()))
            .respond_with(html_page("<p>child</p>").set_delay(Duration::from_millis(200)))
            .mount(&server)
            .await;
    }

    let report = run_crawl(CrawlConfig::new(server.uri(), 5, 2))
        .await
        .expect("Crawl failed");

    // The seed is always recorded before any child can exhaust the budget
    assert!(report.pages.contains_key(&key(&server, "/")));
    assert!(report.pages.len() <= 2);
    assert_eq!(report.claimed, 2);
    assert!(report.budget_exhausted);
    assert!(request_count(&server).await <= 2);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_limit_is_respected() {
    let server = MockServer::start().await;
    let children: Vec<String> = (0..6).map(|i| format!("/slow{}", i)).collect();

    mount_page(&server, "/", html_page(page_with_links("Home", &children)), 1).await;
    for child in &children {
        mount_page(
            &server,
            child,
            html_page("<p>slow</p>").set_delay(Duration::from_millis(300)),
            1,
        )
        .await;
    }

    let started = Instant::now();
    let pages = crawl_site(&server.uri(), 20, 2).await.expect("Crawl failed");
    let elapsed = started.elapsed();

    // Six delayed pages, two at a time, need at least three rounds
    assert_eq!(pages.len(), 7);
    assert!(
        elapsed >= Duration::from_millis(850),
        "crawl finished too quickly for two permits: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_seed_without_scheme() {
    let server = MockServer::start().await;
    mount_page(&server, "/", html_page("<h1>Schemeless</h1>"), 1).await;

    let seed = server
        .uri()
        .trim_start_matches("http://")
        .to_string();
    let pages = crawl_site(&seed, 5, 1).await.expect("Crawl failed");

    assert_eq!(pages.len(), 1);
    let record = &pages[&key(&server, "/")];
    assert_eq!(record.heading, "Schemeless");
    assert_eq!(record.url, server.uri());
}

#[tokio::test]
async fn test_malformed_seed_is_an_error() {
    assert!(crawl_site("http://", 5, 2).await.is_err());
    assert!(crawl_site("ftp://example.com/", 5, 2).await.is_err());
}
