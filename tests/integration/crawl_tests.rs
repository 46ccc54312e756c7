//! End-to-end crawl tests
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! crawl cycle through the real HTTP fetcher.

use status_crawler::config::Config;
use status_crawler::crawler::{crawl, CrawlResult, Crawler, FetchError, Outcome};
use status_crawler::output::Reporter;
use std::time::{Duration, Instant};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config() -> Config {
    let mut config = Config::default();
    config.crawler.max_concurrent = 4;
    config.crawler.rate_limit = false;
    config.http.timeout = Duration::from_secs(2);
    config
}

/// Mounts an HTML page that must be fetched exactly `times` times
async fn mount_html(server: &MockServer, page: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8"),
        )
        .expect(times)
        .mount(server)
        .await;
}

fn find<'a>(results: &'a [CrawlResult], url: &str) -> &'a CrawlResult {
    results
        .iter()
        .find(|r| r.url == url)
        .unwrap_or_else(|| panic!("no result for {}", url))
}

fn requested_paths(requests: &[wiremock::Request]) -> Vec<String> {
    let mut paths: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn test_full_crawl_single_host() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
        </body></html>"#,
        1,
    )
    .await;
    mount_html(&mock_server, "/page1", r#"<a href="/page3">Page 3</a>"#, 1).await;
    mount_html(&mock_server, "/page2", "<p>leaf</p>", 1).await;
    mount_html(&mock_server, "/page3", "<p>leaf</p>", 1).await;

    let (results, stats) = crawl(&test_config(), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(results.len(), 4);
    assert!(results.iter().all(|r| r.status_code() == Some(200)));
    assert_eq!(stats.visited, 4);
    assert_eq!(stats.expanded, 4);
    assert_eq!(stats.scheduled, 3);
}

#[tokio::test]
async fn test_foreign_host_is_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let port = mock_server.address().port();

    // Same server reached through another hostname counts as foreign
    mount_html(
        &mock_server,
        "/",
        &format!(
            r#"<a href="/p2">internal</a>
               <a href="http://localhost:{}/foreign">external</a>"#,
            port
        ),
        1,
    )
    .await;
    mount_html(&mock_server, "/p2", "<p>no links</p>", 1).await;
    mount_html(&mock_server, "/foreign", "<p>foreign</p>", 0).await;

    let (results, stats) = crawl(&test_config(), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(results.len(), 2);
    assert_eq!(stats.off_host, 1);

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requested_paths(&requests), vec!["/", "/p2"]);
}

#[tokio::test]
async fn test_redirect_is_reported_not_followed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", r#"<a href="/old">old</a>"#, 1).await;
    let location = format!("{}/new", base_url);
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(
            ResponseTemplate::new(301).insert_header("location", location.as_str()),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/new", "<p>target</p>", 0).await;

    let (results, _) = crawl(&test_config(), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(results.len(), 2);
    let old = find(&results, &format!("{}/old", base_url));
    assert_eq!(old.status_code(), Some(301));
}

#[tokio::test]
async fn test_non_html_and_error_pages_are_not_expanded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/data.json">data</a><a href="/missing">missing</a>"#,
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data.json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(
                r#"{"html": "<a href=\"/from-json\">x</a>"}"#,
                "application/json",
            ),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_raw(r#"<a href="/from-404">home</a>"#, "text/html"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/from-json", "", 0).await;
    mount_html(&mock_server, "/from-404", "", 0).await;

    let (results, stats) = crawl(&test_config(), &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(results.len(), 3);
    let data = find(&results, &format!("{}/data.json", base_url));
    assert_eq!(data.content_type(), Some("application/json"));
    let missing = find(&results, &format!("{}/missing", base_url));
    assert_eq!(missing.status_code(), Some(404));
    assert_eq!(stats.expanded, 1);
}

#[tokio::test]
async fn test_duplicate_and_cyclic_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/a">a</a><a href="/a">a again</a><a href="/a#top">a top</a><a href="/b">b</a>"#,
        1,
    )
    .await;
    mount_html(&mock_server, "/a", r#"<a href="/">home</a><a href="/b">b</a>"#, 1).await;
    mount_html(&mock_server, "/b", r#"<a href="/a">a</a><a href="/b">self</a>"#, 1).await;

    // Seed without a trailing slash still matches the "/" links
    let (results, _) = crawl(&test_config(), &base_url)
        .await
        .expect("Crawl failed");

    assert_eq!(results.len(), 3);
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requested_paths(&requests), vec!["/", "/a", "/b"]);
}

#[tokio::test]
async fn test_fetch_failures_are_isolated() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // A port with nothing listening on the same hostname
    let closed_port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let dead_url = format!("http://127.0.0.1:{}/down", closed_port);

    mount_html(
        &mock_server,
        "/",
        &format!(
            r#"<a href="{}">dead</a><a href="/slow">slow</a><a href="/ok">ok</a>"#,
            dead_url
        ),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<p>late</p>", "text/html")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/ok", r#"<a href="/deeper">deeper</a>"#, 1).await;
    mount_html(&mock_server, "/deeper", "", 1).await;

    let mut config = test_config();
    config.http.timeout = Duration::from_millis(500);

    let (results, _) = crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(results.len(), 5);
    assert!(matches!(
        find(&results, &dead_url).outcome,
        Outcome::Failed(FetchError::Connect(_))
    ));
    assert_eq!(
        find(&results, &format!("{}/slow", base_url)).error(),
        Some(&FetchError::Timeout)
    );
    assert_eq!(
        find(&results, &format!("{}/deeper", base_url)).status_code(),
        Some(200)
    );
}

#[tokio::test]
async fn test_user_agent_is_sent() {
    let mock_server = MockServer::start().await;

    let mut config = test_config();
    config.http.user_agent = "HealthBot/2.0".to_string();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "HealthBot/2.0"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (results, _) = crawl(&config, &format!("{}/", mock_server.uri()))
        .await
        .expect("Crawl failed");

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].status_code(), Some(200));
}

#[tokio::test]
async fn test_rate_limit_spaces_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<a href="/1">1</a><a href="/2">2</a><a href="/3">3</a>"#,
        1,
    )
    .await;
    for page in ["/1", "/2", "/3"] {
        mount_html(&mock_server, page, "", 1).await;
    }

    let mut config = test_config();
    config.crawler.rate_limit = true;
    config.crawler.requests_per_host = 2;
    config.crawler.rate_interval = Duration::from_millis(400);

    let started = Instant::now();
    let (results, _) = crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    // Four requests at two per window need a second window
    assert_eq!(results.len(), 4);
    assert!(started.elapsed() >= Duration::from_millis(400));
}

#[tokio::test]
async fn test_report_streams_every_result() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_html(&mock_server, "/", r#"<a href="/gone">gone</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(410))
        .expect(1)
        .mount(&mock_server)
        .await;

    let seed = format!("{}/", base_url);
    let crawler = Crawler::from_config(&test_config()).expect("Failed to build crawler");
    let (stream, completion) = crawler.start(&seed).expect("Failed to start crawl");

    let mut reporter = Reporter::new(Vec::new());
    reporter.header(&seed).unwrap();
    let summary = reporter.drain(stream).await.unwrap();
    let stats = completion.wait().await.unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.successes, 1);
    assert_eq!(summary.http_errors, 1);
    assert_eq!(stats.visited, 2);

    let report = String::from_utf8(reporter.into_inner()).unwrap();
    assert!(report.contains(&format!("Health Status Report for {}", seed)));
    assert!(report.contains("Status: 410 Gone"));
}

#[tokio::test]
async fn test_invalid_seed_is_rejected() {
    let config = test_config();

    assert!(crawl(&config, "not a url").await.is_err());
    assert!(crawl(&config, "/relative/path").await.is_err());
}
