//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::time::{Duration, Instant};
use sumi_crawl::config::{
    CanonicalScheme, Config, CrawlerConfig, FetchConfig, OutputConfig, UserAgentConfig,
};
use sumi_crawl::crawler::{crawl, Fetcher, MAX_RETRY};
use sumi_crawl::output::{CrawlOutput, JsonFileOutput, OutputHandler};
use sumi_crawl::FetchError;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that crawls plain-http mock servers quickly
fn create_test_config(max_depth: usize) -> Config {
    Config {
        crawler: CrawlerConfig {
            max_depth,
            worker_pool_size: 4,
            request_delay_ms: 1,
            canonical_scheme: CanonicalScheme::Http,
        },
        fetch: FetchConfig {
            timeout_secs: 5,
            max_attempts: MAX_RETRY,
            retry_base_delay_ms: 1,
            retry_max_delay_ms: 10,
        },
        user_agent: UserAgentConfig::default(),
        output: OutputConfig::default(),
    }
}

fn html_page(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">link</a>"#, href))
        .collect();
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", anchors),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, links: &[&str], hits: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(links))
        .expect(hits)
        .mount(server)
        .await;
}

fn crawled(report_urls: &std::collections::BTreeMap<String, bool>) -> Vec<String> {
    report_urls.keys().cloned().collect()
}

#[tokio::test]
async fn test_crawl_stays_on_host_and_within_depth() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/about", "https://other.com/x"], 1).await;
    mount_page(&server, "/about", &["/", "/about/team"], 1).await;
    // Depth 2 is beyond the limit and never requested
    mount_page(&server, "/about/team", &[], 0).await;

    let report = crawl(create_test_config(1), &base).await.unwrap();

    assert_eq!(
        crawled(&report.urls),
        vec![base.clone(), format!("{}/about", base)]
    );
    assert!(report.urls.values().all(|v| *v));
    assert_eq!(report.statistics.pages_crawled, 2);
    assert_eq!(report.statistics.depth_exceeded, 1);
}

#[tokio::test]
async fn test_max_depth_zero_crawls_only_seed() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/a", "/b"], 1).await;
    mount_page(&server, "/a", &[], 0).await;
    mount_page(&server, "/b", &[], 0).await;

    let report = crawl(create_test_config(0), &base).await.unwrap();

    assert_eq!(crawled(&report.urls), vec![base]);
    assert_eq!(report.statistics.depth_exceeded, 2);
}

#[tokio::test]
async fn test_cycles_terminate_and_each_page_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/a", "/b", "/a/"], 1).await;
    mount_page(&server, "/a", &["/", "/b", "/a#top"], 1).await;
    mount_page(&server, "/b", &["/", "/a", "/b?page=2"], 1).await;

    let report = crawl(create_test_config(5), &base).await.unwrap();

    assert_eq!(
        crawled(&report.urls),
        vec![base.clone(), format!("{}/a", base), format!("{}/b", base)]
    );
}

#[tokio::test]
async fn test_excluded_file_types_never_requested() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/report.pdf", "/logo.PNG", "/docs"], 1).await;
    mount_page(&server, "/docs", &[], 1).await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let report = crawl(create_test_config(3), &base).await.unwrap();

    assert_eq!(
        crawled(&report.urls),
        vec![base.clone(), format!("{}/docs", base)]
    );
    assert_eq!(report.statistics.excluded_file_type, 2);
    assert_eq!(report.statistics.leaf_pages, 1);
}

#[tokio::test]
async fn test_failed_pages_are_not_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/missing", "/broken", "/ok"], 1).await;
    mount_page(&server, "/ok", &[], 1).await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(u64::from(MAX_RETRY))
        .mount(&server)
        .await;

    let report = crawl(create_test_config(3), &base).await.unwrap();

    assert_eq!(
        crawled(&report.urls),
        vec![base.clone(), format!("{}/ok", base)]
    );
    assert_eq!(report.statistics.not_found, 1);
    assert_eq!(report.statistics.fetch_failures, 1);
}

#[tokio::test]
async fn test_unreachable_seed_yields_empty_result() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(u64::from(MAX_RETRY))
        .mount(&server)
        .await;

    let report = crawl(create_test_config(3), &base).await.unwrap();

    assert!(report.urls.is_empty());
    assert_eq!(report.statistics.fetch_failures, 1);
}

#[tokio::test]
async fn test_fetch_retries_server_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(500))
        .expect(u64::from(MAX_RETRY))
        .mount(&server)
        .await;

    let config = create_test_config(3);
    let fetcher = Fetcher::new(&config.fetch, &config.user_agent).unwrap();
    let result = fetcher.fetch_links(&format!("{}/flaky", server.uri())).await;

    match result {
        Err(FetchError::RetriesExhausted {
            attempts, source, ..
        }) => {
            assert_eq!(attempts, MAX_RETRY);
            assert_eq!(source.status().map(|s| s.as_u16()), Some(500));
        }
        other => panic!("expected exhausted retries, got {:?}", other),
    }
}

#[tokio::test]
async fn test_fetch_not_found_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gone"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(3);
    let fetcher = Fetcher::new(&config.fetch, &config.user_agent).unwrap();
    let result = fetcher.fetch_links(&format!("{}/gone", server.uri())).await;

    assert!(matches!(result, Err(FetchError::NotFound { .. })));
}

#[tokio::test]
async fn test_fetch_recovers_after_transient_failure() {
    let server = MockServer::start().await;

    // Mounted first, so it answers the first request before expiring
    Mock::given(method("GET"))
        .and(path("/recovering"))
        .respond_with(ResponseTemplate::new(502))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/recovering"))
        .respond_with(html_page(&["/next"]))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(3);
    let fetcher = Fetcher::new(&config.fetch, &config.user_agent).unwrap();
    let links = fetcher
        .fetch_links(&format!("{}/recovering", server.uri()))
        .await
        .unwrap();

    assert_eq!(links.len(), 1);
    assert!(links.contains("/next"));
}

#[tokio::test]
async fn test_non_html_response_has_no_links() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(r#"{"html": "<a href=\"/x\">x</a>"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(3);
    let fetcher = Fetcher::new(&config.fetch, &config.user_agent).unwrap();
    let links = fetcher
        .fetch_links(&format!("{}/data", server.uri()))
        .await
        .unwrap();

    assert!(links.is_empty());
}

#[tokio::test]
async fn test_requests_carry_user_agent() {
    let server = MockServer::start().await;
    let user_agent = UserAgentConfig::default().header_value();

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", user_agent.as_str()))
        .respond_with(html_page(&[]))
        .expect(1)
        .mount(&server)
        .await;

    let report = crawl(create_test_config(1), &server.uri()).await.unwrap();
    assert_eq!(report.crawled_count(), 1);
}

#[tokio::test]
async fn test_requests_are_paced() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/a", "/b", "/c"], 1).await;
    for route in ["/a", "/b", "/c"] {
        mount_page(&server, route, &[], 1).await;
    }

    let mut config = create_test_config(2);
    config.crawler.request_delay_ms = 50;

    let start = Instant::now();
    let report = crawl(config, &base).await.unwrap();

    assert_eq!(report.crawled_count(), 4);
    // Four requests need at least three full intervals
    assert!(start.elapsed() >= Duration::from_millis(140));
}

#[tokio::test]
async fn test_result_written_as_json() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(&server, "/", &["/about"], 1).await;
    mount_page(&server, "/about", &[], 1).await;

    let report = crawl(create_test_config(2), &base).await.unwrap();

    let temp_dir = tempfile::TempDir::new().unwrap();
    let output_path = temp_dir.path().join("output.json");
    JsonFileOutput::new(&output_path)
        .write(&report.output())
        .unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    let mut expected = serde_json::Map::new();
    expected.insert(base.clone(), serde_json::Value::Bool(true));
    expected.insert(format!("{}/about", base), serde_json::Value::Bool(true));
    assert_eq!(written, serde_json::json!({ "urls": expected }));

    let parsed: CrawlOutput = serde_json::from_value(written).unwrap();
    assert_eq!(parsed.len(), 2);
}
