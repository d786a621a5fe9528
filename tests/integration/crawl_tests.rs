//! Integration tests for the harvester
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full fetch, parse and sink cycle end-to-end.

use page_harvest::config::{Config, CrawlerConfig};
use page_harvest::crawler::{crawl, Harvester, Termination};
use page_harvest::output::{harvest_into, CsvSink};
use page_harvest::Record;
use std::time::{Duration, Instant};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration starting at the given URL
fn create_test_config(start_url: String) -> Config {
    Config {
        crawler: CrawlerConfig {
            start_url,
            timeout_secs: 2,
        },
        ..Config::default()
    }
}

/// Builds a listing page with `count` products named `{prefix} {i}`
fn listing(prefix: &str, count: usize, next: Option<&str>) -> String {
    let mut body = String::from("<html><head><title>Catalogue</title></head><body><ol class=\"row\">");
    for i in 1..=count {
        body.push_str(&format!(
            r#"<li><article class="product_pod">
                <h3><a href="item-{prefix}-{i}/index.html" title="{prefix} {i}">{prefix} {i}...</a></h3>
                <div class="product_price">
                    <p class="price_color">£{i}.99</p>
                    <p class="instock availability"><i class="icon-ok"></i> In stock </p>
                </div>
            </article></li>"#
        ));
    }
    body.push_str("</ol>");
    if let Some(next) = next {
        body.push_str(&format!(
            r#"<ul class="pager"><li class="next"><a href="{next}">next</a></li></ul>"#
        ));
    }
    body.push_str("</body></html>");
    body
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .expect(1)
        .mount(server)
        .await;
}

async fn collect_all(config: &Config) -> (Vec<Record>, Option<Termination>) {
    let mut run = crawl(config).expect("Failed to start crawl");
    let mut records = Vec::new();
    while let Some(record) = run.next_record().await {
        records.push(record);
    }
    (records, run.termination().cloned())
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .expect("Request recording disabled")
        .len()
}

#[tokio::test]
async fn test_two_page_catalogue() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/catalogue/page-1.html",
        listing("first", 20, Some("page-2.html")),
    )
    .await;
    mount_page(&mock_server, "/catalogue/page-2.html", listing("second", 4, None)).await;

    let config = create_test_config(format!("{}/catalogue/page-1.html", base_url));
    let (records, termination) = collect_all(&config).await;

    assert_eq!(records.len(), 24);
    assert_eq!(records[0].title, "first 1");
    assert_eq!(records[0].price, "£1.99");
    assert_eq!(records[0].availability, "In stock");
    assert_eq!(
        records[0].url,
        format!("{}/catalogue/item-first-1/index.html", base_url)
    );
    assert_eq!(records[19].title, "first 20");
    assert_eq!(records[20].title, "second 1");
    assert_eq!(records[23].title, "second 4");

    assert_eq!(termination, Some(Termination::LastPage));
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_server_error_stops_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/page-1.html", listing("a", 3, Some("/page-2.html"))).await;
    mount_page(&mock_server, "/page-2.html", listing("b", 2, Some("/page-3.html"))).await;
    Mock::given(method("GET"))
        .and(path("/page-3.html"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/page-4.html"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing("d", 1, None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/page-1.html", base_url));
    let (records, termination) = collect_all(&config).await;

    assert_eq!(records.len(), 5);
    assert_eq!(records[4].title, "b 2");
    assert_eq!(
        termination,
        Some(Termination::FetchFailed {
            url: Url::parse(&format!("{}/page-3.html", base_url)).unwrap(),
            reason: "HTTP 500".to_string(),
        })
    );
}

#[tokio::test]
async fn test_slow_page_times_out_and_stops_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/page-1.html", listing("t", 2, Some("page-2.html"))).await;
    Mock::given(method("GET"))
        .and(path("/page-2.html"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(listing("late", 1, None))
                .set_delay(Duration::from_secs(4)),
        )
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(format!("{}/page-1.html", base_url));
    config.crawler.timeout_secs = 1;

    let started = Instant::now();
    let (records, termination) = collect_all(&config).await;
    let elapsed = started.elapsed();

    assert_eq!(records.len(), 2);
    assert_eq!(
        termination,
        Some(Termination::FetchFailed {
            url: Url::parse(&format!("{}/page-2.html", base_url)).unwrap(),
            reason: "Request timeout".to_string(),
        })
    );
    assert!(
        elapsed < Duration::from_secs(4),
        "Timeout did not bound the fetch: {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_not_found_start_page_yields_nothing() {
    let mock_server = MockServer::start().await;

    let config = create_test_config(format!("{}/missing.html", mock_server.uri()));
    let (records, termination) = collect_all(&config).await;

    assert!(records.is_empty());
    assert!(termination.unwrap().is_failure());
}

#[tokio::test]
async fn test_cyclic_pagination_terminates() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/a.html", listing("a", 1, Some("b.html"))).await;
    mount_page(&mock_server, "/b.html", listing("b", 1, Some("a.html"))).await;

    let config = create_test_config(format!("{}/a.html", base_url));
    let (records, termination) = collect_all(&config).await;

    assert_eq!(records.len(), 2);
    assert!(matches!(termination, Some(Termination::Cycle { .. })));
    assert_eq!(request_count(&mock_server).await, 2);
}

#[tokio::test]
async fn test_self_referencing_next_link() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/only.html", listing("x", 2, Some("only.html"))).await;

    let config = create_test_config(format!("{}/only.html", base_url));
    let (records, termination) = collect_all(&config).await;

    assert_eq!(records.len(), 2);
    assert_eq!(termination, Some(Termination::SelfLoop));
}

#[tokio::test]
async fn test_harvest_into_csv_file() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/page-1.html", listing("p", 2, Some("page-2.html"))).await;
    mount_page(&mock_server, "/page-2.html", listing("q", 1, None)).await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let csv_path = dir.path().join("products.csv");

    let config = create_test_config(format!("{}/page-1.html", base_url));
    let harvester = Harvester::from_config(&config).expect("Failed to build harvester");
    let mut run = harvester.crawl(Url::parse(&config.crawler.start_url).unwrap());
    let mut sink = CsvSink::create(&csv_path).expect("Failed to create CSV");

    let summary = harvest_into(&mut run, &mut sink).await.expect("Harvest failed");
    drop(sink);

    assert_eq!(summary.pages_fetched, 2);
    assert_eq!(summary.records_written, 3);
    assert!(summary.is_complete());

    let content = std::fs::read_to_string(&csv_path).expect("Failed to read CSV");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "title,price,availability,url");
    assert_eq!(
        lines[1],
        format!("p 1,£1.99,In stock,{}/item-p-1/index.html", base_url)
    );
    assert_eq!(
        lines[3],
        format!("q 1,£1.99,In stock,{}/item-q-1/index.html", base_url)
    );
}

#[tokio::test]
async fn test_memory_sink_stops_on_failure_with_partial_output() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/page-1.html", listing("m", 3, Some("page-2.html"))).await;
    Mock::given(method("GET"))
        .and(path("/page-2.html"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let config = create_test_config(format!("{}/page-1.html", base_url));
    let mut run = crawl(&config).expect("Failed to start crawl");
    let mut sink: Vec<Record> = Vec::new();

    let summary = harvest_into(&mut run, &mut sink).await.expect("Harvest failed");

    assert_eq!(sink.len(), 3);
    assert_eq!(summary.records_written, 3);
    assert_eq!(summary.pages_fetched, 1);
    assert!(!summary.is_complete());
}
