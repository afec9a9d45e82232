//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use webcrawler::config::{load_config_with_hash, Config};
use webcrawler::crawler::CrawlJob;
use webcrawler::output::read_results;
use webcrawler::{run_crawl, CrawlError, CrawlResult};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration writing into `output_dir`
fn create_test_config(seeds: &str, max_depth: u32, format: &str, output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawl.initial_uris = seeds.to_string();
    config.crawl.max_depth = max_depth;
    config.crawl.output_format = format.to_string();
    config.crawl.output_path = output_dir.display().to_string();
    config.crawl.max_concurrent_tasks = 4;
    config.crawl.politeness_delay_ms = 0;
    config.crawl.idle_poll_ms = 25;
    config.infrastructure.backoff_unit_ms = 1;
    config.infrastructure.user_agent = "TestBot/1.0".to_string();
    config
}

fn html(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|l| format!("<a href=\"{}\">link</a>\n", l))
        .collect();
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", anchors),
        "text/html; charset=utf-8",
    )
}

async fn mount_page(server: &MockServer, page: &str, links: &[&str]) {
    Mock::given(method("GET"))
        .and(path(page))
        .respond_with(html(links))
        .mount(server)
        .await;
}

/// Runs a job and returns its results file along with the outcome
async fn crawl(config: Config) -> (std::path::PathBuf, webcrawler::Result<webcrawler::CrawlSummary>) {
    let job = CrawlJob::new(config).expect("Failed to build job");
    let output = job.output_file().to_path_buf();
    let outcome = job.run(CancellationToken::new()).await;
    (output, outcome)
}

fn paths(results: &[CrawlResult]) -> HashSet<String> {
    results.iter().map(|r| r.uri.path().to_string()).collect()
}

#[tokio::test]
async fn test_max_depth_zero_records_only_the_seed() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/a", "/b"]).await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(&[]))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (output, outcome) = crawl(create_test_config(&server.uri(), 0, "json", dir.path())).await;
    let summary = outcome.unwrap();

    let results = read_results(&output).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].depth, 0);
    assert!(results[0].parent_uri.is_none());
    assert_eq!(results[0].links.len(), 2);
    assert_eq!(summary.completed, 1);
    assert_eq!(summary.depth_limited, 2);
}

#[tokio::test]
async fn test_multi_level_same_host_crawl() {
    let server = MockServer::start().await;
    let base = server.uri();
    let absolute_b = format!("{}/b", base);

    mount_page(&server, "/", &["/a", absolute_b.as_str(), "#top", "mailto:me@example.com"]).await;
    mount_page(&server, "/a", &["/a/deep", "/b", "/"]).await;
    mount_page(&server, "/b", &["/a"]).await;
    mount_page(&server, "/a/deep", &["/a/deeper"]).await;
    Mock::given(method("GET"))
        .and(path("/a/deeper"))
        .respond_with(html(&[]))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (output, outcome) = crawl(create_test_config(&base, 2, "json", dir.path())).await;
    let summary = outcome.unwrap();

    let results = read_results(&output).unwrap();
    assert_eq!(
        paths(&results),
        ["/", "/a", "/b", "/a/deep"].iter().map(|s| s.to_string()).collect()
    );
    assert_eq!(summary.completed, 4);
    assert_eq!(summary.depth_limited, 1);

    for result in &results {
        let expected_depth = match result.uri.path() {
            "/" => 0,
            "/a" | "/b" => 1,
            _ => 2,
        };
        assert_eq!(result.depth, expected_depth, "{}", result.uri);
    }

    let deep = results.iter().find(|r| r.uri.path() == "/a/deep").unwrap();
    assert_eq!(deep.parent_uri.as_ref().map(|u| u.path()), Some("/a"));

    // Every page is fetched exactly once.
    let requests = server.received_requests().await.unwrap();
    let requested: Vec<_> = requests.iter().map(|r| r.url.path().to_string()).collect();
    let unique: HashSet<_> = requested.iter().cloned().collect();
    assert_eq!(requested.len(), unique.len());
}

#[tokio::test]
async fn test_foreign_links_are_not_followed() {
    let server = MockServer::start().await;
    let foreign = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html(&[]))
        .expect(0)
        .mount(&foreign)
        .await;

    // Same port space, different host name.
    let foreign_link = foreign.uri().replace("127.0.0.1", "localhost") + "/elsewhere";
    mount_page(&server, "/", &[foreign_link.as_str(), "http://other.invalid/x", "/local"]).await;
    mount_page(&server, "/local", &[]).await;

    let dir = tempfile::tempdir().unwrap();
    let (output, outcome) = crawl(create_test_config(&server.uri(), 3, "json", dir.path())).await;
    outcome.unwrap();

    let results = read_results(&output).unwrap();
    assert_eq!(paths(&results), ["/", "/local"].iter().map(|s| s.to_string()).collect());
    let seed = results.iter().find(|r| r.depth == 0).unwrap();
    assert_eq!(seed.links.len(), 1);
}

#[tokio::test]
async fn test_csv_output() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/one", "/two"]).await;
    mount_page(&server, "/one", &[]).await;
    mount_page(&server, "/two", &[]).await;

    let dir = tempfile::tempdir().unwrap();
    let (output, outcome) = crawl(create_test_config(&server.uri(), 1, "csv", dir.path())).await;
    outcome.unwrap();

    assert_eq!(output.extension().and_then(|e| e.to_str()), Some("csv"));

    let mut reader = csv::Reader::from_path(&output).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, ["Uri", "ParentUri", "Links", "CrawlTime", "DepthLevel"]);

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 3);

    let seed = rows.iter().find(|r| &r[4] == "0").unwrap();
    assert_eq!(&seed[1], "");
    assert_eq!(seed[2].split(',').count(), 2);
    assert!(rows.iter().filter(|r| &r[4] == "1").all(|r| r[1] == seed[0]));
}

#[tokio::test]
async fn test_server_errors_are_retried_then_fail_the_task() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(&server.uri(), 2, "json", dir.path());
    config.infrastructure.retry_count = 3;

    let (output, outcome) = crawl(config).await;
    let summary = outcome.unwrap();

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.completed, 0);
    assert!(!output.exists());
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_non_html_pages_are_not_expanded() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/data.txt", "/page"]).await;
    mount_page(&server, "/page", &[]).await;
    Mock::given(method("GET"))
        .and(path("/data.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<a href=\"/hidden\">x</a>", "text/plain"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let (output, outcome) = crawl(create_test_config(&server.uri(), 3, "json", dir.path())).await;
    let summary = outcome.unwrap();

    let results = read_results(&output).unwrap();
    assert_eq!(paths(&results), ["/", "/page"].iter().map(|s| s.to_string()).collect());
    assert_eq!(summary.failed, 1);
}

#[tokio::test]
async fn test_no_valid_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config("not-a-uri, ftp://example.com/", 1, "json", dir.path());

    let err = run_crawl(config, CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, CrawlError::NoValidSeeds));
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_cancellation_stops_the_job() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&["/next"]).set_delay(Duration::from_secs(30)))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let job = CrawlJob::new(create_test_config(&server.uri(), 2, "json", dir.path())).unwrap();
    let output = job.output_file().to_path_buf();

    let cancel = CancellationToken::new();
    let handle = tokio::spawn(job.run(cancel.clone()));

    tokio::time::sleep(Duration::from_millis(200)).await;
    cancel.cancel();

    let summary = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("cancelled job should stop promptly")
        .unwrap()
        .unwrap();

    assert_eq!(summary.completed, 0);
    assert_eq!(summary.failed, 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_crawl_from_config_file() {
    let server = MockServer::start().await;
    mount_page(&server, "/", &["/about"]).await;
    mount_page(&server, "/about", &[]).await;

    let dir = tempfile::tempdir().unwrap();
    let output_dir = dir.path().join("results");
    let config_path = dir.path().join("crawler.toml");
    std::fs::write(
        &config_path,
        format!(
            r#"
[crawl]
initial-uris = "{}"
max-depth = 1
output-format = "json"
output-path = "{}"
politeness-delay-ms = 0
idle-poll-ms = 25

[infrastructure]
retry-count = 2
backoff-unit-ms = 1
"#,
            server.uri(),
            output_dir.display()
        ),
    )
    .unwrap();

    let (config, _) = load_config_with_hash(&config_path).unwrap();
    let summary = run_crawl(config, CancellationToken::new()).await.unwrap();
    assert_eq!(summary.completed, 2);

    let files: Vec<_> = std::fs::read_dir(&output_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    assert_eq!(read_results(&files[0]).unwrap().len(), 2);
}
