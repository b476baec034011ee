//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use kaleido_crawl::config::Config;
use kaleido_crawl::crawler::{run_crawl, Coordinator};
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at the mock server
fn create_test_config(server: &MockServer, download_root: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.max_requests_per_second = 1000.0;
    config.output.download_root = download_root.display().to_string();
    config.logging.log_all_explored = false;
    config.geo.enabled = true;
    config.geo.endpoint = server.uri();
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.contact_url = "https://example.com/contact".to_string();
    config.user_agent.contact_email = "test@example.com".to_string();
    config
}

/// Mounts robots.txt and the geolocation endpoint for 127.0.0.1
async fn mount_site(server: &MockServer, robots: &str) {
    mount_robots(
        server,
        ResponseTemplate::new(200).set_body_string(robots.to_string()),
    )
    .await;
    mount_geo(server).await;
}

async fn mount_robots(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(response)
        .mount(server)
        .await;
}

async fn mount_geo(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/127.0.0.1/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"ip": "127.0.0.1", "country": "US"}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(server)
        .await;
}

/// Mounts an HTML page answering both HEAD and GET
async fn mount_page(server: &MockServer, page_path: &str, title: &str, links: &[&str]) {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">{}</a>"#, l, l))
        .collect();
    let body = format!(
        "<html><head><title>{}</title></head><body>{}</body></html>",
        title, anchors
    );

    Mock::given(method("HEAD"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn saved_files(folder: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(folder)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_full_crawl_single_site() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();
    let base = server.uri();

    mount_site(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/", "Home", &["/page1", "page2", "/", "#top"]).await;
    mount_page(&server, "/page1", "Page 1", &[]).await;
    mount_page(&server, "/page2", "Page 2", &["/page1"]).await;

    let config = create_test_config(&server, downloads.path());
    let summary = run_crawl(config, vec![format!("{}/", base)]).await.unwrap();

    assert_eq!(summary.pages_sampled, 3);
    assert_eq!(summary.pages_explored, 3);
    assert_eq!(summary.countries, vec![("US".to_string(), 3)]);
    assert_eq!(summary.unique_domains, 1);

    assert_eq!(
        saved_files(&downloads.path().join("0")),
        vec!["Home", "Page1", "Page2"]
    );
}

#[tokio::test]
async fn test_robots_disallowed_page_never_fetched() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    mount_site(&server, "User-agent: *\nDisallow: /admin").await;
    mount_page(&server, "/", "Home", &["/admin", "/public"]).await;
    mount_page(&server, "/public", "Public", &[]).await;

    Mock::given(method("HEAD"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin"))
        .respond_with(ResponseTemplate::new(200).set_body_string("secret"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, downloads.path());
    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    assert_eq!(summary.pages_sampled, 2);
    assert_eq!(summary.urls_blacklisted, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_rate_limited_seed_is_blacklisted_and_never_refetched() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();
    let base = server.uri();

    mount_site(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/", "Home", &["/limited", "/other"]).await;
    mount_page(&server, "/other", "Other", &["/limited"]).await;

    Mock::given(method("HEAD"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    let config = create_test_config(&server, downloads.path());
    let seeds = vec![format!("{}/limited", base), format!("{}/", base)];

    let mut coordinator = Coordinator::new(config, seeds).unwrap();
    coordinator.run().await.unwrap();

    let limited = format!("{}/limited", base);
    assert!(coordinator.state().tracker.is_blacklisted(&limited));
    assert_eq!(coordinator.state().stats.pages_sampled, 2);

    let summary = coordinator.finalize().unwrap();
    assert_eq!(summary.urls_blacklisted, 1);
    server.verify().await;
}

#[tokio::test]
async fn test_unsupported_content_type_skipped() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    mount_site(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/", "Home", &["/report.pdf"]).await;

    Mock::given(method("HEAD"))
        .and(path("/report.pdf"))
        .respond_with(
            ResponseTemplate::new(200).insert_header("content-type", "application/pdf"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, downloads.path());
    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    assert_eq!(summary.pages_sampled, 1);
    assert_eq!(summary.pages_explored, 2);
    // A policy rejection does not blacklist
    assert_eq!(summary.urls_blacklisted, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_domain_cap_stops_same_domain_children() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    mount_site(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/", "Home", &["/a", "/b"]).await;

    for page in ["/a", "/b"] {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
    }

    let mut config = create_test_config(&server, downloads.path());
    config.crawler.max_pages_per_domain = 1;

    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    assert_eq!(summary.pages_sampled, 1);
    assert_eq!(summary.pages_explored, 3);
    server.verify().await;
}

#[tokio::test]
async fn test_page_without_title_is_not_stored() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    mount_site(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"<html><body><a href="/child">child</a></body></html>"#)
                .insert_header("content-type", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("HEAD"))
        .and(path("/child"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, downloads.path());
    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    assert_eq!(summary.pages_sampled, 0);
    assert!(summary.languages.is_empty());
    assert!(!downloads.path().join("0").exists());
    server.verify().await;
}

#[tokio::test]
async fn test_markdown_summary_written() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();
    let reports = TempDir::new().unwrap();
    let summary_path = reports.path().join("summary.md");

    mount_site(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/", "Home", &[]).await;

    let mut config = create_test_config(&server, downloads.path());
    config.output.summary_path = Some(summary_path.display().to_string());

    run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    let report = std::fs::read_to_string(&summary_path).unwrap();
    assert!(report.contains("- **Pages Sampled**: 1"));
    assert!(report.contains("| US | 1 |"));
}

#[tokio::test]
async fn test_unwritable_download_root_is_fatal() {
    let server = MockServer::start().await;
    let scratch = TempDir::new().unwrap();

    // A regular file where the download root should be
    let blocker = scratch.path().join("blocker");
    std::fs::write(&blocker, b"").unwrap();

    mount_site(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/", "Home", &["/next"]).await;
    mount_page(&server, "/next", "Next", &[]).await;

    let config = create_test_config(&server, &blocker);
    let result = run_crawl(config, vec![format!("{}/", server.uri())]).await;

    assert!(matches!(
        result,
        Err(kaleido_crawl::KaleidoError::Storage(ref e)) if e.is_fatal()
    ));
}

/// Mounts a page whose GET must never be issued
async fn mount_unreachable_page(server: &MockServer, page_path: &str) {
    Mock::given(method("HEAD"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>Never</title>"))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_robots_server_error_denies() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    mount_robots(&server, ResponseTemplate::new(500)).await;
    mount_geo(&server).await;
    mount_unreachable_page(&server, "/").await;

    let config = create_test_config(&server, downloads.path());
    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    assert_eq!(summary.pages_explored, 1);
    assert_eq!(summary.pages_sampled, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_robots_timeout_denies() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    // Answers only after the robots.txt request has given up
    mount_robots(
        &server,
        ResponseTemplate::new(200)
            .set_body_string("User-agent: *\nAllow: /")
            .set_delay(Duration::from_secs(5)),
    )
    .await;
    mount_geo(&server).await;
    mount_unreachable_page(&server, "/").await;

    let config = create_test_config(&server, downloads.path());
    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    assert_eq!(summary.pages_sampled, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_rate_limited_head_request_blacklists() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();
    let limited = format!("{}/limited", server.uri());

    mount_site(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("HEAD"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/limited"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, downloads.path());
    let mut coordinator = Coordinator::new(config, vec![limited.clone()]).unwrap();
    coordinator.run().await.unwrap();

    assert!(coordinator.state().tracker.is_blacklisted(&limited));
    assert_eq!(coordinator.state().stats.pages_explored, 1);
    assert_eq!(coordinator.state().stats.pages_sampled, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_missing_content_type_rejected() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    mount_site(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = create_test_config(&server, downloads.path());
    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    assert_eq!(summary.pages_explored, 1);
    assert_eq!(summary.pages_sampled, 0);
    assert_eq!(summary.urls_blacklisted, 0);
    server.verify().await;
}

#[tokio::test]
async fn test_seed_page_budget_processes_seed_plus_one() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    mount_site(&server, "User-agent: *\nAllow: /").await;
    mount_page(&server, "/", "Home", &["/a", "/b", "/c"]).await;
    for (page, title) in [("/a", "A"), ("/b", "B"), ("/c", "C")] {
        mount_page(&server, page, title, &[]).await;
    }

    let mut config = create_test_config(&server, downloads.path());
    config.crawler.max_pages_per_seed = 1;

    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    // Every child is gated and scored, but only one is processed
    assert_eq!(summary.pages_explored, 4);
    assert_eq!(summary.pages_sampled, 2);
    assert_eq!(saved_files(&downloads.path().join("0")).len(), 2);
}

#[tokio::test]
async fn test_seed_time_budget_stops_draining() {
    let server = MockServer::start().await;
    let downloads = TempDir::new().unwrap();

    mount_site(&server, "User-agent: *\nAllow: /").await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).insert_header("content-type", "text/html"))
        .mount(&server)
        .await;

    // The scoring fetch alone outlasts the budget, so the seed is never processed
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><head><title>Slow</title></head></html>")
                .insert_header("content-type", "text/html")
                .set_delay(Duration::from_millis(1500)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let mut config = create_test_config(&server, downloads.path());
    config.crawler.seed_time_budget_secs = 1;

    let summary = run_crawl(config, vec![format!("{}/", server.uri())])
        .await
        .unwrap();

    assert_eq!(summary.pages_explored, 1);
    assert_eq!(summary.pages_sampled, 0);
    server.verify().await;
}
