//! Integration tests for the download pipeline
//!
//! These tests use wiremock to serve a homepage and its links and check
//! the files written and the rows recorded for complete runs.

use std::path::Path;
use std::time::Duration;
use webclone::config::Config;
use webclone::crawler::{clone_site, Pipeline, Stage};
use webclone::storage::{MetricsStore, SqliteStorage};
use webclone::url::{link_file_name, target_name};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing snapshots under `root`
fn create_test_config(root: &Path) -> Config {
    let mut config = Config::default();
    config.fetcher.homepage_timeout_ms = 2_000;
    config.fetcher.probe_timeout_ms = 1_000;
    config.fetcher.download_timeout_ms = 1_000;
    config.output.download_root = root.to_string_lossy().into_owned();
    config
}

async fn mount_homepage(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_head(server: &MockServer, route: &str, status: u16) {
    Mock::given(method("HEAD"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

async fn mount_get(server: &MockServer, route: &str, template: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(server)
        .await;
}

fn file_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

#[tokio::test]
async fn test_end_to_end_mixed_links() {
    let server = MockServer::start().await;
    let base = server.uri();
    let homepage = format!(
        r#"<html><head><title>Home</title></head><body>
        <a href="{base}/ok">Ok</a>
        <a href="ftp://skip.com">Skip</a>
        <a href="{base}/down">Down</a>
        </body></html>"#
    );
    mount_homepage(&server, homepage.clone()).await;
    mount_head(&server, "/ok", 200).await;
    mount_head(&server, "/down", 404).await;
    mount_get(
        &server,
        "/ok",
        ResponseTemplate::new(200)
            .set_body_string("a".repeat(1024))
            .set_delay(Duration::from_millis(20)),
    )
    .await;

    let root = tempfile::tempdir().unwrap();
    let config = create_test_config(root.path());
    let storage = SqliteStorage::open_in_memory().unwrap();
    let mut pipeline = Pipeline::new(&config, storage).unwrap();

    let report = pipeline.run(&format!("{}/", base)).await.unwrap();

    assert_eq!(report.links_found, 3);
    assert_eq!(report.downloaded, 1);
    assert_eq!(report.skipped, 2);
    assert_eq!(report.failed, 0);

    let ok_url = format!("{}/ok", base);
    let down_url = format!("{}/down", base);
    let links = pipeline.store().get_links(report.run_id).unwrap();
    let urls: Vec<&str> = links.iter().map(|link| link.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![ok_url.as_str(), "ftp://skip.com", down_url.as_str()]
    );

    assert_eq!(links[0].kilobytes, 1);
    assert!(links[0].elapsed_ms >= 20);
    assert_eq!((links[1].elapsed_ms, links[1].kilobytes), (0, 0));
    assert_eq!((links[2].elapsed_ms, links[2].kilobytes), (0, 0));

    let run = pipeline.store().get_run(report.run_id).unwrap();
    assert_eq!(run.website_name, target_name(&base).unwrap());
    assert_eq!(run.total_elapsed_ms, links[0].elapsed_ms);
    assert_eq!(run.total_kilobytes, 1);
    assert!(run.finished_at.is_some());

    let dir = root.path().join(&report.target_name);
    assert_eq!(report.directory, dir);
    assert_eq!(
        std::fs::read_to_string(dir.join("index.html")).unwrap(),
        homepage
    );
    assert_eq!(
        std::fs::read(dir.join(link_file_name(&ok_url))).unwrap().len(),
        1024
    );
    assert_eq!(file_count(&dir), 2);
}

#[tokio::test]
async fn test_duplicate_links_recorded_once_in_first_occurrence_order() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_homepage(
        &server,
        format!(
            r#"<html><body>
            <a href="{base}/dup">1</a>
            <a href="mailto:team@example.com">2</a>
            <a href="/dup">3</a>
            <a href="{base}/dup">4</a>
            <a href="mailto:team@example.com">5</a>
            <a href="{base}/other">6</a>
            </body></html>"#
        ),
    )
    .await;
    mount_head(&server, "/dup", 200).await;
    mount_head(&server, "/other", 200).await;
    mount_get(&server, "/dup", ResponseTemplate::new(200).set_body_string("dup")).await;
    mount_get(&server, "/other", ResponseTemplate::new(200).set_body_string("other")).await;

    let root = tempfile::tempdir().unwrap();
    let config = create_test_config(root.path());
    let mut pipeline = Pipeline::new(&config, SqliteStorage::open_in_memory().unwrap()).unwrap();

    let report = pipeline.run(&base).await.unwrap();

    let links = pipeline.store().get_links(report.run_id).unwrap();
    let urls: Vec<String> = links.into_iter().map(|link| link.url).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/dup", base),
            "mailto:team@example.com".to_string(),
            format!("{}/other", base),
        ]
    );
    assert_eq!(report.links_found, 3);
    assert_eq!(report.downloaded, 2);

    // Each distinct URL is fetched once
    let dup_gets = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.method == wiremock::http::Method::Get)
        .filter(|request| request.url.path() == "/dup")
        .count();
    assert_eq!(dup_gets, 1);
}

#[tokio::test]
async fn test_bare_host_and_trailing_slash_are_distinct_links() {
    let server = MockServer::start().await;
    let base = server.uri();
    let homepage = format!(r#"<a href="{base}">Bare</a><a href="{base}/">Slash</a>"#);
    mount_homepage(&server, homepage).await;
    mount_head(&server, "/", 200).await;

    let root = tempfile::tempdir().unwrap();
    let config = create_test_config(root.path());
    let mut pipeline = Pipeline::new(&config, SqliteStorage::open_in_memory().unwrap()).unwrap();

    let report = pipeline.run(&base).await.unwrap();

    assert_eq!(report.links_found, 2);
    assert_eq!(report.downloaded, 2);

    let slash_url = format!("{}/", base);
    let links = pipeline.store().get_links(report.run_id).unwrap();
    let urls: Vec<&str> = links.iter().map(|link| link.url.as_str()).collect();
    assert_eq!(urls, vec![base.as_str(), slash_url.as_str()]);

    let host_file = format!("{}.html", target_name(&base).unwrap().replace(':', "_"));
    assert_eq!(link_file_name(&base), host_file);
    let dir = &report.directory;
    assert!(dir.join(&host_file).exists());
    assert!(dir.join(link_file_name(&slash_url)).exists());
    assert_eq!(file_count(dir), 3);
}

#[tokio::test]
async fn test_download_timeout_leaves_zero_metrics_and_continues() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_homepage(
        &server,
        format!(r#"<a href="{base}/slow">Slow</a><a href="{base}/after">After</a>"#),
    )
    .await;
    mount_head(&server, "/slow", 200).await;
    mount_head(&server, "/after", 200).await;
    mount_get(
        &server,
        "/slow",
        ResponseTemplate::new(200)
            .set_body_string("x".repeat(4096))
            .set_delay(Duration::from_secs(3)),
    )
    .await;
    mount_get(
        &server,
        "/after",
        ResponseTemplate::new(200).set_body_string("y".repeat(2048)),
    )
    .await;

    let root = tempfile::tempdir().unwrap();
    let mut config = create_test_config(root.path());
    config.fetcher.download_timeout_ms = 300;
    let mut pipeline = Pipeline::new(&config, SqliteStorage::open_in_memory().unwrap()).unwrap();

    let report = pipeline.run(&base).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.downloaded, 1);

    let links = pipeline.store().get_links(report.run_id).unwrap();
    assert_eq!((links[0].elapsed_ms, links[0].kilobytes), (0, 0));
    assert_eq!(links[1].kilobytes, 2);

    let dir = root.path().join(&report.target_name);
    assert!(!dir.join(link_file_name(&format!("{}/slow", base))).exists());
    assert!(dir.join(link_file_name(&format!("{}/after", base))).exists());

    let run = pipeline.store().get_run(report.run_id).unwrap();
    assert_eq!(run.total_kilobytes, 2);
}

#[tokio::test]
async fn test_error_status_download_leaves_zero_metrics() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_homepage(&server, format!(r#"<a href="{base}/flaky">Flaky</a>"#)).await;
    mount_head(&server, "/flaky", 200).await;
    mount_get(&server, "/flaky", ResponseTemplate::new(500)).await;

    let root = tempfile::tempdir().unwrap();
    let config = create_test_config(root.path());
    let mut pipeline = Pipeline::new(&config, SqliteStorage::open_in_memory().unwrap()).unwrap();

    let report = pipeline.run(&base).await.unwrap();

    assert_eq!(report.failed, 1);
    let links = pipeline.store().get_links(report.run_id).unwrap();
    assert_eq!((links[0].elapsed_ms, links[0].kilobytes), (0, 0));
}

#[tokio::test]
async fn test_write_failure_keeps_measured_metrics() {
    let server = MockServer::start().await;
    let base = server.uri();
    let page_url = format!("{}/page", base);
    mount_homepage(&server, format!(r#"<a href="{page_url}">Page</a>"#)).await;
    mount_head(&server, "/page", 200).await;
    mount_get(
        &server,
        "/page",
        ResponseTemplate::new(200).set_body_string("z".repeat(3000)),
    )
    .await;

    let root = tempfile::tempdir().unwrap();
    let dir = root.path().join(target_name(&base).unwrap());
    // A directory where the file should go makes the write fail
    std::fs::create_dir_all(dir.join(link_file_name(&page_url))).unwrap();

    let config = create_test_config(root.path());
    let mut pipeline = Pipeline::new(&config, SqliteStorage::open_in_memory().unwrap()).unwrap();

    let report = pipeline.run(&base).await.unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.downloaded, 0);
    let links = pipeline.store().get_links(report.run_id).unwrap();
    assert_eq!(links[0].kilobytes, 2);
    let run = pipeline.store().get_run(report.run_id).unwrap();
    assert_eq!(run.total_kilobytes, 2);
}

#[tokio::test]
async fn test_homepage_without_links_finalizes_to_zero() {
    let server = MockServer::start().await;
    mount_homepage(
        &server,
        format!("<html><body>{}</body></html>", "p".repeat(5000)),
    )
    .await;

    let root = tempfile::tempdir().unwrap();
    let config = create_test_config(root.path());
    let mut pipeline = Pipeline::new(&config, SqliteStorage::open_in_memory().unwrap()).unwrap();

    let report = pipeline.run(&server.uri()).await.unwrap();

    assert_eq!(report.links_found, 0);
    let run = pipeline.store().get_run(report.run_id).unwrap();
    // The homepage's own provisional totals are replaced by the empty sum
    assert_eq!(run.total_elapsed_ms, 0);
    assert_eq!(run.total_kilobytes, 0);
    assert!(root
        .path()
        .join(&report.target_name)
        .join("index.html")
        .exists());
}

#[tokio::test]
async fn test_homepage_failure_abandons_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let root = tempfile::tempdir().unwrap();
    let config = create_test_config(root.path());
    let mut pipeline = Pipeline::new(&config, SqliteStorage::open_in_memory().unwrap()).unwrap();

    let failure = pipeline.run(&server.uri()).await.unwrap_err();

    assert_eq!(failure.stage, Stage::FetchHomepage);
    assert_eq!(failure.run_id, None);
    assert!(pipeline.store().list_runs().unwrap().is_empty());
    assert_eq!(file_count(root.path()), 0);
}

#[tokio::test]
async fn test_clone_site_with_file_database() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_homepage(&server, format!(r#"<a href="{base}/a">A</a>"#)).await;
    mount_head(&server, "/a", 200).await;
    mount_get(&server, "/a", ResponseTemplate::new(200).set_body_string("a")).await;

    let root = tempfile::tempdir().unwrap();
    let db_path = root.path().join("webclone.db");
    let config = create_test_config(root.path());

    let storage = SqliteStorage::new(&db_path).unwrap();
    let report = clone_site(&config, storage, &format!("  {}  ", base))
        .await
        .unwrap();

    let reopened = SqliteStorage::new(&db_path).unwrap();
    let runs = reopened.list_runs().unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].id, report.run_id);
    assert_eq!(reopened.get_links(report.run_id).unwrap().len(), 1);
}
