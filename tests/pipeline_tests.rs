//! Integration tests for the discovery pipeline
//!
//! These tests use wiremock to stand in for the open-data portal and
//! exercise the full seed -> categories -> listings -> endpoints cycle
//! end to end.

use civic_scout::config::Config;
use civic_scout::output::EndpointStore;
use civic_scout::pipeline::{CategoryMap, Pipeline};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointed at a mock portal
fn create_test_config(data_dir: &TempDir) -> Config {
    let mut config = Config::default();
    // The mock portal serves relative browse links
    config.portal.browse_marker = "/browse".to_string();
    config.output.data_dir = data_dir.path().display().to_string();
    config.fetch.timeout_secs = 5;
    config.fetch.connect_timeout_secs = 2;
    config
}

/// Mounts a seed page with one category anchor
async fn mount_seed(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body>
                <a href="/browse?category=x">Housing</a>
                <a href="/about">About</a>
            </body></html>"#,
        ))
        .mount(server)
        .await;
}

/// Mounts a listing page with one result block
async fn mount_listing(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/browse"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="browse2-content">
                <div class="browse2-result" data-view-id="abcd-1234">
                    <a class="browse2-result-name-link" href="/dataset/housing/abcd-1234">Housing Units</a>
                </div>
            </div>"#,
        ))
        .mount(server)
        .await;
}

/// Mounts a detail page exposing one resource URL
async fn mount_detail(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/dataset/housing/abcd-1234"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<script>var meta = {"export": "https://host/resource/abcd-1234.json"};</script>"#,
        ))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_pipeline_end_to_end() {
    let server = MockServer::start().await;
    mount_seed(&server).await;
    mount_listing(&server).await;
    mount_detail(&server).await;

    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(create_test_config(&tmp)).expect("Failed to create pipeline");

    let report = pipeline
        .run(&format!("{}/search", server.uri()), "housing")
        .await
        .expect("Pipeline run failed");

    assert_eq!(report.categories_found, 1);
    assert_eq!(report.datasets_listed, 1);
    assert_eq!(report.endpoints_resolved, 1);
    assert_eq!(report.endpoints_unresolved, 0);
    assert_eq!(
        report.endpoints.get("abcd-1234").unwrap(),
        &vec!["https://host/resource/abcd-1234.json".to_string()]
    );

    // The on-disk contract downstream consumers depend on
    let record_path = tmp
        .path()
        .join("housing_data")
        .join("abcd-1234.json");
    assert!(record_path.exists());

    let store = EndpointStore::create(tmp.path(), "housing").unwrap();
    let record = store.read("abcd-1234").unwrap();
    assert_eq!(record.view_id, "abcd-1234");
    assert_eq!(
        record.detail_url,
        format!("{}/dataset/housing/abcd-1234", server.uri())
    );
    assert_eq!(
        record.resource_urls,
        vec!["https://host/resource/abcd-1234.json".to_string()]
    );
}

#[tokio::test]
async fn test_detail_page_500_omits_identifier_without_aborting() {
    let server = MockServer::start().await;
    mount_seed(&server).await;

    Mock::given(method("GET"))
        .and(path("/browse"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="browse2-content">
                <div class="browse2-result" data-view-id="dead-0001">
                    <a class="browse2-result-name-link" href="/dataset/dead-0001">Broken</a>
                </div>
                <div class="browse2-result" data-view-id="live-0001">
                    <a class="browse2-result-name-link" href="/dataset/live-0001">Working</a>
                </div>
            </div>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataset/dead-0001"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataset/live-0001"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("https://host/resource/live-0001.json"),
        )
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(create_test_config(&tmp)).unwrap();

    let report = pipeline
        .run(&format!("{}/search", server.uri()), "mixed")
        .await
        .expect("Run should complete despite the failing detail page");

    assert_eq!(report.datasets_listed, 2);
    assert_eq!(report.endpoints_resolved, 1);
    assert_eq!(report.endpoints_unresolved, 1);
    assert!(report.endpoints.contains_key("live-0001"));
    assert!(!report.endpoints.contains_key("dead-0001"));
}

#[tokio::test]
async fn test_missing_results_container_yields_empty_run() {
    let server = MockServer::start().await;
    mount_seed(&server).await;

    // Listing page with a drifted template: no results container
    Mock::given(method("GET"))
        .and(path("/browse"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><p>Redesigned page</p></body></html>"),
        )
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(create_test_config(&tmp)).unwrap();

    let report = pipeline
        .run(&format!("{}/search", server.uri()), "drift")
        .await
        .expect("Template drift must degrade, not fail");

    assert_eq!(report.datasets_listed, 0);
    assert!(report.endpoints.is_empty());
}

#[tokio::test]
async fn test_no_categories_falls_back_to_seed_listing() {
    let server = MockServer::start().await;

    // No categories anywhere; the seed itself is the listing page
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<div class="browse2-content">
                <div class="browse2-result" data-view-id="seed-0001">
                    <a class="browse2-result-name-link" href="/dataset/seed-0001">Direct</a>
                </div>
            </div>"#,
        ))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/dataset/seed-0001"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("https://host/resource/seed-0001.json"),
        )
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(create_test_config(&tmp)).unwrap();

    let report = pipeline
        .run(&format!("{}/search", server.uri()), "direct")
        .await
        .unwrap();

    assert_eq!(report.categories_found, 0);
    assert_eq!(report.endpoints_resolved, 1);
    assert!(report.endpoints.contains_key("seed-0001"));
}

#[tokio::test]
async fn test_caller_provided_category_map() {
    let server = MockServer::start().await;
    mount_listing(&server).await;
    mount_detail(&server).await;

    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(create_test_config(&tmp)).unwrap();

    let mut categories = CategoryMap::new();
    categories.insert(
        "Housing".to_string(),
        format!("{}/browse?category=x", server.uri()),
    );

    let report = pipeline
        .run_with_categories(&categories, "provided")
        .await
        .unwrap();

    assert_eq!(report.categories_found, 1);
    assert_eq!(report.endpoints_resolved, 1);
}

#[tokio::test]
async fn test_pipeline_is_idempotent_over_unchanged_fixtures() {
    let server = MockServer::start().await;
    mount_seed(&server).await;
    mount_listing(&server).await;
    mount_detail(&server).await;

    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(create_test_config(&tmp)).unwrap();
    let seed = format!("{}/search", server.uri());

    let first = pipeline.run(&seed, "twice").await.unwrap();
    let record_path = tmp.path().join("twice_data").join("abcd-1234.json");
    let first_bytes = std::fs::read(&record_path).unwrap();

    let second = pipeline.run(&seed, "twice").await.unwrap();
    let second_bytes = std::fs::read(&record_path).unwrap();

    assert_eq!(first.endpoints, second.endpoints);
    assert_eq!(first_bytes, second_bytes);
}

#[tokio::test]
async fn test_multiple_resource_urls_recorded_sorted() {
    let server = MockServer::start().await;
    mount_seed(&server).await;
    mount_listing(&server).await;

    Mock::given(method("GET"))
        .and(path("/dataset/housing/abcd-1234"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "https://host/resource/zz-dump.json https://host/resource/aa-rows.json",
        ))
        .mount(&server)
        .await;

    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(create_test_config(&tmp)).unwrap();

    let report = pipeline
        .run(&format!("{}/search", server.uri()), "multi")
        .await
        .unwrap();

    assert_eq!(
        report.endpoints.get("abcd-1234").unwrap(),
        &vec![
            "https://host/resource/aa-rows.json".to_string(),
            "https://host/resource/zz-dump.json".to_string(),
        ]
    );
}
