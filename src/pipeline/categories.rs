//! Category discovery stage
//!
//! Turns a seed search/category URL into a mapping of human-readable
//! category names to category-browse URLs.

use crate::config::PortalConfig;
use crate::extract::extract_anchors;
use crate::pipeline::FetchClient;
use std::collections::BTreeMap;
use url::Url;

/// Mapping from category display name to category-browse URL
///
/// Keys are deduplicated by last-write-wins on name collision.
pub type CategoryMap = BTreeMap<String, String>;

/// Discovers category-browse links on the seed page
///
/// Fetches the seed URL once, extracts every anchor in the document, and
/// keeps those whose target contains the portal's browse-path marker.
/// Relative targets are resolved against the seed URL so the resulting map
/// values are fetchable by the listing stage.
///
/// On fetch failure returns an empty map and logs; a stage never aborts
/// the run. Only the first page of results is considered.
///
/// # Arguments
///
/// * `client` - The fetch client
/// * `seed_url` - The search/category query URL to start from
/// * `portal` - Portal page-structure configuration
pub async fn discover_categories(
    client: &FetchClient,
    seed_url: &str,
    portal: &PortalConfig,
) -> CategoryMap {
    let body = match client.get(seed_url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Category discovery fetch failed: {}", e);
            return CategoryMap::new();
        }
    };

    let base = Url::parse(seed_url).ok();
    let mut categories = CategoryMap::new();

    for record in extract_anchors(&body) {
        if !record.href.contains(&portal.browse_marker) {
            continue;
        }

        let target = match &base {
            Some(base) => base
                .join(&record.href)
                .map(|u| u.to_string())
                .unwrap_or(record.href),
            None => record.href,
        };

        categories.insert(record.name, target);
    }

    tracing::info!("Discovered {} categories from {}", categories.len(), seed_url);
    categories
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetchConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_portal(marker: &str) -> PortalConfig {
        PortalConfig {
            browse_marker: marker.to_string(),
            ..PortalConfig::default()
        }
    }

    fn test_client() -> FetchClient {
        FetchClient::new(&FetchConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_discover_filters_by_browse_marker() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<html><body>
                    <a href="/browse?category=Housing">Housing</a>
                    <a href="/about">About this portal</a>
                </body></html>"#,
            ))
            .mount(&server)
            .await;

        let categories = discover_categories(
            &test_client(),
            &format!("{}/search", server.uri()),
            &test_portal("/browse"),
        )
        .await;

        assert_eq!(categories.len(), 1);
        assert_eq!(
            categories.get("Housing").unwrap(),
            &format!("{}/browse?category=Housing", server.uri())
        );
    }

    #[tokio::test]
    async fn test_discover_last_write_wins_on_name_collision() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<a href="/browse?category=old">Transit</a>
                   <a href="/browse?category=new">Transit</a>"#,
            ))
            .mount(&server)
            .await;

        let categories = discover_categories(
            &test_client(),
            &format!("{}/search", server.uri()),
            &test_portal("/browse"),
        )
        .await;

        assert_eq!(categories.len(), 1);
        assert!(categories.get("Transit").unwrap().ends_with("category=new"));
    }

    #[tokio::test]
    async fn test_discover_empty_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let categories = discover_categories(
            &test_client(),
            &format!("{}/search", server.uri()),
            &test_portal("/browse"),
        )
        .await;

        assert!(categories.is_empty());
    }

    #[tokio::test]
    async fn test_discover_empty_on_no_matching_anchors() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"<a href="/contact">Contact</a>"#),
            )
            .mount(&server)
            .await;

        let categories = discover_categories(
            &test_client(),
            &format!("{}/search", server.uri()),
            &test_portal("/browse"),
        )
        .await;

        assert!(categories.is_empty());
    }
}
