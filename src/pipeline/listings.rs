//! Dataset listing stage
//!
//! Turns a category/search URL into an ordered sequence of dataset
//! entries (view id + detail-page URL).

use crate::config::PortalConfig;
use crate::extract::{extract_result_blocks, DatasetEntry};
use crate::pipeline::FetchClient;
use url::Url;

/// Lists the datasets on a category or search-results page
///
/// Fetches the page once and parses the results-container scope. A block
/// missing its view-id attribute or detail link is skipped without
/// affecting the rest of the page. Entries follow document order; no
/// dedup happens here because identifiers are already portal-unique
/// within a page.
///
/// On fetch failure, on an unparseable listing URL, or when the results
/// container is absent (page template drift), returns an empty sequence
/// and logs - partial results are preferred over hard failure.
///
/// # Arguments
///
/// * `client` - The fetch client
/// * `listing_url` - The category/search URL to list
/// * `portal` - Portal page-structure configuration
pub async fn list_datasets(
    client: &FetchClient,
    listing_url: &str,
    portal: &PortalConfig,
) -> Vec<DatasetEntry> {
    let body = match client.get(listing_url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("Dataset listing fetch failed: {}", e);
            return Vec::new();
        }
    };

    let base = match Url::parse(listing_url) {
        Ok(base) => base,
        Err(e) => {
            tracing::error!("Unparseable listing URL {}: {}", listing_url, e);
            return Vec::new();
        }
    };

    match extract_result_blocks(&body, portal, &base) {
        Some(entries) => {
            tracing::info!("Listed {} datasets from {}", entries.len(), listing_url);
            entries
        }
        None => {
            tracing::warn!(
                "Results container '.{}' not found on {}",
                portal.results_container,
                listing_url
            );
            Vec::new()
        }
    }
}
