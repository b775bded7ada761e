//! Link and result-block extraction from portal HTML
//!
//! This module handles parsing portal pages to extract:
//! - Anchor records (display name + target) from a whole document
//! - Dataset entries (view id + detail URL) from a listing page's
//!   results container

use crate::config::PortalConfig;
use scraper::{Html, Selector};
use url::Url;

/// A single anchor-like element extracted from HTML
///
/// The target is an opaque string taken from the markup; it is not
/// guaranteed to be absolute or reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRecord {
    /// Trimmed display text of the anchor
    pub name: String,

    /// Raw href value of the anchor
    pub href: String,
}

/// One dataset scraped from a listing page's result block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetEntry {
    /// Portal-assigned opaque identifier, stable across listing and detail pages
    pub view_id: String,

    /// URL of the dataset's detail page, resolved against the listing page URL
    pub detail_url: String,
}

/// Extracts all anchors with non-empty display text and href from a document
///
/// Extraction is best-effort tree traversal: `scraper` repairs malformed
/// markup, so a broken fragment does not abort extraction of its siblings.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// Anchor records in document order. Anchors with blank text or a blank
/// href are skipped.
pub fn extract_anchors(html: &str) -> Vec<LinkRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    if let Ok(anchor_selector) = Selector::parse("a[href]") {
        for element in document.select(&anchor_selector) {
            let name = element.text().collect::<String>().trim().to_string();
            let href = element.value().attr("href").unwrap_or("").trim().to_string();

            if name.is_empty() || href.is_empty() {
                continue;
            }

            records.push(LinkRecord { name, href });
        }
    }

    records
}

/// Extracts dataset entries from the results container of a listing page
///
/// # Extraction Rules
///
/// - Scope is the element carrying the configured results-container class;
///   if that region is absent, returns `None` so the caller can log a
///   structural-mismatch warning instead of failing.
/// - Each result block must carry the configured view-id attribute and
///   contain a detail-link anchor with an href; blocks missing either are
///   skipped, other blocks on the page are unaffected.
/// - Detail hrefs are resolved against `base_url`; unresolvable hrefs drop
///   the block.
///
/// # Arguments
///
/// * `html` - The listing page HTML
/// * `portal` - Portal page-structure configuration
/// * `base_url` - The listing page URL, for resolving relative detail links
///
/// # Returns
///
/// * `Some(entries)` - Entries in document order (possibly empty)
/// * `None` - The results container was not found
pub fn extract_result_blocks(
    html: &str,
    portal: &PortalConfig,
    base_url: &Url,
) -> Option<Vec<DatasetEntry>> {
    let document = Html::parse_document(html);

    let container_selector = Selector::parse(&format!(".{}", portal.results_container)).ok()?;
    let block_selector = Selector::parse(&format!(".{}", portal.result_block)).ok()?;
    let link_selector = Selector::parse(&format!(".{}[href]", portal.detail_link)).ok()?;

    let container = document.select(&container_selector).next()?;

    let mut entries = Vec::new();
    for block in container.select(&block_selector) {
        let view_id = match block.value().attr(&portal.view_id_attr) {
            Some(id) if !id.trim().is_empty() => id.trim().to_string(),
            _ => {
                tracing::debug!("Skipping result block without a view id");
                continue;
            }
        };

        let href = match block
            .select(&link_selector)
            .next()
            .and_then(|link| link.value().attr("href"))
        {
            Some(href) if !href.trim().is_empty() => href.trim(),
            _ => {
                tracing::debug!("Skipping result block {} without a detail link", view_id);
                continue;
            }
        };

        let detail_url = match base_url.join(href) {
            Ok(url) => url.to_string(),
            Err(e) => {
                tracing::debug!("Skipping result block {}: bad detail href: {}", view_id, e);
                continue;
            }
        };

        entries.push(DatasetEntry { view_id, detail_url });
    }

    Some(entries)
}
