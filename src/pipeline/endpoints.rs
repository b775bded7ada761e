//! Endpoint resolution stage
//!
//! Fans out over all discovered dataset entries, fetching each detail
//! page and matching resource URLs in the raw body. Fetches run on a
//! bounded worker pool: a semaphore caps simultaneous in-flight requests
//! to stay polite to the portal, and a cancellation token is honored at
//! every per-entry fetch boundary.

use crate::extract::{DatasetEntry, ResourceMatcher};
use crate::pipeline::FetchClient;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Mapping from view id to the resolved resource URLs for that dataset
///
/// Values are the matcher's full ordered output (sorted, deduplicated);
/// the first element is the primary endpoint. Ids whose detail page
/// yields no match are absent, never present with an empty list.
pub type EndpointMap = BTreeMap<String, Vec<String>>;

/// Resolves each dataset entry to its concrete resource URLs
///
/// Per entry: fetch the detail page, run the resource matcher over the
/// raw body, and record the matches. Entries yielding no match are
/// omitted and logged as unresolved - an appreciable fraction of detail
/// pages exposes no matching resource, so absence is expected. A fetch
/// failure for one entry never aborts the batch.
///
/// Every key in the returned map appeared as a `view_id` in `entries`;
/// resolution never invents identifiers.
///
/// # Arguments
///
/// * `client` - The fetch client
/// * `matcher` - Compiled resource-URL matcher
/// * `entries` - Dataset entries from the listing stage
/// * `max_in_flight` - Worker pool bound (simultaneous fetches)
/// * `cancel` - Cancellation token checked before and during each fetch
pub async fn resolve_endpoints(
    client: &FetchClient,
    matcher: &ResourceMatcher,
    entries: &[DatasetEntry],
    max_in_flight: u32,
    cancel: &CancellationToken,
) -> EndpointMap {
    let semaphore = Arc::new(Semaphore::new(max_in_flight.max(1) as usize));
    let mut tasks: JoinSet<Option<(String, Vec<String>)>> = JoinSet::new();

    for entry in entries {
        if cancel.is_cancelled() {
            tracing::info!("Endpoint resolution cancelled before dispatching {}", entry.view_id);
            break;
        }

        let semaphore = semaphore.clone();
        let client = client.clone();
        let matcher = matcher.clone();
        let cancel = cancel.clone();
        let entry = entry.clone();

        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await.ok()?;

            if cancel.is_cancelled() {
                return None;
            }

            let body = tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!("Fetch for {} cancelled in flight", entry.view_id);
                    return None;
                }
                fetched = client.get(&entry.detail_url) => match fetched {
                    Ok(body) => body,
                    Err(e) => {
                        tracing::warn!("Couldn't fetch detail page for {}: {}", entry.view_id, e);
                        return None;
                    }
                },
            };

            let urls = matcher.match_urls(&body);
            if urls.is_empty() {
                tracing::warn!("Couldn't find endpoint for {}", entry.view_id);
                None
            } else {
                Some((entry.view_id, urls))
            }
        });
    }

    let mut endpoints = EndpointMap::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Some((view_id, urls))) => {
                endpoints.insert(view_id, urls);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!("Resolution worker failed: {}", e);
            }
        }
    }

    tracing::info!(
        "Resolved {} of {} dataset entries",
        endpoints.len(),
        entries.len()
    );
    endpoints
}
