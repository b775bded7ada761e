//! Pipeline driver - stage sequencing and persistence
//!
//! The driver owns the fetch client, the compiled resource matcher, and
//! the cancellation token, and runs the three stages with a strict
//! barrier between them: a stage does not begin until the previous one
//! has fully produced its output collection. It persists the terminal
//! EndpointMap and reports what happened.

use crate::config::Config;
use crate::extract::{DatasetEntry, ResourceMatcher};
use crate::output::EndpointStore;
use crate::pipeline::{
    discover_categories, list_datasets, resolve_endpoints, CategoryMap, EndpointMap, FetchClient,
};
use crate::Result;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// Summary of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Query name the run was started for
    pub query: String,

    /// Run start time
    pub started_at: DateTime<Utc>,

    /// Run end time
    pub finished_at: DateTime<Utc>,

    /// Categories discovered from the seed page
    pub categories_found: usize,

    /// Unique dataset entries collected across all listing pages
    pub datasets_listed: usize,

    /// Identifiers resolved to at least one resource URL
    pub endpoints_resolved: usize,

    /// Identifiers whose detail page yielded no match (or failed to fetch)
    pub endpoints_unresolved: usize,

    /// Directory the endpoint records were written into
    pub output_dir: PathBuf,

    /// The terminal identifier -> resource URLs mapping
    pub endpoints: EndpointMap,
}

/// Drives the three discovery stages end to end
pub struct Pipeline {
    config: Config,
    client: FetchClient,
    matcher: ResourceMatcher,
    cancel: CancellationToken,
}

impl Pipeline {
    /// Creates a pipeline from configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Full scout configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Pipeline)` - Ready to run
    /// * `Err(ScoutError)` - Client build or matcher compilation failed
    pub fn new(config: Config) -> Result<Self> {
        let client = FetchClient::new(&config.fetch)?;
        let matcher = ResourceMatcher::new(&config.portal.resource_suffix)?;

        Ok(Self {
            config,
            client,
            matcher,
            cancel: CancellationToken::new(),
        })
    }

    /// Returns a handle that cancels this pipeline when triggered
    ///
    /// Cancellation is honored at every per-entry fetch boundary: in-flight
    /// fetches are abandoned and no further ones are dispatched. Results
    /// already collected are still persisted.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Runs the full pipeline from a seed URL
    ///
    /// Stage 1 discovers categories on the seed page; stage 2 lists the
    /// datasets of every discovered category; stage 3 resolves each dataset
    /// to its resource URLs. When no categories are found the seed URL
    /// itself is treated as the single listing page, so a search-results
    /// seed still produces endpoints.
    ///
    /// # Arguments
    ///
    /// * `seed_url` - The search/category query URL to start from
    /// * `query` - Name for the output directory (`<query>_data/`)
    pub async fn run(&self, seed_url: &str, query: &str) -> Result<PipelineReport> {
        let started_at = Utc::now();
        tracing::info!("Starting discovery run for '{}' from {}", query, seed_url);

        let categories = discover_categories(&self.client, seed_url, &self.config.portal).await;

        let listing_urls: Vec<String> = if categories.is_empty() {
            tracing::warn!(
                "No categories discovered; treating the seed URL as the listing page"
            );
            vec![seed_url.to_string()]
        } else {
            categories.values().cloned().collect()
        };

        self.run_listings(listing_urls, categories.len(), query, started_at)
            .await
    }

    /// Runs the pipeline from a caller-provided category map
    ///
    /// Skips category discovery and lists every URL in the map.
    ///
    /// # Arguments
    ///
    /// * `categories` - Category name -> listing URL mapping
    /// * `query` - Name for the output directory (`<query>_data/`)
    pub async fn run_with_categories(
        &self,
        categories: &CategoryMap,
        query: &str,
    ) -> Result<PipelineReport> {
        let started_at = Utc::now();
        tracing::info!(
            "Starting discovery run for '{}' with {} caller-provided categories",
            query,
            categories.len()
        );

        let listing_urls: Vec<String> = categories.values().cloned().collect();
        self.run_listings(listing_urls, categories.len(), query, started_at)
            .await
    }

    /// Shared listing + resolution + persistence path
    async fn run_listings(
        &self,
        listing_urls: Vec<String>,
        categories_found: usize,
        query: &str,
        started_at: DateTime<Utc>,
    ) -> Result<PipelineReport> {
        // Stage barrier: all listings complete before resolution starts
        let mut entries: Vec<DatasetEntry> = Vec::new();
        let mut seen_ids: BTreeSet<String> = BTreeSet::new();

        for listing_url in &listing_urls {
            if self.cancel.is_cancelled() {
                tracing::info!("Listing stage cancelled");
                break;
            }

            for entry in list_datasets(&self.client, listing_url, &self.config.portal).await {
                // The same dataset can be listed under several categories;
                // resolve each id once, keeping its first occurrence
                if seen_ids.insert(entry.view_id.clone()) {
                    entries.push(entry);
                }
            }
        }

        let endpoints = resolve_endpoints(
            &self.client,
            &self.matcher,
            &entries,
            self.config.pipeline.max_in_flight,
            &self.cancel,
        )
        .await;

        let detail_urls: BTreeMap<String, String> = entries
            .iter()
            .map(|e| (e.view_id.clone(), e.detail_url.clone()))
            .collect();

        let store = EndpointStore::create(Path::new(&self.config.output.data_dir), query)?;
        store.write_all(&endpoints, &detail_urls)?;

        let finished_at = Utc::now();
        let report = PipelineReport {
            query: query.to_string(),
            started_at,
            finished_at,
            categories_found,
            datasets_listed: entries.len(),
            endpoints_resolved: endpoints.len(),
            endpoints_unresolved: entries.len().saturating_sub(endpoints.len()),
            output_dir: store.dir().to_path_buf(),
            endpoints,
        };

        tracing::info!(
            "Run for '{}' finished in {}s: {} categories, {} datasets, {} resolved, {} unresolved",
            report.query,
            (report.finished_at - report.started_at).num_seconds(),
            report.categories_found,
            report.datasets_listed,
            report.endpoints_resolved,
            report.endpoints_unresolved
        );

        Ok(report)
    }
}
