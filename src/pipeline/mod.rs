//! The three-stage discovery pipeline
//!
//! This module contains the core pipeline logic, including:
//! - HTTP fetching with a rotating client-identity pool
//! - Category discovery from a seed page
//! - Dataset listing from category/search pages
//! - Endpoint resolution on a bounded worker pool
//! - Driver sequencing and persistence

mod categories;
mod driver;
mod endpoints;
mod fetcher;
mod listings;

pub use categories::{discover_categories, CategoryMap};
pub use driver::{Pipeline, PipelineReport};
pub use endpoints::{resolve_endpoints, EndpointMap};
pub use fetcher::FetchClient;
pub use listings::list_datasets;

use crate::config::Config;
use crate::Result;

/// Runs a complete discovery operation
///
/// This is the main entry point for a one-shot run. It builds a
/// [`Pipeline`] from the configuration and drives all three stages:
/// seed page -> categories -> dataset listings -> resolved endpoints,
/// persisting one JSON record per resolved identifier.
///
/// # Arguments
///
/// * `config` - The scout configuration
/// * `seed_url` - The search/category query URL to start from
/// * `query` - Name for the output directory (`<query>_data/`)
///
/// # Returns
///
/// * `Ok(PipelineReport)` - Run summary with the terminal endpoint map
/// * `Err(ScoutError)` - Setup or persistence failed
pub async fn run_pipeline(config: Config, seed_url: &str, query: &str) -> Result<PipelineReport> {
    let pipeline = Pipeline::new(config)?;
    pipeline.run(seed_url, query).await
}
