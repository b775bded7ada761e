//! Output module for persisting resolved endpoints
//!
//! This module owns the on-disk contract downstream consumers (bulk
//! downloader, dashboard) depend on: one JSON document per dataset
//! identifier under `<query>_data/<view_id>.json`.

mod endpoint_store;

pub use endpoint_store::{EndpointRecord, EndpointStore};
