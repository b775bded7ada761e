//! Pure HTML extraction for the discovery pipeline
//!
//! This module contains the no-I/O half of the pipeline:
//! - Anchor and result-block extraction from portal HTML
//! - Resource URL matching over raw page bodies
//!
//! Everything here is best-effort: malformed fragments never abort
//! extraction of their siblings, and "nothing found" is a valid outcome,
//! not an error.

mod links;
mod resource;

pub use links::{extract_anchors, extract_result_blocks, DatasetEntry, LinkRecord};
pub use resource::ResourceMatcher;
