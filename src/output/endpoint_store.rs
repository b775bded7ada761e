use crate::pipeline::EndpointMap;
use crate::{Result, ScoutError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The persisted record for one resolved dataset
///
/// Serialization is deterministic (fixed field order, pretty-printed), so
/// rerunning the pipeline against unchanged pages rewrites byte-identical
/// files. Timestamps deliberately do not appear here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// Portal-assigned view identifier
    pub view_id: String,

    /// Detail page the resource URLs were resolved from
    pub detail_url: String,

    /// Resolved resource URLs, sorted and deduplicated; the first element
    /// is the primary endpoint
    pub resource_urls: Vec<String>,
}

/// Filesystem store writing one JSON document per dataset identifier
///
/// The directory layout `<query>_data/<view_id>.json` is the contract
/// downstream code reads directly from the filesystem.
#[derive(Debug)]
pub struct EndpointStore {
    dir: PathBuf,
}

impl EndpointStore {
    /// Creates the store directory for a query
    ///
    /// The query name is sanitized for filesystem use (whitespace and path
    /// separators become underscores) and suffixed with `_data`.
    ///
    /// # Arguments
    ///
    /// * `data_dir` - Parent directory for all per-query directories
    /// * `query` - The query name this run was started for
    pub fn create(data_dir: &Path, query: &str) -> Result<Self> {
        let dir = data_dir.join(format!("{}_data", sanitize(query)));
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Returns the directory records are written into
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes one record as `<view_id>.json`
    ///
    /// Ids that would escape the store directory are rejected.
    pub fn write(&self, record: &EndpointRecord) -> Result<PathBuf> {
        if !is_safe_id(&record.view_id) {
            return Err(ScoutError::Pipeline(format!(
                "Refusing to persist unsafe view id '{}'",
                record.view_id
            )));
        }

        let path = self.dir.join(format!("{}.json", record.view_id));
        let json = serde_json::to_string_pretty(record)?;
        std::fs::write(&path, json)?;
        Ok(path)
    }

    /// Persists a full endpoint map, one file per identifier
    ///
    /// `detail_urls` maps each view id back to the detail page it was
    /// resolved from. Unsafe ids are logged and skipped rather than
    /// failing the batch.
    ///
    /// # Returns
    ///
    /// The number of records written
    pub fn write_all(
        &self,
        endpoints: &EndpointMap,
        detail_urls: &BTreeMap<String, String>,
    ) -> Result<usize> {
        let mut written = 0;

        for (view_id, resource_urls) in endpoints {
            let record = EndpointRecord {
                view_id: view_id.clone(),
                detail_url: detail_urls.get(view_id).cloned().unwrap_or_default(),
                resource_urls: resource_urls.clone(),
            };

            match self.write(&record) {
                Ok(path) => {
                    tracing::debug!("Wrote {}", path.display());
                    written += 1;
                }
                Err(e) => {
                    tracing::warn!("Skipping record for {}: {}", view_id, e);
                }
            }
        }

        tracing::info!("Persisted {} endpoint records to {}", written, self.dir.display());
        Ok(written)
    }

    /// Reads a previously persisted record back
    pub fn read(&self, view_id: &str) -> Result<EndpointRecord> {
        let path = self.dir.join(format!("{}.json", view_id));
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Replaces characters that are unsafe in a directory name
fn sanitize(query: &str) -> String {
    query
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// View ids become file names; only portal-style identifiers are accepted
fn is_safe_id(view_id: &str) -> bool {
    !view_id.is_empty()
        && view_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
