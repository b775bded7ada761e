use serde::Deserialize;

/// Main configuration structure for Civic-Scout
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub portal: PortalConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// HTTP fetch behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Total request timeout (seconds)
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connection timeout (seconds)
    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Pool of client-identity strings; one is chosen uniformly at random
    /// per request. Rotating identities only reduces the chance of being
    /// blocked by naive bot filtering; it is evasion, not security.
    #[serde(rename = "user-agents", default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

/// Pipeline scheduling configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Maximum number of simultaneous in-flight fetches during endpoint
    /// resolution. Kept small by default to stay polite to the portal.
    #[serde(rename = "max-in-flight", default = "default_max_in_flight")]
    pub max_in_flight: u32,
}

/// Portal page-structure configuration
///
/// Defaults target the NYC open-data portal. Only the first page of
/// category and listing results is considered; pagination is a stated
/// v1 limitation.
#[derive(Debug, Clone, Deserialize)]
pub struct PortalConfig {
    /// Substring a link target must contain to count as a category-browse URL
    #[serde(rename = "browse-marker", default = "default_browse_marker")]
    pub browse_marker: String,

    /// CSS class of the listing page's results container
    #[serde(rename = "results-container", default = "default_results_container")]
    pub results_container: String,

    /// CSS class of one result block inside the container
    #[serde(rename = "result-block", default = "default_result_block")]
    pub result_block: String,

    /// Data attribute on a result block carrying the portal-assigned view id
    #[serde(rename = "view-id-attr", default = "default_view_id_attr")]
    pub view_id_attr: String,

    /// CSS class of the detail-page link inside a result block
    #[serde(rename = "detail-link", default = "default_detail_link")]
    pub detail_link: String,

    /// File-type suffix a resource URL must end with (without the dot)
    #[serde(rename = "resource-suffix", default = "default_resource_suffix")]
    pub resource_suffix: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory under which the per-query `<query>_data/` directories are
    /// created. Downstream consumers read `<query>_data/<view_id>.json`
    /// directly from the filesystem.
    #[serde(rename = "data-dir", default = "default_data_dir")]
    pub data_dir: String,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_user_agents() -> Vec<String> {
    [
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36",
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:89.0) Gecko/20100101 Firefox/89.0",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.114 Safari/537.36",
        "Mozilla/5.0 (iPad; CPU OS 14_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) CriOS/91.0.4472.80 Mobile/15E148 Safari/604.1",
        "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/13.0 Safari/605.1.15",
        "Mozilla/5.0 (Windows NT 10.0; Trident/7.0; AS; rv:11.0) like Gecko",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_in_flight() -> u32 {
    4
}

fn default_browse_marker() -> String {
    "data.cityofnewyork.us/browse".to_string()
}

fn default_results_container() -> String {
    "browse2-content".to_string()
}

fn default_result_block() -> String {
    "browse2-result".to_string()
}

fn default_view_id_attr() -> String {
    "data-view-id".to_string()
}

fn default_detail_link() -> String {
    "browse2-result-name-link".to_string()
}

fn default_resource_suffix() -> String {
    "json".to_string()
}

fn default_data_dir() -> String {
    ".".to_string()
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agents: default_user_agents(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_in_flight: default_max_in_flight(),
        }
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            browse_marker: default_browse_marker(),
            results_container: default_results_container(),
            result_block: default_result_block(),
            view_id_attr: default_view_id_attr(),
            detail_link: default_detail_link(),
            resource_suffix: default_resource_suffix(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}
