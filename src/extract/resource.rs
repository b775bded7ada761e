//! Resource URL matching over raw page bodies
//!
//! A detail page that exposes a downloadable serialization of its dataset
//! embeds one or more direct resource URLs somewhere in its markup or
//! inline scripts. Matching runs over the raw body text rather than the
//! parsed DOM, since the URLs frequently live inside script blobs.

use regex::Regex;
use std::collections::BTreeSet;

/// Matches direct resource URLs in arbitrary text
///
/// A candidate must use the `http`/`https` scheme, contain a `resource/`
/// path segment, and end with the configured file-type suffix. Matches are
/// deduplicated by URL equality and returned in sorted order.
#[derive(Debug, Clone)]
pub struct ResourceMatcher {
    url_pattern: Regex,
    suffix: String,
}

impl ResourceMatcher {
    /// Creates a matcher for resource URLs ending in the given suffix
    ///
    /// # Arguments
    ///
    /// * `suffix` - File-type suffix without the leading dot (e.g. "json")
    pub fn new(suffix: &str) -> Result<Self, regex::Error> {
        let url_pattern = Regex::new(r"https?://[A-Za-z0-9./?=_%:-]+")?;
        Ok(Self {
            url_pattern,
            suffix: format!(".{}", suffix),
        })
    }

    /// Returns all matching resource URLs in `blob`, sorted and deduplicated
    ///
    /// An empty result means the page exposes no matching resource; that is
    /// a valid outcome, not an error.
    pub fn match_urls(&self, blob: &str) -> Vec<String> {
        let mut unique = BTreeSet::new();

        for candidate in self.url_pattern.find_iter(blob) {
            let candidate = candidate.as_str();
            if candidate.contains("resource/") && candidate.ends_with(&self.suffix) {
                unique.insert(candidate.to_string());
            }
        }

        unique.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> ResourceMatcher {
        ResourceMatcher::new("json").unwrap()
    }

    #[test]
    fn test_single_match() {
        let blob = r#"<a href="https://host/resource/abcd-1234.json">API</a>"#;
        assert_eq!(
            matcher().match_urls(blob),
            vec!["https://host/resource/abcd-1234.json"]
        );
    }

    #[test]
    fn test_match_inside_script_blob() {
        let blob = r#"var cfg = {"endpoint":"https://data.example.gov/resource/ab12-cd34.json","rows":100};"#;
        assert_eq!(
            matcher().match_urls(blob),
            vec!["https://data.example.gov/resource/ab12-cd34.json"]
        );
    }

    #[test]
    fn test_no_match_returns_empty() {
        let blob = "<html><body>No endpoints here</body></html>";
        assert!(matcher().match_urls(blob).is_empty());
    }

    #[test]
    fn test_wrong_suffix_excluded() {
        let blob = "https://host/resource/abcd-1234.csv and https://host/resource/abcd-1234.xml";
        assert!(matcher().match_urls(blob).is_empty());
    }

    #[test]
    fn test_missing_resource_segment_excluded() {
        let blob = "https://host/download/abcd-1234.json";
        assert!(matcher().match_urls(blob).is_empty());
    }

    #[test]
    fn test_http_scheme_accepted() {
        let blob = "http://host/resource/abcd-1234.json";
        assert_eq!(matcher().match_urls(blob), vec![blob]);
    }

    #[test]
    fn test_other_schemes_excluded() {
        let blob = "ftp://host/resource/abcd-1234.json";
        assert!(matcher().match_urls(blob).is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let blob = "https://host/resource/x.json https://host/resource/x.json";
        assert_eq!(matcher().match_urls(blob).len(), 1);
    }

    #[test]
    fn test_multiple_matches_sorted() {
        let blob = "https://host/resource/zz99.json then https://host/resource/aa00.json";
        assert_eq!(
            matcher().match_urls(blob),
            vec![
                "https://host/resource/aa00.json",
                "https://host/resource/zz99.json"
            ]
        );
    }

    #[test]
    fn test_custom_suffix() {
        let matcher = ResourceMatcher::new("csv").unwrap();
        let blob = "https://host/resource/abcd.csv and https://host/resource/abcd.json";
        assert_eq!(matcher.match_urls(blob), vec!["https://host/resource/abcd.csv"]);
    }

    #[test]
    fn test_suffix_must_terminate_url() {
        // The suffix must be terminal, not merely present
        let blob = "https://host/resource/abcd.json.backup";
        assert!(matcher().match_urls(blob).is_empty());
    }
}
