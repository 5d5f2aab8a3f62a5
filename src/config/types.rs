use serde::Deserialize;

/// Default User-Agent, matching a mainstream desktop browser so image
/// CDNs serve the same responses a visitor would see.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// File extensions that are never fetched as pages. Links with these
/// extensions are recorded as skipped and not traversed.
const DEFAULT_SKIP_EXTENSIONS: &[&str] = &[
    ".pdf", ".txt", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".zip", ".rar", ".7z",
    ".tar", ".gz", ".jpg", ".jpeg", ".png", ".gif", ".svg", ".mp4", ".mp3", ".avi", ".mov",
    ".wmv", ".flv", ".webm", ".ico",
];

/// Main configuration structure for pixelsweep
///
/// Every field has a default, so the tool runs without a config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,

    /// URL path extensions that mark a link as a non-page resource
    #[serde(rename = "skip-extensions")]
    pub skip_extensions: Vec<String>,
}

/// HTTP client behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User-Agent header sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Initial wait after a 429 response, in seconds
    #[serde(rename = "backoff-start-secs")]
    pub backoff_start_secs: u64,

    /// Upper bound for the doubling 429 backoff, in seconds
    #[serde(rename = "backoff-cap-secs")]
    pub backoff_cap_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http: HttpConfig::default(),
            skip_extensions: DEFAULT_SKIP_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
            backoff_start_secs: 1,
            backoff_cap_secs: 60,
        }
    }
}
