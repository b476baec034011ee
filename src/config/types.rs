use serde::Deserialize;

/// Main configuration structure for Kaleido
///
/// Every section is optional; missing sections and keys fall back to the
/// defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub seeds: SeedConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub geo: GeoConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Crawl budgets and throughput limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of seeds taken from the seed source
    #[serde(rename = "max-seeds")]
    pub max_seeds: usize,

    /// Maximum number of pages downloaded over the whole run
    #[serde(rename = "max-pages-to-sample")]
    pub max_pages_to_sample: u64,

    /// Maximum number of pages processed per seed
    #[serde(rename = "max-pages-per-seed")]
    pub max_pages_per_seed: u64,

    /// Maximum number of sampled pages per registrable domain
    #[serde(rename = "max-pages-per-domain")]
    pub max_pages_per_domain: u64,

    /// Global request throughput cap
    #[serde(rename = "max-requests-per-second")]
    pub max_requests_per_second: f64,

    /// Maximum number of child links followed per page
    #[serde(rename = "max-children-per-page")]
    pub max_children_per_page: usize,

    /// Wall-clock budget per seed (seconds)
    #[serde(rename = "seed-time-budget-secs")]
    pub seed_time_budget_secs: u64,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_seeds: 20,
            max_pages_to_sample: 15_000,
            max_pages_per_seed: 2_000,
            max_pages_per_domain: 20,
            max_requests_per_second: 4.0,
            max_children_per_page: 10,
            seed_time_budget_secs: 1_800,
        }
    }
}

/// URL filtering rules used by the politeness gate
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Content types (without parameters) that may be crawled
    #[serde(rename = "supported-content-types")]
    pub supported_content_types: Vec<String>,

    /// Domain suffixes to stay away from (e.g. ".gov")
    #[serde(rename = "sensitive-suffixes")]
    pub sensitive_suffixes: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            supported_content_types: vec!["text/html".to_string()],
            sensitive_suffixes: [".gov", ".uk", ".mil", ".ca", ".eu", ".state", ".org"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// How the initial seed list is obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeedStrategy {
    /// One URL per line from `seeds.file-path`
    #[default]
    ReadFromFile,
    /// Ask a search engine for seeds (yields nothing)
    FromSearchEngine,
}

/// Seed source configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub strategy: SeedStrategy,

    /// Path to the seed list file
    #[serde(rename = "file-path")]
    pub file_path: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            strategy: SeedStrategy::ReadFromFile,
            file_path: "seeds.txt".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Root folder for downloaded pages
    #[serde(rename = "download-root")]
    pub download_root: String,

    /// Maximum number of files under one numbered subfolder
    #[serde(rename = "max-files-per-folder")]
    pub max_files_per_folder: usize,

    /// Optional path of the markdown report written at finalization
    #[serde(rename = "summary-path")]
    pub summary_path: Option<String>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            download_root: "crawled_files".to_string(),
            max_files_per_folder: 400,
            summary_path: None,
        }
    }
}

/// Log sink configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory holding the crawl log file
    #[serde(rename = "log-directory")]
    pub log_directory: String,

    /// Log every URL that reaches the politeness gate
    #[serde(rename = "log-all-explored")]
    pub log_all_explored: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_directory: "log_files".to_string(),
            log_all_explored: true,
        }
    }
}

/// Geolocation service configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeoConfig {
    /// Whether country lookups are performed at all
    pub enabled: bool,

    /// Base URL of an ipinfo-compatible service (`<endpoint>/<ip>/json`)
    pub endpoint: String,
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: "https://ipinfo.io".to_string(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "KaleidoCrawl".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/kaleido".to_string(),
            contact_email: "crawler@example.com".to_string(),
        }
    }
}
