use clap::Parser;

// ============================================
// Environment variable name constants
// Shared between config parsing and documentation
// ============================================
pub mod env {
    pub const LOG_FORMAT: &str = "LOG_FORMAT";
    pub const LOG_LEVEL: &str = "LOG_LEVEL";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const STORAGE_PATH: &str = "STORAGE_PATH";
    pub const FEED_URL: &str = "FEED_URL";
    pub const PAGE_SIZE: &str = "PAGE_SIZE";
    pub const SYNC_INTERVAL_SECS: &str = "SYNC_INTERVAL_SECS";
    pub const SYNC_ON_START: &str = "SYNC_ON_START";
    pub const REQUEST_TIMEOUT_SECS: &str = "REQUEST_TIMEOUT_SECS";
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "nvd-mirror",
    version,
    about = "Local mirror of the NVD CVE feed with a filtered query API",
    long_about = "Periodically walks the paginated NVD CVE feed, stores the normalized \
                  records in SQLite, and serves them back through a filtered HTTP API."
)]
pub struct Config {
    /// Log format: json or pretty
    #[arg(long, env = env::LOG_FORMAT, default_value = "json")]
    pub log_format: String,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = env::LOG_LEVEL, default_value = "info")]
    pub log_level: String,

    /// API server port
    #[arg(long, env = env::SERVER_PORT, default_value = "3000")]
    pub server_port: u16,

    /// Storage path for the SQLite database
    #[arg(long, env = env::STORAGE_PATH, default_value = "./data")]
    pub storage_path: String,

    // ============================================
    // Feed sync settings
    // ============================================
    /// Upstream CVE feed base URL
    #[arg(
        long,
        env = env::FEED_URL,
        default_value = "https://services.nvd.nist.gov/rest/json/cves/2.0"
    )]
    pub feed_url: String,

    /// Records requested per feed page
    #[arg(long, env = env::PAGE_SIZE, default_value = "100")]
    pub page_size: u64,

    /// Seconds between scheduled sync runs (0 to disable periodic sync)
    #[arg(long, env = env::SYNC_INTERVAL_SECS, default_value = "86400")]
    pub sync_interval_secs: u64,

    /// Run a sync immediately at startup
    #[arg(long, env = env::SYNC_ON_START, default_value = "true")]
    pub sync_on_start: bool,

    /// Per-request timeout for feed page fetches, in seconds
    #[arg(long, env = env::REQUEST_TIMEOUT_SECS, default_value = "30")]
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_args() -> Self {
        Config::parse()
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.page_size == 0 {
            return Err("PAGE_SIZE must be greater than zero".to_string());
        }
        if self.feed_url.is_empty() {
            return Err("FEED_URL must not be empty".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("REQUEST_TIMEOUT_SECS must be greater than zero".to_string());
        }
        Ok(())
    }

    /// Get SQLite database path
    pub fn get_db_path(&self) -> String {
        format!("{}/cve_data.db", self.storage_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> Config {
        Config {
            log_format: "json".to_string(),
            log_level: "info".to_string(),
            server_port: 3000,
            storage_path: "./data".to_string(),
            feed_url: "https://services.nvd.nist.gov/rest/json/cves/2.0".to_string(),
            page_size: 100,
            sync_interval_secs: 86400,
            sync_on_start: true,
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn test_validate_default() {
        let config = default_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = default_config();
        config.page_size = 0;
        assert_eq!(
            config.validate().unwrap_err(),
            "PAGE_SIZE must be greater than zero"
        );
    }

    #[test]
    fn test_validate_empty_feed_url() {
        let mut config = default_config();
        config.feed_url = String::new();
        assert_eq!(config.validate().unwrap_err(), "FEED_URL must not be empty");
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = default_config();
        config.request_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_get_db_path() {
        let config = default_config();
        assert_eq!(config.get_db_path(), "./data/cve_data.db");
    }

    #[test]
    fn test_get_db_path_custom() {
        let mut config = default_config();
        config.storage_path = "/tmp/mirror".to_string();
        assert_eq!(config.get_db_path(), "/tmp/mirror/cve_data.db");
    }
}
