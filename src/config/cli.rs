use crate::config::{
    default_output_path, EmailConfig, SelectorConfig, SinkKind, DEFAULT_CSV_FILENAME,
    DEFAULT_LISTING_URL, DEFAULT_MAX_PAGES, DEFAULT_PAGE_PARAM, DEFAULT_USER_AGENT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "promo-etl")]
#[command(about = "Scrape paginated promotional offers into a CSV file or stdout")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_LISTING_URL)]
    pub url: String,

    #[arg(long, default_value = DEFAULT_PAGE_PARAM)]
    pub page_param: String,

    #[arg(long, default_value_t = DEFAULT_MAX_PAGES)]
    pub max_pages: u32,

    #[arg(long, value_enum, default_value_t = SinkKind::Csv)]
    pub sink: SinkKind,

    #[arg(long, default_value_t = default_output_path())]
    pub output_path: String,

    #[arg(long, default_value = DEFAULT_CSV_FILENAME)]
    pub csv_filename: String,

    #[arg(long, help = "Write the CSV inside a ZIP archive")]
    pub compress: bool,

    #[arg(long, help = "Request timeout in seconds (client default when unset)")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Log process CPU and memory between stages")]
    pub monitor: bool,

    #[arg(skip)]
    pub selectors: SelectorConfig,
}

impl ConfigProvider for CliConfig {
    fn listing_url(&self) -> &str {
        &self.url
    }

    fn page_param(&self) -> &str {
        &self.page_param
    }

    fn max_pages(&self) -> u32 {
        self.max_pages
    }

    fn selectors(&self) -> &SelectorConfig {
        &self.selectors
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn user_agent(&self) -> &str {
        DEFAULT_USER_AGENT
    }

    fn sink(&self) -> SinkKind {
        self.sink
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn csv_filename(&self) -> &str {
        &self.csv_filename
    }

    fn compress(&self) -> bool {
        self.compress
    }

    fn email(&self) -> Option<&EmailConfig> {
        None
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("url", &self.url)?;
        validation::validate_non_empty_string("page_param", &self.page_param)?;
        validation::validate_positive_number("max_pages", u64::from(self.max_pages), 1)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_file_name("csv_filename", &self.csv_filename)?;

        if self.sink == SinkKind::Email {
            return Err(EtlError::ConfigError {
                message: "the email sink needs SMTP settings; use toml-scrape with an [email] section"
                    .to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_and_validate() {
        let config = CliConfig::parse_from(["promo-etl"]);
        assert_eq!(config.url, DEFAULT_LISTING_URL);
        assert_eq!(config.max_pages, DEFAULT_MAX_PAGES);
        assert_eq!(config.sink, SinkKind::Csv);
        assert_eq!(config.selectors, SelectorConfig::default());
        assert!(config.request_timeout().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_flags_override_defaults() {
        let config = CliConfig::parse_from([
            "promo-etl",
            "--url",
            "http://localhost:8080/deals",
            "--max-pages",
            "3",
            "--sink",
            "print",
            "--timeout-seconds",
            "10",
        ]);
        assert_eq!(config.listing_url(), "http://localhost:8080/deals");
        assert_eq!(config.max_pages(), 3);
        assert_eq!(config.sink(), SinkKind::Print);
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(10)));
    }

    #[test]
    fn test_email_sink_rejected_without_smtp_settings() {
        let config = CliConfig::parse_from(["promo-etl", "--sink", "email"]);
        assert!(matches!(config.validate(), Err(EtlError::ConfigError { .. })));
    }

    #[test]
    fn test_zero_pages_rejected() {
        let config = CliConfig::parse_from(["promo-etl", "--max-pages", "0"]);
        assert!(config.validate().is_err());
    }
}
