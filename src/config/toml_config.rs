use crate::config::{
    default_output_path, EmailConfig, SelectorConfig, SinkKind, DEFAULT_CSV_FILENAME,
    DEFAULT_LISTING_URL, DEFAULT_MAX_PAGES, DEFAULT_PAGE_PARAM, DEFAULT_USER_AGENT,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid placeholder pattern"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub scraper: ScraperInfo,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub selectors: SelectorConfig,
    #[serde(default)]
    pub load: LoadConfig,
    pub email: Option<EmailConfig>,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperInfo {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub page_param: String,
    pub max_pages: u32,
    pub timeout_seconds: Option<u64>,
    pub user_agent: Option<String>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LISTING_URL.to_string(),
            page_param: DEFAULT_PAGE_PARAM.to_string(),
            max_pages: DEFAULT_MAX_PAGES,
            timeout_seconds: None,
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    pub sink: SinkKind,
    pub output_path: Option<String>,
    pub csv_filename: String,
    pub compress: bool,
    #[serde(skip)]
    resolved_output_path: String,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            sink: SinkKind::default(),
            output_path: None,
            csv_filename: DEFAULT_CSV_FILENAME.to_string(),
            compress: false,
            resolved_output_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// Loads a configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses a configuration string, substituting `${VAR}` placeholders first
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);

        let mut config: TomlConfig =
            toml::from_str(&processed).map_err(|e| EtlError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        config.load.resolved_output_path = config
            .load
            .output_path
            .clone()
            .unwrap_or_else(default_output_path);

        Ok(config)
    }

    /// Unset variables are left as-is so validation can point at them
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("source.url", &self.source.url)?;
        validation::validate_non_empty_string("source.page_param", &self.source.page_param)?;
        validation::validate_positive_number(
            "source.max_pages",
            u64::from(self.source.max_pages),
            1,
        )?;
        if let Some(timeout) = self.source.timeout_seconds {
            validation::validate_positive_number("source.timeout_seconds", timeout, 1)?;
        }

        for (field, selector) in [
            ("selectors.title", &self.selectors.title),
            ("selectors.price", &self.selectors.price),
            ("selectors.price_cents", &self.selectors.price_cents),
            ("selectors.discount", &self.selectors.discount),
        ] {
            validation::validate_non_empty_string(field, selector)?;
        }

        validation::validate_path("load.output_path", self.output_path())?;
        validation::validate_file_name("load.csv_filename", &self.load.csv_filename)?;

        if self.load.sink == SinkKind::Email {
            let email = validation::validate_required_field("email", &self.email)?;
            validate_email_config(email)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

fn validate_email_config(email: &EmailConfig) -> Result<()> {
    validation::validate_non_empty_string("email.smtp_host", &email.smtp_host)?;
    validation::validate_non_empty_string("email.from", &email.from)?;

    if email.to.is_empty() {
        return Err(EtlError::MissingConfigError {
            field: "email.to".to_string(),
        });
    }
    for recipient in &email.to {
        validation::validate_non_empty_string("email.to", recipient)?;
    }

    reject_unset_placeholder("email.username", &email.username)?;
    reject_unset_placeholder("email.password", &email.password)?;
    reject_unset_placeholder("email.from", &email.from)?;
    for recipient in &email.to {
        reject_unset_placeholder("email.to", recipient)?;
    }

    Ok(())
}

fn reject_unset_placeholder(field: &str, value: &str) -> Result<()> {
    if ENV_PLACEHOLDER.is_match(value) {
        return Err(EtlError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: "environment variable is not set".to_string(),
        });
    }
    Ok(())
}

impl ConfigProvider for TomlConfig {
    fn listing_url(&self) -> &str {
        &self.source.url
    }

    fn page_param(&self) -> &str {
        &self.source.page_param
    }

    fn max_pages(&self) -> u32 {
        self.source.max_pages
    }

    fn selectors(&self) -> &SelectorConfig {
        &self.selectors
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.source.timeout_seconds.map(Duration::from_secs)
    }

    fn user_agent(&self) -> &str {
        self.source.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn sink(&self) -> SinkKind {
        self.load.sink
    }

    fn output_path(&self) -> &str {
        &self.load.resolved_output_path
    }

    fn csv_filename(&self) -> &str {
        &self.load.csv_filename
    }

    fn compress(&self) -> bool {
        self.load.compress
    }

    fn email(&self) -> Option<&EmailConfig> {
        self.email.as_ref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
