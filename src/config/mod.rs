#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_LISTING_URL: &str = "https://www.mercadolivre.com.br/ofertas";
pub const DEFAULT_PAGE_PARAM: &str = "page";
pub const DEFAULT_MAX_PAGES: u32 = 20;
pub const DEFAULT_CSV_FILENAME: &str = "offers.csv";
pub const DEFAULT_USER_AGENT: &str = concat!("promo-etl/", env!("CARGO_PKG_VERSION"));

/// CSS selectors used to pull offer fields out of a listing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    pub title: String,
    pub price: String,
    /// Looked up inside each price element.
    pub price_cents: String,
    pub discount: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            title: "p.promotion-item__title".to_string(),
            price: "span.promotion-item__price".to_string(),
            price_cents: "sup".to_string(),
            discount: "span.promotion-item__discount-text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    Print,
    #[default]
    Csv,
    Email,
}

impl fmt::Display for SinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SinkKind::Print => "print",
            SinkKind::Csv => "csv",
            SinkKind::Email => "email",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_starttls")]
    pub starttls: bool,
    pub username: String,
    pub password: String,
    pub from: String,
    pub to: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_smtp_port() -> u16 {
    587
}

fn default_starttls() -> bool {
    true
}

fn default_subject() -> String {
    "Today's offers".to_string()
}

/// The user's downloads directory, or `./output` when there is none.
pub fn default_output_path() -> String {
    dirs::download_dir()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "./output".to_string())
}
