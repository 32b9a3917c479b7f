pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{HttpFetcher, LocalStorage, SmtpMailer};
pub use app::pipelines::OffersPipeline;
pub use core::etl::EtlEngine;
pub use utils::error::{EtlError, Result};
