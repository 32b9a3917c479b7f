use crate::config::{EmailConfig, SelectorConfig, SinkKind};
use crate::domain::model::{EmailMessage, ScrapedListings, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn listing_url(&self) -> &str;
    fn page_param(&self) -> &str;
    fn max_pages(&self) -> u32;
    fn selectors(&self) -> &SelectorConfig;
    fn request_timeout(&self) -> Option<Duration>;
    fn user_agent(&self) -> &str;
    fn sink(&self) -> SinkKind;
    fn output_path(&self) -> &str;
    fn csv_filename(&self) -> &str;
    fn compress(&self) -> bool;
    fn email(&self) -> Option<&EmailConfig>;
}

/// Fetches one listing page. Failures are logged by the implementation and
/// reported as `None`.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Option<String>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<()>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<ScrapedListings>;
    async fn transform(&self, listings: ScrapedListings) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
