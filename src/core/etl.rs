use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Runs extract, transform and load, returning where the offers went.
    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting offers scrape...");

        let listings = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} titles from {} pages",
            listings.titles.len(),
            listings.pages_fetched
        );
        self.monitor.log_stats("Extract");

        let result = self.pipeline.transform(listings).await?;
        tracing::info!("Built {} offer records", result.records.len());
        self.monitor.log_stats("Transform");

        let destination = self.pipeline.load(result).await?;
        tracing::info!("Offers delivered to: {}", destination);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(destination)
    }
}
