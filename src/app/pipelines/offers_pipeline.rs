use crate::adapters::{HttpFetcher, SmtpMailer};
use crate::app::render::{render_csv, render_html, render_mapping};
use crate::config::SinkKind;
use crate::core::extract::ListingExtractor;
use crate::core::paginate::{scrape_all_pages, PaginationPlan};
use crate::core::{ConfigProvider, Mailer, PageFetcher, Pipeline, ScrapedListings, Storage, TransformResult};
use crate::domain::model::EmailMessage;
use crate::utils::error::{EtlError, Result};
use chrono::Utc;
use std::io::Write;
use std::path::Path;
use zip::write::{FileOptions, ZipWriter};

/// Scrapes every listing page, zips the fields into offer records and hands
/// them to the configured sink.
pub struct OffersPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    extractor: ListingExtractor,
    fetcher: Box<dyn PageFetcher>,
    mailer: Option<Box<dyn Mailer>>,
}

impl<S: Storage, C: ConfigProvider> OffersPipeline<S, C> {
    /// Builds the pipeline with an HTTP fetcher. The email sink connects
    /// through SMTP unless a mailer is supplied with [`with_mailer`](Self::with_mailer).
    pub fn new(storage: S, config: C) -> Result<Self> {
        let extractor = ListingExtractor::new(config.selectors())?;
        let fetcher = HttpFetcher::new(config.user_agent(), config.request_timeout())?;

        Ok(Self {
            storage,
            config,
            extractor,
            fetcher: Box::new(fetcher),
            mailer: None,
        })
    }

    pub fn with_fetcher(mut self, fetcher: impl PageFetcher + 'static) -> Self {
        self.fetcher = Box::new(fetcher);
        self
    }

    pub fn with_mailer(mut self, mailer: impl Mailer + 'static) -> Self {
        self.mailer = Some(Box::new(mailer));
        self
    }

    fn pagination_plan(&self) -> PaginationPlan {
        PaginationPlan {
            base_url: self.config.listing_url().to_string(),
            page_param: self.config.page_param().to_string(),
            max_pages: self.config.max_pages(),
        }
    }

    async fn load_csv(&self, csv_output: &str) -> Result<String> {
        let csv_name = self.config.csv_filename();

        let (file_name, data) = if self.config.compress() {
            let stem = Path::new(csv_name)
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("offers");
            (format!("{}.zip", stem), zip_single_file(csv_name, csv_output.as_bytes())?)
        } else {
            (csv_name.to_string(), csv_output.as_bytes().to_vec())
        };

        tracing::debug!("Writing {} ({} bytes) to storage", file_name, data.len());
        self.storage.write_file(&file_name, &data).await?;

        Ok(Path::new(self.config.output_path())
            .join(&file_name)
            .to_string_lossy()
            .into_owned())
    }

    async fn load_email(&self, html_output: String) -> Result<String> {
        let email = self.config.email().ok_or_else(|| EtlError::MissingConfigError {
            field: "email".to_string(),
        })?;
        let message = EmailMessage {
            from: email.from.clone(),
            to: email.to.clone(),
            subject: email.subject.clone(),
            html_body: html_output,
        };

        match &self.mailer {
            Some(mailer) => mailer.send(message).await?,
            None => SmtpMailer::new(email)?.send(message).await?,
        }

        Ok(format!("email to {}", email.to.join(", ")))
    }
}

fn zip_single_file(name: &str, contents: &[u8]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    zip.start_file::<_, ()>(name, FileOptions::default())?;
    zip.write_all(contents)?;
    Ok(zip.finish()?.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for OffersPipeline<S, C> {
    async fn extract(&self) -> Result<ScrapedListings> {
        let plan = self.pagination_plan();
        tracing::debug!(
            "Scraping up to {} pages from {}",
            plan.max_pages,
            plan.base_url
        );
        scrape_all_pages(self.fetcher.as_ref(), &self.extractor, &plan).await
    }

    async fn transform(&self, listings: ScrapedListings) -> Result<TransformResult> {
        let records = listings.into_records(Utc::now());

        let csv_output = render_csv(&records)?;
        let heading = self
            .config
            .email()
            .map(|e| e.subject.as_str())
            .unwrap_or("Offers");
        let html_output = render_html(&records, heading);

        Ok(TransformResult {
            records,
            csv_output,
            html_output,
        })
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        match self.config.sink() {
            SinkKind::Print => {
                let mapping = render_mapping(&result.records);
                println!("{}", serde_json::to_string_pretty(&mapping)?);
                Ok("stdout".to_string())
            }
            SinkKind::Csv => self.load_csv(&result.csv_output).await,
            SinkKind::Email => self.load_email(result.html_output).await,
        }
    }
}
