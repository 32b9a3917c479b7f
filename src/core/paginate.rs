use crate::core::extract::ListingExtractor;
use crate::domain::model::{ExtractedPage, ScrapedListings};
use crate::domain::ports::PageFetcher;
use crate::utils::error::{EtlError, Result};
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationPlan {
    pub base_url: String,
    pub page_param: String,
    pub max_pages: u32,
}

/// Builds the URL of listing page `page`, replacing any existing value of
/// `page_param` and keeping the other query parameters.
pub fn page_url(base_url: &str, page_param: &str, page: u32) -> Result<String> {
    let mut url = Url::parse(base_url).map_err(|e| EtlError::InvalidConfigValueError {
        field: "url".to_string(),
        value: base_url.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != page_param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(page_param, &page.to_string());

    Ok(url.into())
}

/// Fetches listing pages in order until one yields no titles or `max_pages`
/// is reached. A failed fetch counts as an empty page.
pub async fn scrape_all_pages<F>(
    fetcher: &F,
    extractor: &ListingExtractor,
    plan: &PaginationPlan,
) -> Result<ScrapedListings>
where
    F: PageFetcher + ?Sized,
{
    let mut listings = ScrapedListings::default();

    for page in 1..=plan.max_pages {
        let url = page_url(&plan.base_url, &plan.page_param, page)?;
        tracing::debug!("Fetching listing page {}: {}", page, url);

        let extracted = match fetcher.fetch(&url).await {
            Some(html) => extractor.extract(&html),
            None => ExtractedPage::default(),
        };

        if !extracted.has_titles() {
            tracing::info!("Page {} has no offers, stopping", page);
            break;
        }

        tracing::info!(
            "Page {}: {} titles, {} prices, {} discounts",
            page,
            extracted.titles.len(),
            extracted.prices.len(),
            extracted.discounts.len()
        );
        listings.absorb(extracted);
    }

    if listings.pages_fetched == plan.max_pages {
        tracing::info!("Reached the page limit ({})", plan.max_pages);
    }

    Ok(listings)
}
