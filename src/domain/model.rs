use crate::domain::price::{normalize_price, parse_discount_percent, Price};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Parallel field lists pulled from a single listing page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    pub titles: Vec<String>,
    pub prices: Vec<String>,
    pub discounts: Vec<String>,
}

impl ExtractedPage {
    pub fn has_titles(&self) -> bool {
        !self.titles.is_empty()
    }
}

/// Field lists accumulated across every listing page of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedListings {
    pub pages_fetched: u32,
    pub titles: Vec<String>,
    pub prices: Vec<String>,
    pub discounts: Vec<String>,
}

impl ScrapedListings {
    pub fn absorb(&mut self, page: ExtractedPage) {
        self.pages_fetched += 1;
        self.titles.extend(page.titles);
        self.prices.extend(page.prices);
        self.discounts.extend(page.discounts);
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Number of records [`into_records`](Self::into_records) will produce.
    pub fn record_count(&self) -> usize {
        self.titles
            .len()
            .min(self.prices.len())
            .min(self.discounts.len())
    }

    /// Zips the parallel lists into records. Lists of unequal length are
    /// truncated to the shortest one.
    pub fn into_records(self, observed_at: DateTime<Utc>) -> Vec<OfferRecord> {
        if self.record_count() < self.titles.len().max(self.prices.len()).max(self.discounts.len()) {
            tracing::debug!(
                "Field counts differ (titles={}, prices={}, discounts={}); truncating to {}",
                self.titles.len(),
                self.prices.len(),
                self.discounts.len(),
                self.record_count()
            );
        }

        self.titles
            .into_iter()
            .zip(self.prices)
            .zip(self.discounts)
            .map(|((title, price_text), discount)| OfferRecord::new(title, price_text, discount, observed_at))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferRecord {
    pub title: String,
    #[serde(rename = "price")]
    pub price_text: String,
    #[serde(rename = "price_value")]
    pub price: Option<Price>,
    pub discount: String,
    pub discount_percent: Option<u8>,
    pub observed_at: DateTime<Utc>,
}

impl OfferRecord {
    pub fn new(title: String, price_text: String, discount: String, observed_at: DateTime<Utc>) -> Self {
        let price = normalize_price(&price_text);
        let discount_percent = parse_discount_percent(&discount);
        Self {
            title,
            price_text,
            price,
            discount,
            discount_percent,
            observed_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub records: Vec<OfferRecord>,
    pub csv_output: String,
    pub html_output: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_absorb_counts_pages_and_appends() {
        let mut listings = ScrapedListings::default();
        listings.absorb(ExtractedPage {
            titles: strings(&["A", "B"]),
            prices: strings(&["10", "20"]),
            discounts: strings(&["5% OFF", "10% OFF"]),
        });
        listings.absorb(ExtractedPage {
            titles: strings(&["C"]),
            prices: strings(&["30"]),
            discounts: strings(&["15% OFF"]),
        });

        assert_eq!(listings.pages_fetched, 2);
        assert_eq!(listings.titles, strings(&["A", "B", "C"]));
        assert_eq!(listings.record_count(), 3);
    }

    #[test]
    fn test_into_records_truncates_to_shortest_list() {
        let listings = ScrapedListings {
            pages_fetched: 1,
            titles: strings(&["A", "B", "C", "D"]),
            prices: strings(&["R$ 10", "R$ 20,50", "oops"]),
            discounts: strings(&["5% OFF", "10% OFF", "", "20% OFF", "30% OFF"]),
        };
        let observed_at = Utc::now();

        let records = listings.into_records(observed_at);

        assert_eq!(records.len(), 3);
        assert_eq!(records[1].title, "B");
        assert_eq!(records[1].price, Some(Price::from_cents(2_050)));
        assert_eq!(records[1].discount_percent, Some(10));
        assert_eq!(records[2].price, None);
        assert_eq!(records[2].discount_percent, None);
        assert!(records.iter().all(|r| r.observed_at == observed_at));
    }

    #[test]
    fn test_into_records_with_missing_list_is_empty() {
        let listings = ScrapedListings {
            pages_fetched: 1,
            titles: strings(&["A"]),
            prices: strings(&["R$ 10"]),
            discounts: Vec::new(),
        };
        assert!(listings.into_records(Utc::now()).is_empty());
    }
}
