//! Field extraction from listing page markup.

use crate::config::SelectorConfig;
use crate::domain::model::ExtractedPage;
use crate::utils::error::{EtlError, Result};
use scraper::{ElementRef, Html, Selector};

/// Compiled selectors for the offer fields of a listing page.
#[derive(Debug, Clone)]
pub struct ListingExtractor {
    title: Selector,
    price: Selector,
    price_cents: Selector,
    discount: Selector,
}

impl ListingExtractor {
    pub fn new(selectors: &SelectorConfig) -> Result<Self> {
        Ok(Self {
            title: compile(&selectors.title)?,
            price: compile(&selectors.price)?,
            price_cents: compile(&selectors.price_cents)?,
            discount: compile(&selectors.discount)?,
        })
    }

    /// Extracts the three field lists from one page. The lists are
    /// independent and may differ in length.
    pub fn extract(&self, html: &str) -> ExtractedPage {
        let document = Html::parse_document(html);

        let titles = document.select(&self.title).map(element_text).collect();
        let prices = document
            .select(&self.price)
            .map(|element| self.price_text(element))
            .collect();
        let discounts = document.select(&self.discount).map(element_text).collect();

        ExtractedPage {
            titles,
            prices,
            discounts,
        }
    }

    /// Whole-currency text from the element's first non-empty child (the
    /// cents child excluded), with the cents appended after a comma.
    fn price_text(&self, element: ElementRef<'_>) -> String {
        let cents = element
            .select(&self.price_cents)
            .next()
            .map(element_text)
            .filter(|c| !c.is_empty());

        let main = element
            .children()
            .find_map(|node| {
                if let Some(text) = node.value().as_text() {
                    let text = text.trim();
                    return (!text.is_empty()).then(|| text.to_string());
                }
                let child = ElementRef::wrap(node)?;
                if self.price_cents.matches(&child) {
                    return None;
                }
                Some(element_text(child)).filter(|text| !text.is_empty())
            })
            .unwrap_or_default();

        match cents {
            Some(cents) => format!("{},{}", main, cents),
            None => main,
        }
    }
}

fn compile(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| EtlError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

/// Concatenated descendant text, trimmed.
fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
