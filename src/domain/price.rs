use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::LazyLock;

// Thousands separated by '.', cents by ','. Currency prefix is optional.
static PRICE_WITH_CENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:R\$\s*)?(\d{1,3}(?:\.\d{3})+|\d+),(\d{2})$").expect("valid price pattern")
});
static PRICE_WHOLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:R\$\s*)?(\d{1,3}(?:\.\d{3})+|\d+)$").expect("valid price pattern")
});
static DISCOUNT_PERCENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\s*%").expect("valid discount pattern"));

/// A monetary amount held as integer cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    cents: u64,
}

impl Price {
    pub fn from_cents(cents: u64) -> Self {
        Self { cents }
    }

    pub fn cents(&self) -> u64 {
        self.cents
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.cents / 100, self.cents % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses a listing price label into a [`Price`].
///
/// Two forms are recognised, each with an optional `R$` prefix:
/// a whole amount with cents (`1.299,90`) and a whole amount alone (`1.299`).
/// Anything else, including amounts that overflow, yields `None`.
pub fn normalize_price(text: &str) -> Option<Price> {
    let text = text.trim();

    if let Some(caps) = PRICE_WITH_CENTS.captures(text) {
        let whole = parse_grouped(&caps[1])?;
        let cents: u64 = caps[2].parse().ok()?;
        return whole
            .checked_mul(100)?
            .checked_add(cents)
            .map(Price::from_cents);
    }

    if let Some(caps) = PRICE_WHOLE.captures(text) {
        let whole = parse_grouped(&caps[1])?;
        return whole.checked_mul(100).map(Price::from_cents);
    }

    None
}

/// Reads the first `NN%` out of a discount label such as `15% OFF`.
pub fn parse_discount_percent(text: &str) -> Option<u8> {
    let caps = DISCOUNT_PERCENT.captures(text)?;
    let percent: u32 = caps[1].parse().ok()?;
    if percent > 100 {
        return None;
    }
    u8::try_from(percent).ok()
}

fn parse_grouped(digits: &str) -> Option<u64> {
    digits.replace('.', "").parse().ok()
}
