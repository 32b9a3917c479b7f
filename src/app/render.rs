use crate::domain::model::OfferRecord;
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};

pub const CSV_HEADERS: [&str; 6] = [
    "title",
    "price",
    "price_value",
    "discount",
    "discount_percent",
    "observed_at",
];

/// Renders records as CSV. The header row is written even with no records.
pub fn render_csv(records: &[OfferRecord]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer.into_inner().map_err(|e| EtlError::ProcessingError {
        message: format!("failed to flush CSV output: {}", e),
    })?;
    String::from_utf8(bytes).map_err(|e| EtlError::ProcessingError {
        message: format!("CSV output is not valid UTF-8: {}", e),
    })
}

/// Renders records as an HTML table for the email body.
pub fn render_html(records: &[OfferRecord], heading: &str) -> String {
    let mut html = String::from("<html><body>\n");
    html.push_str(&format!("<h2>{}</h2>\n", escape_html(heading)));

    if records.is_empty() {
        html.push_str("<p>No offers found.</p>\n</body></html>\n");
        return html;
    }

    html.push_str(&format!("<p>{} offers</p>\n", records.len()));
    html.push_str("<table border=\"1\" cellpadding=\"4\" cellspacing=\"0\">\n");
    html.push_str("<tr><th>Title</th><th>Price</th><th>Discount</th></tr>\n");
    for record in records {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            escape_html(&record.title),
            escape_html(&record.price_text),
            escape_html(&record.discount)
        ));
    }
    html.push_str("</table>\n</body></html>\n");
    html
}

/// Title to price mapping. A repeated title keeps its last price.
pub fn render_mapping(records: &[OfferRecord]) -> Value {
    let map: Map<String, Value> = records
        .iter()
        .map(|r| (r.title.clone(), Value::String(r.price_text.clone())))
        .collect();
    Value::Object(map)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(title: &str, price: &str, discount: &str) -> OfferRecord {
        let observed_at = Utc.with_ymd_and_hms(2024, 11, 29, 12, 0, 0).unwrap();
        OfferRecord::new(
            title.to_string(),
            price.to_string(),
            discount.to_string(),
            observed_at,
        )
    }

    #[test]
    fn test_csv_with_records() {
        let csv = render_csv(&[
            record("Smart TV, 50\"", "R$ 2.199,90", "21% OFF"),
            record("Mystery box", "consulte", ""),
        ])
        .unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "title,price,price_value,discount,discount_percent,observed_at");
        assert_eq!(
            lines[1],
            r#""Smart TV, 50""","R$ 2.199,90",2199.90,21% OFF,21,2024-11-29T12:00:00Z"#
        );
        assert_eq!(lines[2], "Mystery box,consulte,,,,2024-11-29T12:00:00Z");
    }

    #[test]
    fn test_csv_without_records_is_header_only() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv, "title,price,price_value,discount,discount_percent,observed_at\n");
    }

    #[test]
    fn test_html_escapes_fields() {
        let html = render_html(&[record("Cabo <USB> & carregador", "R$ 19,90", "5% OFF")], "Ofertas");
        assert!(html.contains("<h2>Ofertas</h2>"));
        assert!(html.contains("Cabo &lt;USB&gt; &amp; carregador"));
        assert!(html.contains("<p>1 offers</p>"));
    }

    #[test]
    fn test_html_without_records() {
        let html = render_html(&[], "Ofertas");
        assert!(html.contains("No offers found."));
        assert!(!html.contains("<table"));
    }

    #[test]
    fn test_mapping_keeps_last_duplicate() {
        let mapping = render_mapping(&[
            record("Fone", "R$ 89", "10% OFF"),
            record("Caneca", "R$ 25", "5% OFF"),
            record("Fone", "R$ 79", "20% OFF"),
        ]);
        assert_eq!(
            mapping,
            serde_json::json!({"Fone": "R$ 79", "Caneca": "R$ 25"})
        );
    }
}
