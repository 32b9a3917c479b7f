use async_trait::async_trait;
use httpmock::prelude::*;
use promo_etl::core::{ConfigProvider, Mailer};
use promo_etl::domain::model::EmailMessage;
use promo_etl::{EtlEngine, LocalStorage, OffersPipeline, TomlConfig};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

fn listing_page(offers: &[(&str, &str, &str, &str)]) -> String {
    let items: String = offers
        .iter()
        .map(|(title, whole, cents, discount)| {
            format!(
                r#"<li class="promotion-item">
  <p class="promotion-item__title">{title}</p>
  <span class="promotion-item__price">R$ {whole}<sup>{cents}</sup></span>
  <span class="promotion-item__discount-text">{discount}</span>
</li>"#
            )
        })
        .collect();
    format!("<html><body><ol>{}</ol></body></html>", items)
}

fn config_for(server: &MockServer, output_path: &str, load: &str) -> TomlConfig {
    let toml_content = format!(
        r#"
[scraper]
name = "integration"

[source]
url = "{}"
max_pages = 10

[load]
output_path = "{}"
{}
"#,
        server.url("/ofertas"),
        output_path,
        load
    );
    TomlConfig::from_toml_str(&toml_content).unwrap()
}

#[tokio::test]
async fn test_end_to_end_csv_stops_at_empty_page() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let page1 = server.mock(|when, then| {
        when.method(GET).path("/ofertas").query_param("page", "1");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(listing_page(&[
                ("Smart TV 50\"", "2.199", "90", "21% OFF"),
                ("Fone Bluetooth", "89", "99", "10% OFF"),
            ]));
    });
    let page2 = server.mock(|when, then| {
        when.method(GET).path("/ofertas").query_param("page", "2");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(listing_page(&[("Cafeteira", "349", "00", "35% OFF")]));
    });
    let page3 = server.mock(|when, then| {
        when.method(GET).path("/ofertas").query_param("page", "3");
        then.status(200)
            .header("Content-Type", "text/html")
            .body(listing_page(&[]));
    });
    let page4 = server.mock(|when, then| {
        when.method(GET).path("/ofertas").query_param("page", "4");
        then.status(200)
            .body(listing_page(&[("Never fetched", "1", "00", "1% OFF")]));
    });

    let config = config_for(&server, &output_path, "");
    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = OffersPipeline::new(storage, config).unwrap();
    let engine = EtlEngine::new(pipeline);

    let destination = engine.run().await.unwrap();

    page1.assert();
    page2.assert();
    page3.assert();
    page4.assert_hits(0);

    assert!(destination.ends_with("offers.csv"));
    let csv = std::fs::read_to_string(temp_dir.path().join("offers.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0], "title,price,price_value,discount,discount_percent,observed_at");
    assert!(lines[1].starts_with(r#""Smart TV 50""","R$ 2.199,90",2199.90,21% OFF,21,"#));
    assert!(lines[3].starts_with(r#"Cafeteira,"R$ 349,00",349.00,35% OFF,35,"#));
}

#[tokio::test]
async fn test_end_to_end_fetch_failure_degrades_to_empty_csv() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let failing = server.mock(|when, then| {
        when.method(GET).path("/ofertas");
        then.status(500);
    });

    let config = config_for(&server, &output_path, "");
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = OffersPipeline::new(storage, config).unwrap();

    let result = EtlEngine::new(pipeline).run().await;

    assert!(result.is_ok());
    failing.assert_hits(1);
    let csv = std::fs::read_to_string(temp_dir.path().join("offers.csv")).unwrap();
    assert_eq!(csv, "title,price,price_value,discount,discount_percent,observed_at\n");
}

#[tokio::test]
async fn test_end_to_end_compressed_output() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ofertas").query_param("page", "1");
        then.status(200)
            .body(listing_page(&[("Air Fryer", "349", "90", "30% OFF")]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/ofertas").query_param("page", "2");
        then.status(404);
    });

    let config = config_for(
        &server,
        &output_path,
        "csv_filename = \"deals.csv\"\ncompress = true",
    );
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = OffersPipeline::new(storage, config).unwrap();

    let destination = EtlEngine::new(pipeline).run().await.unwrap();
    assert!(destination.ends_with("deals.zip"));

    let zip_data = std::fs::read(temp_dir.path().join("deals.zip")).unwrap();
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data)).unwrap();
    assert_eq!(archive.len(), 1);

    let mut csv_file = archive.by_name("deals.csv").unwrap();
    let mut csv = String::new();
    std::io::Read::read_to_string(&mut csv_file, &mut csv).unwrap();
    assert!(csv.contains("Air Fryer,\"R$ 349,90\",349.90"));
}

#[derive(Clone, Default)]
struct RecordingMailer {
    sent: Arc<Mutex<Vec<EmailMessage>>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: EmailMessage) -> promo_etl::Result<()> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

#[tokio::test]
async fn test_end_to_end_email_summary() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/ofertas").query_param("page", "1");
        then.status(200).body(listing_page(&[
            ("Cabo &lt;USB-C&gt; &amp; fonte", "19", "90", "5% OFF"),
            ("Mouse", "59", "00", "15% OFF"),
        ]));
    });
    server.mock(|when, then| {
        when.method(GET).path("/ofertas").query_param("page", "2");
        then.status(200).body(listing_page(&[]));
    });

    let config = config_for(
        &server,
        &output_path,
        r#"sink = "email"

[email]
smtp_host = "smtp.example.com"
username = "bot@example.com"
password = "not-used"
from = "bot@example.com"
to = ["me@example.com", "you@example.com"]
subject = "Ofertas do dia""#,
    );
    let mailer = RecordingMailer::default();
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = OffersPipeline::new(storage, config)
        .unwrap()
        .with_mailer(mailer.clone());

    let destination = EtlEngine::new(pipeline).run().await.unwrap();
    assert_eq!(destination, "email to me@example.com, you@example.com");

    let sent = mailer.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to.len(), 2);
    assert!(sent[0].html_body.contains("<p>2 offers</p>"));
    assert!(sent[0]
        .html_body
        .contains("<td>Cabo &lt;USB-C&gt; &amp; fonte</td>"));
    assert!(!sent[0].html_body.contains("<USB-C>"));
    assert!(!temp_dir.path().join("offers.csv").exists());
}
