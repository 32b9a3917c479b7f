use anyhow::Context;
use clap::Parser;
use promo_etl::config::SinkKind;
use promo_etl::core::paginate::page_url;
use promo_etl::core::ConfigProvider;
use promo_etl::utils::{logger, validation::Validate};
use promo_etl::{EtlEngine, LocalStorage, OffersPipeline, TomlConfig};
use std::io::{self, Write};

#[derive(Parser)]
#[command(name = "toml-scrape")]
#[command(about = "Offers scraper driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "offers-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the page limit from config
    #[arg(long)]
    max_pages: Option<u32>,

    /// Show what would be scraped without fetching anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    logger::init_cli_logger(args.verbose, args.log_json);

    tracing::info!("🚀 Starting TOML-based offers scraper");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    if let Some(max_pages) = args.max_pages {
        config.source.max_pages = max_pages;
        tracing::info!("🔧 Page limit overridden to: {}", max_pages);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    write_config_summary(&mut io::stderr(), &config, args.dry_run)
        .context("failed to write configuration summary")?;

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be fetched");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = OffersPipeline::new(storage, config).context("failed to build pipeline")?;
    let engine = EtlEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(destination) => {
            tracing::info!("✅ Scrape completed, offers written to {}", destination);
            eprintln!("✅ Offers delivered to: {}", destination);
        }
        Err(e) => {
            tracing::error!(
                "❌ Scrape failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

/// Writes the run summary. The binary sends it to stderr, keeping stdout for
/// the printed mapping.
fn write_config_summary(out: &mut impl Write, config: &TomlConfig, dry_run: bool) -> io::Result<()> {
    writeln!(out, "📋 Configuration Summary:")?;
    writeln!(out, "  Scraper: {}", config.scraper.name)?;
    if !config.scraper.description.is_empty() {
        writeln!(out, "  Description: {}", config.scraper.description)?;
    }
    writeln!(out, "  Source: {}", config.listing_url())?;
    writeln!(out, "  Page parameter: {}", config.page_param())?;
    writeln!(out, "  Max pages: {}", config.max_pages())?;
    writeln!(out, "  Sink: {}", config.sink())?;

    if config.sink() == SinkKind::Csv {
        writeln!(out, "  Output: {}", config.output_path())?;
    }

    if dry_run {
        writeln!(out, "  🔍 DRY RUN MODE ENABLED")?;
    }

    writeln!(out)
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("📡 Listing pages:");
    let shown = config.max_pages().min(3);
    for page in 1..=shown {
        println!(
            "  {}",
            page_url(config.listing_url(), config.page_param(), page)?
        );
    }
    if config.max_pages() > shown {
        println!("  ... up to page {} or the first page without offers", config.max_pages());
    }
    if let Some(timeout) = config.request_timeout() {
        println!("  Timeout: {:?}", timeout);
    }

    println!();
    println!("🧩 Selectors:");
    let selectors = config.selectors();
    println!("  Title: {}", selectors.title);
    println!("  Price: {} (cents: {})", selectors.price, selectors.price_cents);
    println!("  Discount: {}", selectors.discount);

    println!();
    println!("💾 Output:");
    match config.sink() {
        SinkKind::Print => println!("  Title → price mapping printed to stdout"),
        SinkKind::Csv => {
            let file = if config.compress() {
                format!("{} (zipped)", config.csv_filename())
            } else {
                config.csv_filename().to_string()
            };
            println!("  {} in {}", file, config.output_path());
        }
        SinkKind::Email => {
            if let Some(email) = config.email() {
                println!(
                    "  HTML summary via {}:{} to {}",
                    email.smtp_host,
                    email.smtp_port,
                    email.to.join(", ")
                );
            }
        }
    }

    println!();
    println!("✅ Dry run analysis complete.");

    Ok(())
}
