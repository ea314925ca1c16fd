use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::bail;
use clap::Parser;
use env_logger::Env;
use log::{debug, info, warn};

use linkfarm::classifier::Classifier;
use linkfarm::collector::Collector;
use linkfarm::dedup::dedup_records;
use linkfarm::generator::OutputWriter;
use linkfarm::parser::parse_link;
use linkfarm::settings::Settings;
use linkfarm::tester::test_records;

#[derive(Parser, Debug)]
#[command(author, version, about = "Collect, classify and republish proxy share links")]
struct Args {
    /// Path to a TOML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory (overrides settings)
    #[arg(short, long)]
    output: Option<String>,

    /// Skip the TCP reachability stage
    #[arg(long)]
    skip_test: bool,

    /// Connection timeout in seconds (overrides settings)
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum concurrent network operations (overrides settings)
    #[arg(long)]
    workers: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load(path)?,
        None => {
            let default_path = Path::new("config.toml");
            if default_path.exists() {
                Settings::load(default_path)?
            } else {
                Settings::default()
            }
        }
    };
    if let Some(output) = args.output {
        settings.output_dir = output;
    }
    if let Some(timeout) = args.timeout {
        settings.connection_timeout_secs = timeout;
    }
    if let Some(workers) = args.workers {
        settings.max_workers = workers;
    }

    // Stage 1: collect raw links from every source
    let collector = Collector::new(&settings)?;
    let links = collector.collect_all().await;
    if links.is_empty() {
        bail!("no configs collected from any source");
    }

    // Stage 2: decode links into semantic records
    let mut records = Vec::new();
    for link in &links {
        match parse_link(link) {
            Ok(record) => records.push(record),
            Err(e) => debug!("Skipping undecodable link: {}", e),
        }
    }
    info!("Parsed {} of {} collected links", records.len(), links.len());
    if records.is_empty() {
        bail!("no collected link could be decoded");
    }

    // Stage 3: classify by country and CDN
    let mut classifier = Classifier::new(&settings)?;
    classifier.load_iran_ranges().await;
    let mut categorized = classifier.classify_records(records).await;

    // Stage 4: dedup within each country bucket
    for records in categorized.values_mut() {
        let deduped = dedup_records(std::mem::take(records));
        *records = deduped;
    }

    // Stage 5: reachability tests for the configured countries
    let mut tested = std::collections::HashMap::new();
    if args.skip_test {
        info!("Skipping connection tests");
    } else {
        let deadline = Duration::from_secs(settings.connection_timeout_secs);
        for country in &settings.test_countries {
            let Some(records) = categorized.get(country) else {
                continue;
            };
            let passed = test_records(records.clone(), deadline, settings.max_workers).await;
            if passed.is_empty() {
                warn!("No reachable configs for {}", country);
            } else {
                tested.insert(country.clone(), passed);
            }
        }
    }

    // Stage 6: write the output tree
    let writer = OutputWriter::new(&settings);
    writer.write_all(&categorized, &tested);

    let total: usize = categorized.values().map(Vec::len).sum();
    info!(
        "Done: {} configs across {} countries written to {}",
        total,
        categorized.len(),
        settings.output_dir
    );
    Ok(())
}
