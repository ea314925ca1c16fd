//! Geo/CDN classification.
//!
//! Annotates records with their endpoint IP, country code and CDN label.
//! CIDR tables are injected from settings at construction; only the
//! country lookup for addresses outside those tables goes to the network.
//! Records that cannot be attributed to a country are dropped from the
//! categorized result (no "unknown" bucket).

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Mutex;
use std::time::Duration;

use futures::{stream, StreamExt};
use ipnet::IpNet;
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;

use crate::models::ProxyRecord;
use crate::settings::Settings;

pub struct Classifier {
    client: Client,
    iran_cidr_url: String,
    iran_ranges: Vec<IpNet>,
    arvan_ranges: Vec<IpNet>,
    derak_ranges: Vec<IpNet>,
    cloudflare_ranges: Vec<IpNet>,
    max_workers: usize,
    ip_cache: Mutex<HashMap<String, Option<IpAddr>>>,
}

fn parse_ranges(cidrs: &[String]) -> Vec<IpNet> {
    cidrs.iter().filter_map(|c| c.parse().ok()).collect()
}

impl Classifier {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.connection_timeout_secs))
            .build()?;

        let arvan_ranges = parse_ranges(&settings.arvan_cloud_ranges);
        let derak_ranges = parse_ranges(&settings.derak_cloud_ranges);

        // Iranian CDN ranges short-circuit to IR even before the
        // published country list is loaded
        let mut iran_ranges = arvan_ranges.clone();
        iran_ranges.extend(derak_ranges.iter().cloned());

        Ok(Classifier {
            client,
            iran_cidr_url: settings.iran_cidr_url.clone(),
            iran_ranges,
            arvan_ranges,
            derak_ranges,
            cloudflare_ranges: parse_ranges(&settings.cloudflare_ranges),
            max_workers: settings.max_workers,
            ip_cache: Mutex::new(HashMap::new()),
        })
    }

    /// Fetches the published IR CIDR list and extends the in-table ranges.
    /// Best effort; classification falls back to the HTTP lookup when the
    /// list is unavailable.
    pub async fn load_iran_ranges(&mut self) {
        let text = match self.client.get(&self.iran_cidr_url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!("Could not read Iran IP ranges: {}", e);
                    return;
                }
            },
            Ok(response) => {
                warn!("Could not load Iran IP ranges: HTTP {}", response.status());
                return;
            }
            Err(e) => {
                warn!("Could not load Iran IP ranges: {}", e);
                return;
            }
        };

        let before = self.iran_ranges.len();
        self.iran_ranges
            .extend(text.lines().filter_map(|line| line.trim().parse::<IpNet>().ok()));
        info!("Loaded {} Iran IP ranges", self.iran_ranges.len() - before);
    }

    /// Resolves a hostname to an IP, or passes a literal IP through.
    /// Results (including failures) are cached for the life of the run.
    pub async fn resolve(&self, address: &str) -> Option<IpAddr> {
        if let Some(cached) = self.ip_cache.lock().ok()?.get(address) {
            return *cached;
        }

        let resolved = match address.parse::<IpAddr>() {
            Ok(ip) => Some(ip),
            Err(_) => tokio::net::lookup_host((address, 0))
                .await
                .ok()
                .and_then(|mut addrs| addrs.next())
                .map(|addr| addr.ip()),
        };

        if let Ok(mut cache) = self.ip_cache.lock() {
            cache.insert(address.to_string(), resolved);
        }
        resolved
    }

    /// Country attribution from the injected CIDR tables only.
    pub fn country_from_tables(&self, ip: &IpAddr) -> Option<String> {
        if self.iran_ranges.iter().any(|net| net.contains(ip)) {
            return Some("IR".to_string());
        }
        None
    }

    /// Full country lookup: tables first, then the ipinfo.io oracle.
    pub async fn country(&self, ip: &IpAddr) -> Option<String> {
        if let Some(country) = self.country_from_tables(ip) {
            return Some(country);
        }

        let url = format!("https://ipinfo.io/{}/json", ip);
        let response = self.client.get(&url).send().await.ok()?;
        if !response.status().is_success() {
            return None;
        }
        let body: Value = response.json().await.ok()?;
        body["country"].as_str().map(|c| c.to_string())
    }

    /// CDN attribution from the injected CIDR tables.
    pub fn detect_cdn(&self, ip: &IpAddr) -> Option<String> {
        if self.arvan_ranges.iter().any(|net| net.contains(ip)) {
            return Some("arvancloud".to_string());
        }
        if self.derak_ranges.iter().any(|net| net.contains(ip)) {
            return Some("derakcloud".to_string());
        }
        if self.cloudflare_ranges.iter().any(|net| net.contains(ip)) {
            return Some("cloudflare".to_string());
        }
        None
    }

    async fn process(&self, mut record: ProxyRecord) -> Option<(String, ProxyRecord)> {
        if record.address.is_empty() {
            return None;
        }
        let ip = self.resolve(&record.address).await?;
        let country = self.country(&ip).await?;

        record.ip = Some(ip.to_string());
        record.cdn = self.detect_cdn(&ip);
        record.country = Some(country.clone());
        Some((country, record))
    }

    /// Annotates every record and buckets them by country, with bounded
    /// parallelism. Records without a resolvable country are dropped
    /// silently.
    pub async fn classify_records(
        &self,
        records: Vec<ProxyRecord>,
    ) -> HashMap<String, Vec<ProxyRecord>> {
        info!("Filtering and categorizing {} configs...", records.len());

        let results: Vec<Option<(String, ProxyRecord)>> = stream::iter(records)
            .map(|record| self.process(record))
            .buffer_unordered(self.max_workers)
            .collect()
            .await;

        let mut categorized: HashMap<String, Vec<ProxyRecord>> = HashMap::new();
        for result in results.into_iter().flatten() {
            let (country, record) = result;
            categorized.entry(country).or_default().push(record);
        }

        for (country, records) in &categorized {
            debug!("Found {} configs for {}", records.len(), country);
        }
        categorized
    }
}
