//! Source fetching and link harvesting.
//!
//! Pulls raw text from the configured Telegram channel mirrors, GitHub
//! repositories, public APIs and scraped web pages, runs every payload
//! through the link extractor, and unions the results. Any source failure
//! is logged and contributes nothing; the run keeps going.

use std::collections::HashSet;
use std::time::Duration;

use futures::{stream, StreamExt};
use log::{debug, info, warn};
use reqwest::Client;

use crate::extractor::extract_links;
use crate::settings::Settings;
use crate::utils::html_to_text;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/120.0.0.0 Safari/537.36";

pub struct Collector {
    client: Client,
    settings: Settings,
}

enum Source {
    /// Markup page: stripped to text before extraction.
    Html(String),
    /// Plain payload: extracted as-is (raw text or base64 blobs both work,
    /// since decode happens later per link).
    Plain(String),
    /// GitHub repository: candidate raw paths tried in order, first hit wins.
    Repo(String),
}

impl Collector {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.connection_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Collector {
            client,
            settings: settings.clone(),
        })
    }

    async fn fetch(&self, url: &str) -> Option<String> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!("Failed to fetch {}: {}", url, e);
                return None;
            }
        };
        if !response.status().is_success() {
            debug!("Skipping {}: HTTP {}", url, response.status());
            return None;
        }
        response.text().await.ok()
    }

    async fn harvest(&self, source: Source) -> HashSet<String> {
        match source {
            Source::Html(url) => {
                let Some(body) = self.fetch(&url).await else {
                    return HashSet::new();
                };
                let links = extract_links(&html_to_text(&body));
                debug!("Found {} configs from {}", links.len(), url);
                links
            }
            Source::Plain(url) => {
                let Some(body) = self.fetch(&url).await else {
                    return HashSet::new();
                };
                let links = extract_links(&body);
                debug!("Found {} configs from {}", links.len(), url);
                links
            }
            Source::Repo(repo) => {
                for url in self.settings.github_raw_paths(&repo) {
                    if let Some(body) = self.fetch(&url).await {
                        let links = extract_links(&body);
                        debug!("Found {} configs from {}", links.len(), repo);
                        return links;
                    }
                }
                warn!("No reachable raw file for repo {}", repo);
                HashSet::new()
            }
        }
    }

    /// Fetches every configured source with bounded parallelism and unions
    /// the harvested links.
    pub async fn collect_all(&self) -> HashSet<String> {
        let mut sources: Vec<Source> = Vec::new();
        for channel in &self.settings.telegram_channels {
            sources.push(Source::Html(channel.clone()));
        }
        for url in &self.settings.web_scrape_urls {
            sources.push(Source::Html(url.clone()));
        }
        for url in &self.settings.public_apis {
            sources.push(Source::Plain(url.clone()));
        }
        for repo in &self.settings.github_repos {
            sources.push(Source::Repo(repo.clone()));
        }

        info!("Collecting configs from {} sources...", sources.len());

        let harvested: Vec<HashSet<String>> = stream::iter(sources)
            .map(|source| self.harvest(source))
            .buffer_unordered(self.settings.max_workers)
            .collect()
            .await;

        let mut links = HashSet::new();
        for batch in harvested {
            links.extend(batch);
        }
        info!("Collected {} unique raw configs", links.len());
        links
    }
}
