//! Run configuration.
//!
//! All lookup tables (source lists, CDN ranges, flag map) live here and are
//! passed into the components that need them at construction, so tests can
//! substitute fixtures. A TOML file can override any field; the defaults
//! mirror the stock source lists.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub telegram_channels: Vec<String>,
    pub github_repos: Vec<String>,
    pub public_apis: Vec<String>,
    pub web_scrape_urls: Vec<String>,

    pub arvan_cloud_ranges: Vec<String>,
    pub derak_cloud_ranges: Vec<String>,
    pub cloudflare_ranges: Vec<String>,
    /// URL of a newline-delimited CIDR list for the priority country.
    pub iran_cidr_url: String,

    /// Countries whose records get a TCP reachability pass.
    pub test_countries: Vec<String>,

    pub output_dir: String,
    pub connection_timeout_secs: u64,
    pub max_workers: usize,

    pub country_flags: HashMap<String, String>,
    pub cdn_names: HashMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            telegram_channels: to_strings(&[
                "https://t.me/s/v2ray_config_pool",
                "https://t.me/s/PrivateVPNs",
                "https://t.me/s/DirectVPN",
                "https://t.me/s/V2rayNGn",
                "https://t.me/s/free4allVPN",
                "https://t.me/s/vpn_ioss",
                "https://t.me/s/ShadowSocks_s",
                "https://t.me/s/azadi_az_inja_migzare",
                "https://t.me/s/WomanLifeFreedomVPN",
                "https://t.me/s/Outline_Vpn",
            ]),
            github_repos: to_strings(&[
                "yebekhe/TelegramV2rayCollector",
                "mfuu/v2ray",
                "aiboboxx/v2rayfree",
                "peasoft/NoMoreWalls",
                "mahdibland/V2RayAggregator",
                "Barry-far/V2ray-Configs",
                "coldwater-10/V2rayCollector",
            ]),
            public_apis: to_strings(&[
                "https://raw.githubusercontent.com/yebekhe/TelegramV2rayCollector/main/sub/mix",
                "https://raw.githubusercontent.com/mfuu/v2ray/master/v2ray",
                "https://raw.githubusercontent.com/aiboboxx/v2rayfree/main/v2",
                "https://raw.githubusercontent.com/peasoft/NoMoreWalls/master/list.txt",
            ]),
            web_scrape_urls: Vec::new(),
            arvan_cloud_ranges: to_strings(&[
                "185.143.232.0/22",
                "188.114.96.0/20",
                "5.213.255.0/24",
            ]),
            derak_cloud_ranges: to_strings(&["151.243.0.0/16"]),
            cloudflare_ranges: to_strings(&["173.245.48.0/20", "103.21.244.0/22"]),
            iran_cidr_url:
                "https://raw.githubusercontent.com/herrbischoff/country-ip-blocks/master/ipv4/ir.cidr"
                    .to_string(),
            test_countries: to_strings(&["IR", "DE"]),
            output_dir: "output".to_string(),
            connection_timeout_secs: 10,
            max_workers: 20,
            country_flags: default_country_flags(),
            cdn_names: default_cdn_names(),
        }
    }
}

impl Settings {
    /// Loads settings from a TOML file, falling back to defaults for any
    /// field the file does not set.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file {}", path.display()))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("failed to parse settings file {}", path.display()))?;
        Ok(settings)
    }

    /// The raw-content URL candidates probed for one GitHub repo.
    pub fn github_raw_paths(&self, repo: &str) -> Vec<String> {
        vec![
            format!("https://raw.githubusercontent.com/{}/main/sub/mix", repo),
            format!("https://raw.githubusercontent.com/{}/main/sub/base64", repo),
            format!("https://raw.githubusercontent.com/{}/master/sub/mix", repo),
            format!("https://raw.githubusercontent.com/{}/main/configs.txt", repo),
            format!("https://raw.githubusercontent.com/{}/master/v2ray", repo),
        ]
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_country_flags() -> HashMap<String, String> {
    [
        ("IR", "🇮🇷"), ("DE", "🇩🇪"), ("US", "🇺🇸"), ("GB", "🇬🇧"),
        ("FR", "🇫🇷"), ("NL", "🇳🇱"), ("CA", "🇨🇦"), ("SG", "🇸🇬"),
        ("JP", "🇯🇵"), ("KR", "🇰🇷"), ("HK", "🇭🇰"), ("TW", "🇹🇼"),
        ("AU", "🇦🇺"), ("IN", "🇮🇳"), ("RU", "🇷🇺"), ("TR", "🇹🇷"),
        ("AE", "🇦🇪"), ("SE", "🇸🇪"), ("FI", "🇫🇮"), ("PL", "🇵🇱"),
        ("UA", "🇺🇦"), ("BR", "🇧🇷"), ("AR", "🇦🇷"), ("MX", "🇲🇽"),
        ("ZA", "🇿🇦"), ("EG", "🇪🇬"), ("CH", "🇨🇭"), ("AT", "🇦🇹"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn default_cdn_names() -> HashMap<String, String> {
    [
        ("arvancloud", "☁️ArvanCloud"),
        ("derakcloud", "☁️DerakCloud"),
        ("cloudflare", "☁️Cloudflare"),
        ("asiatech", "☁️AsiaTech"),
        ("farapik", "☁️FaraPik"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}
