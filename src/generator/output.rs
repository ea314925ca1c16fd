//! Per-country output bundles.
//!
//! For every country bucket the writer renames the records with their
//! canonical names, re-encodes the links, and emits a JSON document, a
//! plain-text list and a base64 subscription blob, plus a README summary
//! over the whole run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{error, info};
use serde_json::{json, Value};

use crate::generator::{rebuild_uri, NameBuilder};
use crate::models::{ProxyRecord, Transport};
use crate::settings::Settings;
use crate::utils::base64_encode;

pub struct OutputWriter {
    output_dir: PathBuf,
    name_builder: NameBuilder,
    country_flags: HashMap<String, String>,
}

impl OutputWriter {
    pub fn new(settings: &Settings) -> Self {
        OutputWriter {
            output_dir: PathBuf::from(&settings.output_dir),
            name_builder: NameBuilder::new(
                settings.country_flags.clone(),
                settings.cdn_names.clone(),
            ),
            country_flags: settings.country_flags.clone(),
        }
    }

    /// Writes every bucket plus the README. A failed bucket is logged and
    /// skipped; the rest of the run still gets written.
    pub fn write_all(
        &self,
        categorized: &HashMap<String, Vec<ProxyRecord>>,
        tested: &HashMap<String, Vec<ProxyRecord>>,
    ) {
        info!("Generating output files...");

        for (country, records) in categorized {
            if let Err(e) = self.write_country(country, records, false) {
                error!("Error generating outputs for {}: {}", country, e);
            }
        }
        for (country, records) in tested {
            if let Err(e) = self.write_country(country, records, true) {
                error!("Error generating tested outputs for {}: {}", country, e);
            }
        }
        if let Err(e) = self.write_readme(categorized, tested) {
            error!("Error generating README: {}", e);
        }

        info!("Output generation complete!");
    }

    fn country_dir(&self, country: &str, tested: bool) -> PathBuf {
        let base = if tested {
            "tested"
        } else {
            match country {
                "IR" => "iran",
                "DE" => "germany",
                _ => "others",
            }
        };
        self.output_dir.join(base).join(country.to_lowercase())
    }

    fn write_country(
        &self,
        country: &str,
        records: &[ProxyRecord],
        tested: bool,
    ) -> std::io::Result<()> {
        let dir = self.country_dir(country, tested);
        fs::create_dir_all(&dir)?;
        let prefix = if tested { "tested_" } else { "" };

        // Renaming happens at generation time: records are numbered by
        // their 1-based position in this bucket.
        let rebuilt: Vec<(Value, String)> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let name = self.name_builder.build(record, idx + 1);
                let uri = rebuild_uri(record, &name);
                (record_to_json(record, &name, &uri), uri)
            })
            .collect();

        let document = json!({
            "updated": Utc::now().to_rfc3339(),
            "count": rebuilt.len(),
            "configs": rebuilt.iter().map(|(v, _)| v.clone()).collect::<Vec<_>>(),
        });
        fs::write(
            dir.join(format!("{}configs.json", prefix)),
            serde_json::to_string_pretty(&document).unwrap_or_default(),
        )?;

        let mut txt = String::new();
        for (_, uri) in &rebuilt {
            txt.push_str(uri);
            txt.push('\n');
        }
        fs::write(dir.join(format!("{}configs.txt", prefix)), &txt)?;

        let joined: Vec<&str> = rebuilt.iter().map(|(_, uri)| uri.as_str()).collect();
        fs::write(
            dir.join(format!("{}subscription.txt", prefix)),
            base64_encode(&joined.join("\n")),
        )?;

        info!(
            "Generated outputs for {} ({})",
            country,
            if tested { "tested" } else { "all" }
        );
        Ok(())
    }

    fn write_readme(
        &self,
        categorized: &HashMap<String, Vec<ProxyRecord>>,
        tested: &HashMap<String, Vec<ProxyRecord>>,
    ) -> std::io::Result<()> {
        fs::create_dir_all(&self.output_dir)?;

        let total: usize = categorized.values().map(Vec::len).sum();
        let total_tested: usize = tested.values().map(Vec::len).sum();

        let mut readme = String::new();
        readme.push_str("# 🌐 Free Proxy Configs\n\n");
        readme.push_str(&format!(
            "**Last Updated:** {} UTC\n\n",
            Utc::now().format("%Y-%m-%d %H:%M:%S")
        ));
        readme.push_str("## 📊 Statistics\n\n");
        readme.push_str(&format!("- **Total Configs:** {}\n", total));
        readme.push_str(&format!("- **Tested & Working:** {}\n", total_tested));
        readme.push_str(&format!("- **Countries:** {}\n\n", categorized.len()));

        if let Some(records) = categorized.get("IR") {
            let tested_count = tested.get("IR").map_or(0, Vec::len);
            readme.push_str("## 🇮🇷 Iran Configs (Priority)\n\n");
            readme.push_str(&format!("- **Total:** {}\n", records.len()));
            readme.push_str(&format!("- **Tested:** {}\n\n", tested_count));
            readme.push_str("### 📥 Download Links:\n");
            readme.push_str("- [JSON](iran/ir/configs.json)\n");
            readme.push_str("- [TXT](iran/ir/configs.txt)\n");
            readme.push_str("- [Subscription](iran/ir/subscription.txt)\n");
            if tested_count > 0 {
                readme.push_str("- [Tested Subscription](tested/ir/tested_subscription.txt) ✅\n");
            }
            readme.push('\n');
        }

        if let Some(records) = categorized.get("DE") {
            let tested_count = tested.get("DE").map_or(0, Vec::len);
            readme.push_str("## 🇩🇪 Germany Configs\n\n");
            readme.push_str(&format!("- **Total:** {}\n", records.len()));
            readme.push_str(&format!("- **Tested:** {}\n\n", tested_count));
            readme.push_str("### 📥 Download Links:\n");
            readme.push_str("- [JSON](germany/de/configs.json)\n");
            readme.push_str("- [TXT](germany/de/configs.txt)\n");
            readme.push_str("- [Subscription](germany/de/subscription.txt)\n");
            if tested_count > 0 {
                readme.push_str("- [Tested Subscription](tested/de/tested_subscription.txt) ✅\n");
            }
            readme.push('\n');
        }

        let mut others: Vec<&String> = categorized
            .keys()
            .filter(|c| c.as_str() != "IR" && c.as_str() != "DE")
            .collect();
        others.sort();
        if !others.is_empty() {
            readme.push_str("## 🌍 Other Countries\n\n");
            for country in others {
                let flag = self
                    .country_flags
                    .get(country)
                    .map(String::as_str)
                    .unwrap_or("🌐");
                let lower = country.to_lowercase();
                readme.push_str(&format!("### {} {}\n", flag, country));
                readme.push_str(&format!(
                    "- **Count:** {}\n",
                    categorized[country].len()
                ));
                readme.push_str(&format!(
                    "- [JSON](others/{}/configs.json) | [TXT](others/{}/configs.txt) | [Subscription](others/{}/subscription.txt)\n\n",
                    lower, lower, lower
                ));
            }
        }

        readme.push_str("\n---\n*🤖 Auto-updated every 4 hours via GitHub Actions*\n");
        fs::write(Path::new(&self.output_dir).join("README.md"), readme)
    }
}

/// One record in the output JSON, in the collector's established shape:
/// protocol-specific fields only, with `original` replaced by the rebuilt
/// link.
fn record_to_json(record: &ProxyRecord, name: &str, rebuilt: &str) -> Value {
    let mut object = json!({
        "type": record.protocol.as_str(),
        "address": record.address,
        "port": record.port,
        "name": name,
    });
    let map = object.as_object_mut().unwrap();

    match &record.transport {
        Transport::Vmess {
            network, host, sni, ..
        } => {
            map.insert("id".into(), json!(record.identity));
            map.insert("network".into(), json!(network));
            map.insert("host".into(), json!(host));
            map.insert("sni".into(), json!(sni));
        }
        Transport::Vless {
            network, sni, host, ..
        } => {
            map.insert("id".into(), json!(record.identity));
            map.insert("network".into(), json!(network));
            map.insert("sni".into(), json!(sni));
            map.insert("host".into(), json!(host));
        }
        Transport::Trojan { sni, host, .. } => {
            map.insert("password".into(), json!(record.identity));
            map.insert("sni".into(), json!(sni));
            map.insert("host".into(), json!(host));
        }
        Transport::Ss { method, plugin } => {
            map.insert("method".into(), json!(method));
            map.insert("password".into(), json!(record.identity));
            map.insert("plugin".into(), json!(plugin));
        }
        Transport::Ssr | Transport::Hysteria | Transport::Tuic => {}
    }

    if let Some(ip) = &record.ip {
        map.insert("ip".into(), json!(ip));
    }
    if let Some(country) = &record.country {
        map.insert("country".into(), json!(country));
    }
    if let Some(cdn) = &record.cdn {
        map.insert("cdn".into(), json!(cdn));
    }
    map.insert("original".into(), json!(rebuilt));

    object
}
