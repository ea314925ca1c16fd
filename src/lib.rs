//! Proxy-link aggregation pipeline.
//!
//! Collects share links from public sources, decodes them into semantic
//! records per protocol, classifies them by endpoint country, tests
//! reachability, and republishes them under canonical names.

pub mod classifier;
pub mod collector;
pub mod dedup;
pub mod extractor;
pub mod generator;
pub mod models;
pub mod parser;
pub mod settings;
pub mod tester;
pub mod utils;

pub use classifier::Classifier;
pub use collector::Collector;
pub use dedup::dedup_records;
pub use extractor::extract_links;
pub use generator::{rebuild_uri, NameBuilder, OutputWriter};
pub use models::{Protocol, ProxyRecord, Transport};
pub use parser::{parse_link, DecodeError};
pub use settings::Settings;
pub use tester::test_records;
