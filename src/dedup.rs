//! Record deduplication.

use std::collections::HashSet;

use log::info;

use crate::models::ProxyRecord;

/// Collapses records to one per unique (protocol, address, port, identity)
/// tuple, keeping the first-seen record for each key. Order-preserving; the
/// removed count is logged for observability only.
pub fn dedup_records(records: Vec<ProxyRecord>) -> Vec<ProxyRecord> {
    let before = records.len();
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(before);

    for record in records {
        let key = (
            record.protocol,
            record.address.clone(),
            record.port.clone(),
            record.identity.clone(),
        );
        if seen.insert(key) {
            unique.push(record);
        }
    }

    let removed = before - unique.len();
    if removed > 0 {
        info!("Removed {} duplicate configs", removed);
    }
    unique
}
