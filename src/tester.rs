//! Reachability probing.
//!
//! A record passes if a TCP connection to its endpoint completes within the
//! configured timeout. Probes run with the same bounded parallelism as the
//! other network stages.

use std::time::Duration;

use futures::{stream, StreamExt};
use log::{debug, info};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::models::ProxyRecord;

/// True when a TCP handshake to `address:port` completes before the deadline.
pub async fn probe(address: &str, port: u16, deadline: Duration) -> bool {
    matches!(
        timeout(deadline, TcpStream::connect((address, port))).await,
        Ok(Ok(_))
    )
}

/// Probes every record and keeps only the reachable ones. Records with an
/// empty address or an unparseable port are dropped.
pub async fn test_records(
    records: Vec<ProxyRecord>,
    deadline: Duration,
    max_workers: usize,
) -> Vec<ProxyRecord> {
    let total = records.len();
    info!("Testing {} configs...", total);

    let tested: Vec<ProxyRecord> = stream::iter(records)
        .map(|record| async move {
            if record.address.is_empty() {
                return None;
            }
            let port: u16 = record.port.parse().ok()?;
            if probe(&record.address, port, deadline).await {
                Some(record)
            } else {
                debug!("Unreachable: {}:{}", record.address, record.port);
                None
            }
        })
        .buffer_unordered(max_workers)
        .filter_map(|result| async move { result })
        .collect()
        .await;

    info!("{}/{} configs passed the connection test", tested.len(), total);
    tested
}
