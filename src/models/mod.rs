pub mod record;

pub use record::{Protocol, ProxyRecord, Transport};
