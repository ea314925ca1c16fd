pub mod base64;
pub mod string;
pub mod url;

// Re-export common utilities
pub use base64::{base64_encode, safe_base64_decode};
pub use string::{clean_name, html_to_text};
pub use url::{fragment_encode, url_decode, url_encode};
