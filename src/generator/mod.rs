pub mod name;
pub mod output;
pub mod rebuild;

pub use name::NameBuilder;
pub use output::OutputWriter;
pub use rebuild::rebuild_uri;
