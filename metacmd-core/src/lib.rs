//! # metacmd core
//!
//! Registry and help listing for the backslash meta commands of an
//! interactive SQL shell. Meta commands are grouped into fixed sections; the
//! listing prints every section with its commands and advertised aliases,
//! aligned to one global column.

pub mod command;
pub mod config;
pub mod error;
pub mod listing;
pub mod registry;
pub mod section;

// Re-export commonly used types at the crate root.
pub use command::{Alias, Desc, MetaCommand};
pub use config::{MetacmdConfig, config_exists, load_config};
pub use error::{ConfigError, ListingError, MetacmdError, RegistryError, Result, SectionParseError};
pub use listing::{Layout, Row, write_listing};
pub use registry::CommandRegistry;
pub use section::Section;
