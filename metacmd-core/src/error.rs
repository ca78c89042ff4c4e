//! Error types for the meta command core.
//!
//! Uses `thiserror` for public API error types. The listing renderer has a
//! single failure mode (the sink rejecting a write); registry and
//! configuration errors are raised while building the registry, before any
//! rendering happens.

/// Top-level error type for the metacmd core library.
#[derive(Debug, thiserror::Error)]
pub enum MetacmdError {
    #[error("Listing error: {0}")]
    Listing(#[from] ListingError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Section error: {0}")]
    Section(#[from] SectionParseError),
}

/// Errors from writing a listing.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("failed to write listing: {0}")]
    SinkWrite(#[from] std::io::Error),
}

/// Errors from registering meta commands.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("'{name}' is already registered (by \\{existing})")]
    Duplicate { name: String, existing: String },

    #[error("meta command name or alias must not be empty")]
    EmptyName,
}

/// Errors from parsing a section name.
#[derive(Debug, thiserror::Error)]
pub enum SectionParseError {
    #[error("unknown section: {name}")]
    UnknownSection { name: String },
}

/// Errors from the configuration system.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] Box<figment::Error>),

    #[error("invalid command in configuration: {0}")]
    Registry(#[from] RegistryError),

    #[error("failed to serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, MetacmdError>;
