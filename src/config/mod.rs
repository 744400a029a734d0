/// Database connection and table creation
pub mod database;

/// Initial marketplace data loaded from seed.toml
pub mod seed;

/// Runtime settings from environment variables
pub mod settings;
