//! Error types for synoblock.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SynoblockError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Backup error: {0}")]
    Backup(String),
}
