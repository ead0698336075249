use std::result;

use thiserror::Error;

pub type Result<T> = result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("config: {0:?}")]
    Config(#[from] config::ConfigError),
    #[error("metadata: {0:?}")]
    Metadata(#[from] metadata::error::MetadataError),
    #[error("platform: {0:?}")]
    Platform(#[from] platform::PlatformError),
    #[error("io: {0:?}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0:?}")]
    Internal(String),
    #[error("{0:?}")]
    Other(#[from] anyhow::Error),
}
