use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing::Level;

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub host: SocketAddr,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Data {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Log {
    pub level: LogLevel,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}

#[derive(Debug, Deserialize, PartialEq, Eq)]
pub struct Config {
    pub server: Server,
    pub data: Data,
    pub log: Log,
}

impl From<Config> for common::config::Config {
    fn from(cfg: Config) -> Self {
        common::config::Config {
            server: common::config::Server {
                host: cfg.server.host,
            },
            data: common::config::Data {
                path: cfg.data.path,
            },
            log: common::config::Log {
                level: cfg.log.level.into(),
            },
        }
    }
}
