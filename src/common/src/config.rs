use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::level_filters::LevelFilter;

#[derive(Debug, Clone)]
pub struct Server {
    pub host: SocketAddr,
}

#[derive(Debug, Clone)]
pub struct Data {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct Log {
    pub level: LevelFilter,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: Server,
    pub data: Data,
    pub log: Log,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: Server {
                host: SocketAddr::from_str("0.0.0.0:8080").unwrap(),
            },
            data: Data {
                path: Default::default(),
            },
            log: Log {
                level: LevelFilter::INFO,
            },
        }
    }
}
