pub mod config;
pub mod http;
pub mod types;

pub const DATA_PATH_METADATA: &str = "md";
