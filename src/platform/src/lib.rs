pub mod error;
pub mod http;
pub mod issues;
pub mod provider;

pub use error::PlatformError;
pub use error::Result;
pub use provider::PlatformProvider;
