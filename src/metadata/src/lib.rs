pub mod error;
pub mod index;
pub mod issues;
mod metadata;
pub mod rocksdb;
pub mod store;

pub use error::Result;
pub use metadata::ListResponse;
pub use metadata::MetadataProvider;
pub use metadata::ResponseMetadata;
