use std::sync::Arc;

use rocksdb::TransactionDB;
use serde::Deserialize;
use serde::Serialize;

use crate::issues;
use crate::Result;

pub struct MetadataProvider {
    pub issues: Arc<issues::Issues>,
}

impl MetadataProvider {
    pub fn try_new(db: Arc<TransactionDB>) -> Result<Self> {
        Ok(MetadataProvider {
            issues: Arc::new(issues::Issues::new(db)),
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ResponseMetadata {
    pub next: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ListResponse<T> {
    pub data: Vec<T>,
    pub meta: ResponseMetadata,
}
