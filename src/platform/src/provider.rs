use std::sync::Arc;

use metadata::MetadataProvider;

use crate::issues::Issues;

pub struct PlatformProvider {
    pub issues: Arc<Issues>,
}

impl PlatformProvider {
    pub fn new(md: &Arc<MetadataProvider>) -> Self {
        Self {
            issues: Arc::new(Issues::new(md.issues.clone())),
        }
    }
}
