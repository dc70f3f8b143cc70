use std::path::Path;

use async_trait::async_trait;

use crate::domain::MediaMetadata;

/// Reads duration and size of a downloaded media file. Failures yield empty fields.
#[async_trait]
pub trait MediaInspector: Send + Sync {
    async fn inspect(&self, path: &Path) -> MediaMetadata;
}
