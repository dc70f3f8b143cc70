use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::file_ref::{base_name, extension};
use super::{ArtifactKind, FileRef, PathReference};

pub const DEFAULT_OPERATION: &str = "konwersja";

const LOCAL_REQUESTER: &str = "local";

/// A queued request to transcribe one media file.
///
/// Fields mirror the wire format. Every field defaults when absent so that decoding can
/// report missing `file_name`/`file_path` as a validation failure instead of a parse error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRequest {
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default)]
    pub shared_by: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub operation: String,
}

impl JobRequest {
    pub fn new(
        file_id: Option<String>,
        file_name: impl Into<String>,
        file_path: impl Into<String>,
        shared_by: impl Into<String>,
    ) -> Self {
        Self {
            file_id,
            file_name: file_name.into(),
            file_path: file_path.into(),
            shared_by: shared_by.into(),
            timestamp: Utc::now().format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            operation: DEFAULT_OPERATION.to_string(),
        }
    }

    /// Request for a file on the local filesystem, addressed through the `file` scheme.
    pub fn for_local_file(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;
        let folder = path.parent()?.to_str()?;
        Some(Self::new(
            None,
            file_name,
            format!("file://{}", folder),
            LOCAL_REQUESTER,
        ))
    }

    pub fn path_reference(&self) -> PathReference {
        PathReference::parse(&self.file_path)
    }

    pub fn source(&self) -> FileRef {
        FileRef::new(
            self.path_reference(),
            self.file_name.clone(),
            self.file_id.clone(),
        )
    }

    pub fn base_name(&self) -> &str {
        base_name(&self.file_name)
    }

    pub fn extension(&self) -> Option<&str> {
        extension(&self.file_name)
    }

    pub fn artifact_name(&self, kind: ArtifactKind) -> String {
        kind.file_name(self.base_name())
    }
}
