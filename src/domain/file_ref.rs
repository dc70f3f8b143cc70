use super::{ArtifactKind, PathReference};

/// A named file inside a storage folder, optionally pinned to a provider file id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRef {
    pub location: PathReference,
    pub name: String,
    pub file_id: Option<String>,
}

impl FileRef {
    pub fn new(location: PathReference, name: impl Into<String>, file_id: Option<String>) -> Self {
        Self {
            location,
            name: name.into(),
            file_id,
        }
    }

    /// Another file in the same folder. Siblings are matched by name only.
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        Self::new(self.location.clone(), name, None)
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Self {
        self.sibling(kind.file_name(self.base_name()))
    }

    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    pub fn extension(&self) -> Option<&str> {
        extension(&self.name)
    }
}

/// File name without its last extension. Leading dots do not start an extension.
pub(crate) fn base_name(file_name: &str) -> &str {
    match extension_start(file_name) {
        Some(idx) => &file_name[..idx],
        None => file_name,
    }
}

pub(crate) fn extension(file_name: &str) -> Option<&str> {
    extension_start(file_name).map(|idx| &file_name[idx + 1..])
}

fn extension_start(file_name: &str) -> Option<usize> {
    let stem_start = file_name.len() - file_name.trim_start_matches('.').len();
    file_name[stem_start..]
        .rfind('.')
        .map(|idx| idx + stem_start)
}
