use std::fmt;

use chrono::{DateTime, Local};

/// Sentinel and result files written next to a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    Tmp,
    Txt,
    Json,
    Err,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Tmp,
        ArtifactKind::Txt,
        ArtifactKind::Json,
        ArtifactKind::Err,
    ];

    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactKind::Tmp => "tmp",
            ArtifactKind::Txt => "txt",
            ArtifactKind::Json => "json",
            ArtifactKind::Err => "err",
        }
    }

    pub fn file_name(&self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.extension())
    }

    /// True when `file_name` carries one of the extensions this system generates.
    pub fn is_generated_name(file_name: &str) -> bool {
        let lower = file_name.to_lowercase();
        Self::ALL
            .iter()
            .any(|kind| lower.ends_with(&format!(".{}", kind.extension())))
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub base_name: String,
    pub content: String,
}

impl GeneratedArtifact {
    pub fn new(kind: ArtifactKind, base_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            kind,
            base_name: base_name.into(),
            content: content.into(),
        }
    }

    pub fn in_progress(base_name: impl Into<String>, started_at: DateTime<Local>) -> Self {
        Self::new(
            ArtifactKind::Tmp,
            base_name,
            format!(
                "Transcription in progress, started at {}",
                started_at.format("%Y%m%d %H%M%S")
            ),
        )
    }

    pub fn error(base_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ArtifactKind::Err, base_name, message)
    }

    pub fn file_name(&self) -> String {
        self.kind.file_name(&self.base_name)
    }
}
