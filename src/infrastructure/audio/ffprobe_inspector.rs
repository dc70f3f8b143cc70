use std::path::Path;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::MediaInspector;
use crate::domain::MediaMetadata;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Reads duration through the `ffprobe` binary and size from file metadata.
pub struct FfprobeInspector {
    binary: String,
}

impl FfprobeInspector {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn duration_secs(&self, path: &Path) -> Option<u64> {
        let output = Command::new(&self.binary)
            .args([
                "-v",
                "error",
                "-show_entries",
                "format=duration",
                "-of",
                "default=noprint_wrappers=1:nokey=1",
            ])
            .arg(path)
            .output()
            .await;

        let output = match output {
            Ok(output) if output.status.success() => output,
            Ok(output) => {
                tracing::error!(status = %output.status, "ffprobe failed");
                return None;
            }
            Err(e) => {
                tracing::error!(error = %e, binary = %self.binary, "Could not run ffprobe");
                return None;
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        match stdout.trim().parse::<f64>() {
            Ok(secs) if secs.is_finite() && secs >= 0.0 => Some(secs.round() as u64),
            _ => {
                tracing::error!(output = %stdout.trim(), "Could not parse media duration");
                None
            }
        }
    }
}

impl Default for FfprobeInspector {
    fn default() -> Self {
        Self::new("ffprobe")
    }
}

#[async_trait]
impl MediaInspector for FfprobeInspector {
    async fn inspect(&self, path: &Path) -> MediaMetadata {
        let file_size_mib = match tokio::fs::metadata(path).await {
            Ok(meta) => Some(round_to_hundredths(meta.len() as f64 / BYTES_PER_MIB)),
            Err(e) => {
                tracing::error!(error = %e, "Could not read file size");
                None
            }
        };

        MediaMetadata {
            duration_secs: self.duration_secs(path).await,
            file_size_mib,
        }
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
