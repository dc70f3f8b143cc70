use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MediaMetadata {
    pub duration_secs: Option<u64>,
    pub file_size_mib: Option<f64>,
}
