use super::file_ref::extension;

const DEFAULT_AUDIO: [&str; 4] = ["mp3", "wav", "m4a", "flac"];
const DEFAULT_VIDEO: [&str; 4] = ["mp4", "mov", "avi", "mkv"];

/// Media extensions accepted for transcription, stored lowercase without dots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupportedFormats {
    audio: Vec<String>,
    video: Vec<String>,
}

impl SupportedFormats {
    pub fn new<A, V>(audio: A, video: V) -> Self
    where
        A: IntoIterator,
        A::Item: AsRef<str>,
        V: IntoIterator,
        V::Item: AsRef<str>,
    {
        Self {
            audio: normalize(audio),
            video: normalize(video),
        }
    }

    pub fn audio(&self) -> &[String] {
        &self.audio
    }

    pub fn video(&self) -> &[String] {
        &self.video
    }

    pub fn is_supported(&self, file_name: &str) -> bool {
        let Some(ext) = extension(file_name) else {
            return false;
        };
        let ext = ext.to_lowercase();
        self.audio.contains(&ext) || self.video.contains(&ext)
    }

    /// Body of the `.err` artifact written for files with an unsupported extension.
    pub fn unsupported_message(&self) -> String {
        format!(
            "Unsupported media type.\n\n\
             The following media types are supported:\n\
             Audio files: {}\n\
             Video files: {}",
            self.audio.join(", "),
            self.video.join(", ")
        )
    }
}

impl Default for SupportedFormats {
    fn default() -> Self {
        Self::new(DEFAULT_AUDIO, DEFAULT_VIDEO)
    }
}

fn normalize<I>(extensions: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    extensions
        .into_iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
