mod azure_whisper_engine;
mod ffprobe_inspector;
mod openai_whisper_engine;
mod transcription_engine_factory;
mod whisper_response;

pub use azure_whisper_engine::AzureWhisperEngine;
pub use ffprobe_inspector::FfprobeInspector;
pub use openai_whisper_engine::OpenAiWhisperEngine;
pub use transcription_engine_factory::TranscriptionEngineFactory;
