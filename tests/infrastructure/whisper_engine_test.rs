use axum::Router;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use serde_json::json;

use sonus::application::ports::{TranscriptionEngine, TranscriptionError};
use sonus::domain::MediaMetadata;
use sonus::infrastructure::audio::{AzureWhisperEngine, OpenAiWhisperEngine};

use super::mock_server::start_mock_server;

const VERBOSE_BODY: &str = r#"{
    "task": "transcribe",
    "language": "polish",
    "duration": 3.7,
    "text": "  Dzien dobry  ",
    "segments": [
        {"id": 0, "start": 0.0, "end": 1.5, "text": " Dzien"},
        {"id": 1, "start": 1.5, "end": 3.7, "text": " dobry"}
    ]
}"#;

fn audio_file() -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), b"fake audio bytes").unwrap();
    file
}

fn metadata() -> MediaMetadata {
    MediaMetadata {
        duration_secs: Some(4),
        file_size_mib: Some(0.01),
    }
}

fn openai_app(status: u16, body: &'static str) -> Router {
    Router::new().route(
        "/audio/transcriptions",
        post(move |headers: HeaderMap| async move {
            let authorized = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                == Some("Bearer sk-test");
            if !authorized {
                return (StatusCode::UNAUTHORIZED, "missing key").into_response();
            }
            let status = StatusCode::from_u16(status).unwrap();
            (status, body).into_response()
        }),
    )
}

fn azure_app(status: u16, body: &'static str) -> Router {
    Router::new().route(
        "/openai/deployments/my-deployment/audio/transcriptions",
        post(move |headers: HeaderMap| async move {
            if headers.get("api-key").and_then(|v| v.to_str().ok()) != Some("test-key") {
                return (StatusCode::UNAUTHORIZED, "missing key").into_response();
            }
            let status = StatusCode::from_u16(status).unwrap();
            (status, body).into_response()
        }),
    )
}

#[tokio::test]
async fn given_verbose_response_when_openai_transcribes_then_returns_trimmed_text_and_segments() {
    let (base_url, shutdown_tx) = start_mock_server(openai_app(200, VERBOSE_BODY)).await;
    let engine = OpenAiWhisperEngine::new("sk-test".into(), Some(base_url), None, None);
    let audio = audio_file();

    let transcript = engine
        .transcribe(audio.path(), "a.mp3", &metadata())
        .await
        .unwrap();

    assert_eq!(transcript.text, "Dzien dobry");
    assert_eq!(transcript.json["segments"].as_array().unwrap().len(), 2);
    assert_eq!(transcript.json["diarization"], json!([]));
    assert_eq!(transcript.json["language"], json!("polish"));
    assert_eq!(transcript.json["duration"], json!(4));
    assert_eq!(transcript.json["file_size_mib"], json!(0.01));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_no_probed_duration_when_transcribing_then_falls_back_to_engine_duration() {
    let (base_url, shutdown_tx) = start_mock_server(openai_app(200, VERBOSE_BODY)).await;
    let engine = OpenAiWhisperEngine::new("sk-test".into(), Some(base_url), None, None);
    let audio = audio_file();

    let transcript = engine
        .transcribe(audio.path(), "a.mp3", &MediaMetadata::default())
        .await
        .unwrap();

    assert_eq!(transcript.json["duration"], json!(4));
    assert_eq!(transcript.json["file_size_mib"], json!(null));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_error_status_when_openai_transcribes_then_returns_api_error() {
    let (base_url, shutdown_tx) =
        start_mock_server(openai_app(400, r#"{"error": {"message": "bad audio"}}"#)).await;
    let engine = OpenAiWhisperEngine::new("sk-test".into(), Some(base_url), None, None);
    let audio = audio_file();

    let result = engine.transcribe(audio.path(), "a.mp3", &metadata()).await;

    assert!(matches!(result, Err(TranscriptionError::ApiRequestFailed(msg)) if msg.contains("bad audio")));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_non_json_body_when_openai_transcribes_then_returns_invalid_response() {
    let (base_url, shutdown_tx) = start_mock_server(openai_app(200, "not json")).await;
    let engine = OpenAiWhisperEngine::new("sk-test".into(), Some(base_url), None, None);
    let audio = audio_file();

    let result = engine.transcribe(audio.path(), "a.mp3", &metadata()).await;

    assert!(matches!(result, Err(TranscriptionError::InvalidResponse(_))));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_missing_audio_file_when_transcribing_then_returns_read_error() {
    let engine = OpenAiWhisperEngine::new(
        "sk-test".into(),
        Some("http://127.0.0.1:9".into()),
        None,
        None,
    );

    let result = engine
        .transcribe(std::path::Path::new("/nonexistent/a.mp3"), "a.mp3", &metadata())
        .await;

    assert!(matches!(result, Err(TranscriptionError::ReadFailed(_))));
}

#[tokio::test]
async fn given_api_key_when_azure_transcribes_then_sends_api_key_header() {
    let (base_url, shutdown_tx) = start_mock_server(azure_app(200, VERBOSE_BODY)).await;
    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01", None);
    let audio = audio_file();

    let transcript = engine
        .transcribe(audio.path(), "a.wav", &metadata())
        .await
        .unwrap();

    assert_eq!(transcript.text, "Dzien dobry");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_azure_error_status_when_transcribing_then_returns_api_error() {
    let (base_url, shutdown_tx) = start_mock_server(azure_app(500, "internal")).await;
    let engine = AzureWhisperEngine::new(&base_url, "my-deployment", "test-key", "2024-06-01", None);
    let audio = audio_file();

    let result = engine.transcribe(audio.path(), "a.wav", &metadata()).await;

    assert!(matches!(result, Err(TranscriptionError::ApiRequestFailed(_))));
    shutdown_tx.send(()).ok();
}
