use std::sync::Arc;

use axum::Router;
use axum::http::{Method, StatusCode, Uri};
use axum::response::IntoResponse;
use serde_json::json;
use tokio::sync::Mutex;

use sonus::application::ports::{StorageBackend, StorageError};
use sonus::domain::{FileRef, MarkerProbe, PathReference};
use sonus::infrastructure::storage::DriveStorageBackend;

use super::mock_server::start_mock_server;

type Requests = Arc<Mutex<Vec<(Method, String, String)>>>;

/// Minimal Drive v3 stand-in: one folder listing, one downloadable file, uploads and deletes.
fn drive_app(requests: Requests, listing: serde_json::Value) -> Router {
    Router::new().fallback(move |method: Method, uri: Uri, body: String| {
        let requests = requests.clone();
        let listing = listing.clone();
        async move {
            let path = uri.path().to_string();
            requests
                .lock()
                .await
                .push((method.clone(), path.clone(), body));

            match (method, path.as_str()) {
                (Method::GET, "/files") => (StatusCode::OK, axum::Json(listing)).into_response(),
                (Method::GET, "/files/id-1") => (StatusCode::OK, "audio-bytes").into_response(),
                (Method::POST, "/upload/files") => {
                    (StatusCode::OK, axum::Json(json!({"id": "new-id"}))).into_response()
                }
                (Method::DELETE, "/files/id-2") => StatusCode::NO_CONTENT.into_response(),
                _ => StatusCode::NOT_FOUND.into_response(),
            }
        }
    })
}

fn folder() -> PathReference {
    PathReference::new("drive", "folder-1")
}

async fn backend_with(
    listing: serde_json::Value,
) -> (DriveStorageBackend, Requests, tokio::sync::oneshot::Sender<()>) {
    let requests = Requests::default();
    let (base_url, shutdown_tx) = start_mock_server(drive_app(requests.clone(), listing)).await;
    let backend = DriveStorageBackend::new(&base_url, &format!("{}/upload", base_url), "token");
    (backend, requests, shutdown_tx)
}

#[tokio::test]
async fn given_listing_with_source_and_txt_when_probing_then_reports_done_markers() {
    let listing = json!({"files": [
        {"id": "id-1", "name": "a.mp3"},
        {"id": "id-2", "name": "a.txt"},
        {"id": "id-3", "name": "a.mp3.bak"}
    ]});
    let (backend, requests, shutdown_tx) = backend_with(listing).await;
    let source = FileRef::new(folder(), "a.mp3", Some("id-1".to_string()));

    let probe = backend.probe_markers(&source).await.unwrap();

    assert_eq!(
        probe,
        MarkerProbe {
            source: true,
            tmp: false,
            txt: true,
            err: false,
        }
    );
    assert_eq!(requests.lock().await.len(), 1);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_source_id_mismatch_when_probing_then_source_is_absent() {
    let listing = json!({"files": [{"id": "other", "name": "a.mp3"}]});
    let (backend, _requests, shutdown_tx) = backend_with(listing).await;
    let source = FileRef::new(folder(), "a.mp3", Some("id-1".to_string()));

    let probe = backend.probe_markers(&source).await.unwrap();
    let exists = backend.exists(&source).await.unwrap();

    assert!(!probe.source);
    assert!(!exists);
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_existing_file_when_downloading_then_streams_media_to_destination() {
    let listing = json!({"files": [{"id": "id-1", "name": "a.mp3"}]});
    let (backend, _requests, shutdown_tx) = backend_with(listing).await;
    let work_dir = tempfile::TempDir::new().unwrap();
    let dest = work_dir.path().join("a.mp3");
    let source = FileRef::new(folder(), "a.mp3", Some("id-1".to_string()));

    let path = backend.download(&source, &dest).await.unwrap();

    assert_eq!(path, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), b"audio-bytes");
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_file_absent_from_folder_when_downloading_then_not_found() {
    let (backend, _requests, shutdown_tx) = backend_with(json!({"files": []})).await;
    let work_dir = tempfile::TempDir::new().unwrap();
    let source = FileRef::new(folder(), "a.mp3", None);

    let result = backend.download(&source, &work_dir.path().join("a.mp3")).await;

    assert!(matches!(result, Err(StorageError::NotFound(msg)) if msg.contains("a.mp3")));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_text_when_uploading_then_sends_multipart_with_parent_folder() {
    let (backend, requests, shutdown_tx) = backend_with(json!({"files": []})).await;

    backend.upload_text(&folder(), "a.txt", "hello").await.unwrap();

    let requests = requests.lock().await;
    let (method, path, body) = &requests[0];
    assert_eq!(*method, Method::POST);
    assert_eq!(path, "/upload/files");
    assert!(body.contains(r#""parents":["folder-1"]"#));
    assert!(body.contains(r#""name":"a.txt""#));
    assert!(body.contains("\r\n\r\nhello\r\n"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_existing_marker_when_deleting_then_deletes_by_id() {
    let listing = json!({"files": [{"id": "id-2", "name": "a.tmp"}]});
    let (backend, requests, shutdown_tx) = backend_with(listing).await;

    backend.delete(&folder(), "a.tmp").await.unwrap();

    let requests = requests.lock().await;
    assert!(requests
        .iter()
        .any(|(method, path, _)| *method == Method::DELETE && path == "/files/id-2"));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_absent_marker_when_deleting_then_succeeds_without_delete_call() {
    let (backend, requests, shutdown_tx) = backend_with(json!({"files": []})).await;

    backend.delete(&folder(), "a.tmp").await.unwrap();

    let requests = requests.lock().await;
    assert!(requests.iter().all(|(method, _, _)| *method != Method::DELETE));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_listing_fails_when_checking_existence_then_transient_error() {
    let app = Router::new().fallback(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") });
    let (base_url, shutdown_tx) = start_mock_server(app).await;
    let backend = DriveStorageBackend::new(&base_url, &base_url, "token");
    let source = FileRef::new(folder(), "a.mp3", None);

    let result = backend.exists(&source).await;

    assert!(matches!(result, Err(StorageError::TransientIo(msg)) if msg.contains("500")));
    shutdown_tx.send(()).ok();
}

#[tokio::test]
async fn given_backend_when_reconnecting_then_later_calls_still_work() {
    let listing = json!({"files": [{"id": "id-1", "name": "a.mp3"}]});
    let (backend, _requests, shutdown_tx) = backend_with(listing).await;
    let source = FileRef::new(folder(), "a.mp3", None);

    backend.reconnect().await.unwrap();

    assert!(backend.exists(&source).await.unwrap());
    shutdown_tx.send(()).ok();
}
