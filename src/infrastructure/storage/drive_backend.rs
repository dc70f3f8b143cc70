use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::StatusCode;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::{StorageBackend, StorageError};
use crate::domain::{ArtifactKind, FileRef, MarkerProbe, PathReference};

pub const DRIVE_SCHEME: &str = "drive";

/// `drive://<folder id>` backend over the Google Drive v3 REST API.
pub struct DriveStorageBackend {
    client: RwLock<reqwest::Client>,
    api_base: String,
    upload_base: String,
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Clone, Deserialize)]
struct DriveFile {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct DriveCreated {
    id: String,
}

impl DriveStorageBackend {
    pub fn new(api_base: &str, upload_base: &str, access_token: &str) -> Self {
        Self {
            client: RwLock::new(reqwest::Client::new()),
            api_base: api_base.trim_end_matches('/').to_string(),
            upload_base: upload_base.trim_end_matches('/').to_string(),
            access_token: access_token.to_string(),
        }
    }

    async fn client(&self) -> reqwest::Client {
        self.client.read().await.clone()
    }

    async fn list(&self, query: &str) -> Result<Vec<DriveFile>, StorageError> {
        let response = self
            .client()
            .await
            .get(format!("{}/files", self.api_base))
            .bearer_auth(&self.access_token)
            .query(&[
                ("q", query),
                ("spaces", "drive"),
                ("fields", "files(id, name)"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ])
            .send()
            .await
            .map_err(transient)?;

        let response = check_status(response, "list files").await?;
        let list: DriveFileList = response.json().await.map_err(transient)?;
        Ok(list.files)
    }

    async fn find_by_name(
        &self,
        folder: &PathReference,
        name: &str,
    ) -> Result<Vec<DriveFile>, StorageError> {
        let query = format!(
            "'{}' in parents and name = '{}' and trashed = false",
            escape_query(folder.locator()),
            escape_query(name)
        );
        self.list(&query).await
    }

    async fn resolve_id(&self, file: &FileRef) -> Result<String, StorageError> {
        if let Some(id) = &file.file_id {
            return Ok(id.clone());
        }
        self.find_by_name(&file.location, &file.name)
            .await?
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| StorageError::NotFound(file.name.clone()))
    }
}

#[async_trait]
impl StorageBackend for DriveStorageBackend {
    /// Sources pinned to a file id must match both id and name; other files match by name.
    async fn exists(&self, file: &FileRef) -> Result<bool, StorageError> {
        let files = self.find_by_name(&file.location, &file.name).await?;
        Ok(match &file.file_id {
            Some(id) => files.iter().any(|f| &f.id == id && f.name == file.name),
            None => !files.is_empty(),
        })
    }

    async fn download(&self, file: &FileRef, local_dest: &Path) -> Result<PathBuf, StorageError> {
        if !self.exists(file).await? {
            return Err(StorageError::NotFound(format!(
                "File {} not found in folder",
                file.name
            )));
        }
        let id = self.resolve_id(file).await?;

        let response = self
            .client()
            .await
            .get(format!("{}/files/{}", self.api_base, id))
            .bearer_auth(&self.access_token)
            .query(&[("alt", "media"), ("supportsAllDrives", "true")])
            .send()
            .await
            .map_err(transient)?;
        let response = check_status(response, "download").await?;

        if let Some(parent) = local_dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut out = tokio::fs::File::create(local_dest).await?;
        let mut stream = response.bytes_stream();
        let mut total_bytes: u64 = 0;
        while let Some(chunk) = stream.next().await {
            let bytes = chunk.map_err(transient)?;
            total_bytes += bytes.len() as u64;
            out.write_all(&bytes).await?;
        }
        out.flush().await?;

        tracing::debug!(file_id = %id, bytes = total_bytes, "Downloaded file from Drive");
        Ok(local_dest.to_path_buf())
    }

    async fn upload_text(
        &self,
        folder: &PathReference,
        name: &str,
        content: &str,
    ) -> Result<(), StorageError> {
        let boundary = format!("sonus-{}", Uuid::new_v4().simple());
        let metadata = serde_json::json!({
            "name": name,
            "parents": [folder.locator()],
        });
        let body = format!(
            "--{b}\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n{meta}\r\n\
             --{b}\r\nContent-Type: text/plain; charset=UTF-8\r\n\r\n{content}\r\n--{b}--\r\n",
            b = boundary,
            meta = metadata,
            content = content,
        );

        let response = self
            .client()
            .await
            .post(format!("{}/files", self.upload_base))
            .bearer_auth(&self.access_token)
            .query(&[
                ("uploadType", "multipart"),
                ("supportsAllDrives", "true"),
                ("fields", "id"),
            ])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={}", boundary),
            )
            .body(body)
            .send()
            .await
            .map_err(transient)?;
        let response = check_status(response, "upload").await?;
        let created: DriveCreated = response.json().await.map_err(transient)?;

        tracing::debug!(name, file_id = %created.id, "Uploaded file to Drive");
        Ok(())
    }

    async fn delete(&self, folder: &PathReference, name: &str) -> Result<(), StorageError> {
        let Some(file) = self.find_by_name(folder, name).await?.into_iter().next() else {
            tracing::warn!(folder = %folder, name, "File not found in Drive, nothing to delete");
            return Ok(());
        };

        let response = self
            .client()
            .await
            .delete(format!("{}/files/{}", self.api_base, file.id))
            .bearer_auth(&self.access_token)
            .query(&[("supportsAllDrives", "true")])
            .send()
            .await
            .map_err(transient)?;
        check_status(response, "delete").await?;

        tracing::debug!(name, file_id = %file.id, "Deleted file from Drive");
        Ok(())
    }

    /// One listing of every file sharing the source's base name.
    async fn probe_markers(&self, source: &FileRef) -> Result<MarkerProbe, StorageError> {
        let base_name = source.base_name();
        let query = format!(
            "'{}' in parents and name contains '{}' and trashed = false",
            escape_query(source.location.locator()),
            escape_query(base_name)
        );
        let files = self.list(&query).await?;
        let has = |kind: ArtifactKind| {
            let name = kind.file_name(base_name);
            files.iter().any(|f| f.name == name)
        };

        let source_present = !ArtifactKind::is_generated_name(&source.name)
            && files.iter().any(|f| {
                f.name == source.name && source.file_id.as_ref().is_none_or(|id| &f.id == id)
            });

        Ok(MarkerProbe {
            source: source_present,
            tmp: has(ArtifactKind::Tmp),
            txt: has(ArtifactKind::Txt),
            err: has(ArtifactKind::Err),
        })
    }

    async fn reconnect(&self) -> Result<(), StorageError> {
        *self.client.write().await = reqwest::Client::new();
        tracing::debug!("Recreated Drive client");
        Ok(())
    }
}

fn escape_query(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

fn transient(e: reqwest::Error) -> StorageError {
    StorageError::TransientIo(e.to_string())
}

async fn check_status(
    response: reqwest::Response,
    operation: &str,
) -> Result<reqwest::Response, StorageError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unknown error".to_string());
    let message = format!("{} returned status {}: {}", operation, status, body);
    if status == StatusCode::NOT_FOUND {
        Err(StorageError::NotFound(message))
    } else {
        Err(StorageError::TransientIo(message))
    }
}
