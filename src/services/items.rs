//! DriveItem operations: metadata, listing, download, upload.

use crate::client::RequestExecutor;
use crate::errors::{ArgumentError, GraphDriveResult, ResponseError};
use crate::scope::{ItemRef, ScopePolicy};
use crate::transport::{HttpMethod, HttpRequest};
use crate::types::{DriveItem, DriveItemList};
use bytes::Bytes;
use futures::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use url::Url;

use super::upload;

/// Service for DriveItem operations, shared by both scope variants.
pub struct ItemsService {
    executor: Arc<RequestExecutor>,
    scope: Arc<dyn ScopePolicy>,
}

impl ItemsService {
    pub(crate) fn new(executor: Arc<RequestExecutor>, scope: Arc<dyn ScopePolicy>) -> Self {
        Self { executor, scope }
    }

    /// Gets metadata for a DriveItem.
    pub async fn get(&self, item: &ItemRef) -> GraphDriveResult<DriveItem> {
        let path = self.scope.item_path(item)?;
        self.executor.get_json(&path).await
    }

    /// Lists the DriveItems in a folder, or in the drive root when no folder
    /// path is given.
    pub async fn list(&self, folder_path: Option<&str>) -> GraphDriveResult<DriveItemList> {
        let path = self.scope.children_path(folder_path)?;
        self.executor.get_json(&path).await
    }

    /// Downloads a DriveItem's content to a local file.
    ///
    /// Fetches the item's metadata first, then streams the pre-signed
    /// `@microsoft.graph.downloadUrl` (no auth header; the URL is already
    /// authorized) to `destination`, writing chunks as they arrive. Failures
    /// of the pre-signed endpoint surface as raw transport errors; it does
    /// not speak the Graph error format.
    pub async fn download(
        &self,
        item: &ItemRef,
        destination: impl AsRef<Path>,
    ) -> GraphDriveResult<()> {
        let destination = destination.as_ref();
        if destination.as_os_str().is_empty() {
            return Err(ArgumentError::MissingFilePath.into());
        }

        let metadata = self.get(item).await?;
        let download_url = metadata.download_url.ok_or_else(|| {
            ResponseError::UnexpectedFormat(
                "item metadata carries no download URL (is it a folder?)".to_string(),
            )
        })?;
        let url = Url::parse(&download_url)
            .map_err(|e| ResponseError::UnexpectedFormat(format!("invalid download URL: {e}")))?;

        let mut request = HttpRequest::new(HttpMethod::Get, url);
        request.timeout = Some(self.executor.config().timeout);

        let mut stream = self.executor.transport().send_streaming(request).await?;
        let mut file = tokio::fs::File::create(destination).await?;
        let mut written: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;

        tracing::info!(bytes = written, path = %destination.display(), "download complete");

        Ok(())
    }

    /// Uploads a local file to a new or existing DriveItem.
    ///
    /// Files at or below the configured threshold go up in one request;
    /// larger files go through an upload session and are transferred as
    /// sequential byte-range chunks. Returns the resulting item metadata.
    pub async fn upload(
        &self,
        item: &ItemRef,
        source: impl AsRef<Path>,
    ) -> GraphDriveResult<DriveItem> {
        let source = source.as_ref();
        if source.as_os_str().is_empty() {
            return Err(ArgumentError::MissingFilePath.into());
        }

        // Resolve the endpoint first so scope/reference problems surface
        // before any file or network I/O.
        let content_path = self.scope.content_path(item)?;

        let file_size = tokio::fs::metadata(source).await?.len();

        if file_size <= self.executor.config().simple_upload_threshold {
            self.upload_small(&content_path, source, file_size).await
        } else {
            upload::upload_large(&self.executor, self.scope.as_ref(), item, source, file_size)
                .await
        }
    }

    async fn upload_small(
        &self,
        content_path: &str,
        source: &Path,
        file_size: u64,
    ) -> GraphDriveResult<DriveItem> {
        tracing::debug!(bytes = file_size, "uploading via single request");

        let body = tokio::fs::read(source).await?;
        self.executor
            .execute_json(HttpMethod::Put, content_path, Some(Bytes::from(body)))
            .await
    }
}
