//! Upload sessions for large files.
//!
//! Files above the simple-upload threshold are transferred through a
//! server-issued upload session: one `createUploadSession` request, then a
//! strictly sequential loop of `PUT`s to the session URL, each labeling its
//! byte range with `Content-Range: bytes <start>-<end>/<total>`. Chunk
//! requests are unauthenticated: the session URL is pre-authorized and
//! time-limited.
//!
//! Each chunk request retries on transient server failures (HTTP 500, 502,
//! 503, 504) with exponential backoff; retrying per chunk means a mid-
//! transfer hiccup never forces the whole file to be resent. A session that
//! fails past its retries is simply abandoned; the server expires it.

use crate::client::RequestExecutor;
use crate::errors::{classify_response, GraphDriveResult, ResponseError, TransportError};
use crate::resilience::RetryExecutor;
use crate::scope::{ItemRef, ScopePolicy};
use crate::transport::{HttpMethod, HttpRequest, HttpTransport};
use crate::types::{DriveItem, UploadSessionInfo};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_LENGTH, CONTENT_RANGE};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use url::Url;

/// A server-issued upload session.
///
/// Consumed linearly: chunks are sent in order and the session is discarded
/// once the final chunk succeeds or any chunk fails. Sessions are never
/// persisted across process restarts.
pub struct UploadSession {
    upload_url: Url,
    total_size: u64,
    chunk_size: usize,
    bytes_uploaded: u64,
    transport: Arc<dyn HttpTransport>,
    retry: RetryExecutor,
    timeout: Duration,
}

impl UploadSession {
    /// Creates a session for the referenced item.
    pub(crate) async fn create(
        executor: &RequestExecutor,
        scope: &dyn ScopePolicy,
        item: &ItemRef,
        total_size: u64,
    ) -> GraphDriveResult<Self> {
        let path = scope.upload_session_path(item)?;
        let info: UploadSessionInfo = executor
            .execute_json(HttpMethod::Post, &path, None)
            .await?;

        let upload_url = Url::parse(&info.upload_url).map_err(|e| {
            ResponseError::UnexpectedFormat(format!("invalid uploadUrl in session response: {e}"))
        })?;

        Ok(Self {
            upload_url,
            total_size,
            chunk_size: executor.config().upload_chunk_size,
            bytes_uploaded: 0,
            transport: executor.transport(),
            retry: RetryExecutor::new(executor.config().upload_retry.clone()),
            timeout: executor.config().timeout,
        })
    }

    /// Total byte length of the file being uploaded.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Bytes transferred so far.
    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded
    }

    /// Byte-range size used for each chunk.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Sends one labeled byte range, retrying on transient server failures.
    ///
    /// Returns the response body; the final range's 200/201 carries the
    /// resulting DriveItem, intermediate 202s carry session bookkeeping.
    async fn put_chunk(&mut self, chunk: Bytes) -> GraphDriveResult<Bytes> {
        let start = self.bytes_uploaded;
        let end = start + chunk.len() as u64 - 1;
        let content_range = format!("bytes {start}-{end}/{}", self.total_size);

        tracing::debug!(
            range = %content_range,
            bytes = chunk.len(),
            "uploading chunk"
        );

        let transport = Arc::clone(&self.transport);
        let url = self.upload_url.clone();
        let timeout = self.timeout;

        let body = self
            .retry
            .execute(move || {
                let transport = Arc::clone(&transport);
                let url = url.clone();
                let chunk = chunk.clone();
                let content_range = content_range.clone();

                async move {
                    let mut headers = HeaderMap::new();
                    headers.insert(CONTENT_LENGTH, HeaderValue::from(chunk.len()));
                    headers.insert(
                        CONTENT_RANGE,
                        HeaderValue::from_str(&content_range)
                            .map_err(|e| TransportError::Http(e.to_string()))?,
                    );

                    let request = HttpRequest {
                        method: HttpMethod::Put,
                        url,
                        headers,
                        body: Some(chunk),
                        timeout: Some(timeout),
                    };

                    let response = transport.send(request).await?;
                    classify_response(response.status, &response.body)?;
                    Ok(response.body)
                }
            })
            .await?;

        self.bytes_uploaded = end + 1;

        Ok(body)
    }
}

/// Uploads a large file through an upload session.
///
/// The chunk loop reads up to `chunk_size` bytes at a time and stops when
/// the source yields nothing further, so a file whose length is an exact
/// multiple of the chunk size ends on a full-sized final chunk. Ranges are
/// contiguous and non-overlapping; their union covers the whole file.
pub(crate) async fn upload_large(
    executor: &RequestExecutor,
    scope: &dyn ScopePolicy,
    item: &ItemRef,
    source: &Path,
    total_size: u64,
) -> GraphDriveResult<DriveItem> {
    let mut session = UploadSession::create(executor, scope, item, total_size).await?;

    tracing::info!(
        total = total_size,
        chunk_size = session.chunk_size(),
        "starting chunked upload"
    );

    let mut file = tokio::fs::File::open(source).await?;
    let mut last_body = Bytes::new();

    loop {
        let chunk = read_chunk(&mut file, session.chunk_size()).await?;
        if chunk.is_empty() {
            break;
        }
        last_body = session.put_chunk(chunk).await?;
    }

    tracing::info!(total = total_size, "chunked upload complete");

    // The final range's response carries the created or updated item.
    serde_json::from_slice(&last_body).map_err(|e| {
        ResponseError::Deserialization(format!(
            "upload finished but the final response carried no item: {e}"
        ))
        .into()
    })
}

/// Reads up to `chunk_size` bytes from the file; an empty result means the
/// source is exhausted.
async fn read_chunk(file: &mut tokio::fs::File, chunk_size: usize) -> std::io::Result<Bytes> {
    let mut buf = vec![0u8; chunk_size];
    let mut filled = 0;

    while filled < chunk_size {
        let n = file.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }

    buf.truncate(filled);
    Ok(Bytes::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn read_chunk_yields_fixed_sizes_then_remainder() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[7u8; 2500]).unwrap();

        let mut file = tokio::fs::File::open(tmp.path()).await.unwrap();
        assert_eq!(read_chunk(&mut file, 1000).await.unwrap().len(), 1000);
        assert_eq!(read_chunk(&mut file, 1000).await.unwrap().len(), 1000);
        assert_eq!(read_chunk(&mut file, 1000).await.unwrap().len(), 500);
        assert!(read_chunk(&mut file, 1000).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn read_chunk_on_exact_multiple_ends_with_empty_read() {
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        tmp.write_all(&[1u8; 2000]).unwrap();

        let mut file = tokio::fs::File::open(tmp.path()).await.unwrap();
        assert_eq!(read_chunk(&mut file, 1000).await.unwrap().len(), 1000);
        assert_eq!(read_chunk(&mut file, 1000).await.unwrap().len(), 1000);
        assert!(read_chunk(&mut file, 1000).await.unwrap().is_empty());
    }
}
