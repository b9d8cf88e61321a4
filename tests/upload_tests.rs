//! Integration tests for the simple and chunked upload paths.

use msgraph_drive::resilience::RetryConfig;
use msgraph_drive::{ApiError, ArgumentError, GraphDriveError, ItemRef, OneDrive};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_bytes, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHUNK: usize = 320 * 1024;

fn fast_retry() -> RetryConfig {
    RetryConfig {
        initial_backoff: Duration::from_millis(5),
        max_backoff: Duration::from_millis(20),
        ..RetryConfig::default()
    }
}

fn client(server: &MockServer, threshold: u64) -> OneDrive {
    OneDrive::builder()
        .access_token("token123")
        .base_url(server.uri())
        .simple_upload_threshold(threshold)
        .upload_chunk_size(CHUNK)
        .upload_retry(fast_retry())
        .build()
        .unwrap()
}

/// Deterministic non-repeating content so reassembly mistakes show up.
fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn temp_file(content: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content).unwrap();
    file.flush().unwrap();
    file
}

/// Parses a `Content-Range: bytes <start>-<end>/<total>` header.
fn parse_range(value: &str) -> (u64, u64, u64) {
    let rest = value.strip_prefix("bytes ").unwrap();
    let (range, total) = rest.split_once('/').unwrap();
    let (start, end) = range.split_once('-').unwrap();
    (
        start.parse().unwrap(),
        end.parse().unwrap(),
        total.parse().unwrap(),
    )
}

#[tokio::test]
async fn small_files_upload_in_a_single_put() {
    let server = MockServer::start().await;
    let content = patterned(100);

    Mock::given(method("PUT"))
        .and(path("/me/drive/items/123/content"))
        .and(header("authorization", "Bearer token123"))
        .and(body_bytes(content.clone()))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_raw(r#"{"id":"123","name":"small.bin","size":100}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let drive = client(&server, 4 * 1024 * 1024);
    let source = temp_file(&content);

    let item = drive
        .items()
        .upload(&ItemRef::by_id("123"), source.path())
        .await
        .unwrap();

    assert_eq!(item.id.as_deref(), Some("123"));
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn path_addressed_small_upload_uses_colon_content_suffix() {
    let server = MockServer::start().await;
    let content = patterned(64);

    Mock::given(method("PUT"))
        .and(path("/me/drive/root:/Documents/test.csv:/content"))
        .respond_with(
            ResponseTemplate::new(201).set_body_raw(r#"{"id":"9"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let drive = client(&server, 4 * 1024 * 1024);
    let source = temp_file(&content);

    drive
        .items()
        .upload(&ItemRef::by_path("/Documents/test.csv"), source.path())
        .await
        .unwrap();
}

#[tokio::test]
async fn large_files_go_through_an_upload_session() {
    let server = MockServer::start().await;

    // Two full chunks plus a 1000-byte remainder.
    let total = 2 * CHUNK + 1000;
    let content = patterned(total);

    Mock::given(method("POST"))
        .and(path("/me/drive/root:/big.bin:/createUploadSession"))
        .and(header("authorization", "Bearer token123"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(r#"{{"uploadUrl":"{}/upload-session"}}"#, server.uri()),
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let ranges = [
        format!("bytes 0-{}/{total}", CHUNK - 1),
        format!("bytes {}-{}/{total}", CHUNK, 2 * CHUNK - 1),
        format!("bytes {}-{}/{total}", 2 * CHUNK, total - 1),
    ];

    for range in &ranges[..2] {
        Mock::given(method("PUT"))
            .and(path("/upload-session"))
            .and(header("content-range", range.as_str()))
            .respond_with(ResponseTemplate::new(202).set_body_raw(
                r#"{"nextExpectedRanges":["later-"]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("PUT"))
        .and(path("/upload-session"))
        .and(header("content-range", ranges[2].as_str()))
        .respond_with(ResponseTemplate::new(201).set_body_raw(
            format!(r#"{{"id":"01NEW","name":"big.bin","size":{total}}}"#),
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let drive = client(&server, 1024);
    let source = temp_file(&content);

    let item = drive
        .items()
        .upload(&ItemRef::by_path("/big.bin"), source.path())
        .await
        .unwrap();

    assert_eq!(item.id.as_deref(), Some("01NEW"));
    assert_eq!(item.size, Some(total as u64));

    // The recorded chunk requests must tile the file exactly: strictly
    // increasing, contiguous, last upper bound = total - 1, and the
    // concatenated bodies must be byte-identical to the source.
    let requests = server.received_requests().await.unwrap();
    let puts: Vec<_> = requests
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .collect();
    assert_eq!(puts.len(), 3);

    let mut expected_start = 0u64;
    let mut reassembled = Vec::new();
    for put in &puts {
        let range_header = put.headers.get("content-range").unwrap().to_str().unwrap();
        let (start, end, reported_total) = parse_range(range_header);
        assert_eq!(start, expected_start);
        assert_eq!(reported_total, total as u64);
        assert_eq!(end - start + 1, put.body.len() as u64);

        let content_length: u64 = put
            .headers
            .get("content-length")
            .unwrap()
            .to_str()
            .unwrap()
            .parse()
            .unwrap();
        assert_eq!(content_length, put.body.len() as u64);

        // chunk requests hit the pre-authorized session URL without a token
        assert!(put.headers.get("authorization").is_none());

        reassembled.extend_from_slice(&put.body);
        expected_start = end + 1;
    }
    assert_eq!(expected_start, total as u64);
    assert_eq!(reassembled, content);
}

#[tokio::test]
async fn exact_multiple_of_chunk_size_ends_on_a_full_chunk() {
    let server = MockServer::start().await;

    let total = 2 * CHUNK;
    let content = patterned(total);

    Mock::given(method("POST"))
        .and(path("/me/drive/items/123/createUploadSession"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(r#"{{"uploadUrl":"{}/upload-session"}}"#, server.uri()),
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload-session"))
        .and(header(
            "content-range",
            format!("bytes 0-{}/{total}", CHUNK - 1).as_str(),
        ))
        .respond_with(ResponseTemplate::new(202).set_body_raw(
            r#"{"nextExpectedRanges":["327680-"]}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload-session"))
        .and(header(
            "content-range",
            format!("bytes {}-{}/{total}", CHUNK, total - 1).as_str(),
        ))
        .respond_with(
            ResponseTemplate::new(201).set_body_raw(r#"{"id":"123"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let drive = client(&server, 1024);
    let source = temp_file(&content);

    drive
        .items()
        .upload(&ItemRef::by_id("123"), source.path())
        .await
        .unwrap();

    let put_count = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .count();
    assert_eq!(put_count, 2);
}

#[tokio::test]
async fn transient_chunk_failures_are_retried() {
    let server = MockServer::start().await;

    let total = 2000usize; // single chunk, above the 1024 threshold

    Mock::given(method("POST"))
        .and(path("/me/drive/items/123/createUploadSession"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(r#"{{"uploadUrl":"{}/upload-session"}}"#, server.uri()),
            "application/json",
        ))
        .mount(&server)
        .await;

    // Two transient failures, then success.
    Mock::given(method("PUT"))
        .and(path("/upload-session"))
        .respond_with(ResponseTemplate::new(503).set_body_raw(
            r#"{"error":{"message":"Service unavailable"}}"#,
            "application/json",
        ))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload-session"))
        .respond_with(
            ResponseTemplate::new(201).set_body_raw(r#"{"id":"123"}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let drive = client(&server, 1024);
    let source = temp_file(&patterned(total));

    let item = drive
        .items()
        .upload(&ItemRef::by_id("123"), source.path())
        .await
        .unwrap();
    assert_eq!(item.id.as_deref(), Some("123"));

    let put_count = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .count();
    assert_eq!(put_count, 3);
}

#[tokio::test]
async fn chunk_retries_are_bounded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/me/drive/items/123/createUploadSession"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            format!(r#"{{"uploadUrl":"{}/upload-session"}}"#, server.uri()),
            "application/json",
        ))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/upload-session"))
        .respond_with(ResponseTemplate::new(503).set_body_raw(
            r#"{"error":{"message":"Service unavailable"}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let drive = client(&server, 1024);
    let source = temp_file(&patterned(2000));

    let err = drive
        .items()
        .upload(&ItemRef::by_id("123"), source.path())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GraphDriveError::Api(ApiError::Generic { status: 503, .. })
    ));

    // initial attempt + 3 retries
    let put_count = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .count();
    assert_eq!(put_count, 4);
}

#[tokio::test]
async fn session_creation_failures_propagate_classified() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/me/drive/items/123/createUploadSession"))
        .respond_with(ResponseTemplate::new(401).set_body_raw(
            r#"{"error":{"message":"Invalid token"}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let drive = client(&server, 1024);
    let source = temp_file(&patterned(2000));

    let err = drive
        .items()
        .upload(&ItemRef::by_id("123"), source.path())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GraphDriveError::Api(ApiError::InvalidToken(message)) if message == "Invalid token"
    ));
}

#[tokio::test]
async fn upload_requires_a_source_path() {
    let server = MockServer::start().await;
    let drive = client(&server, 1024);

    let err = drive
        .items()
        .upload(&ItemRef::by_id("123"), "")
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GraphDriveError::Argument(ArgumentError::MissingFilePath)
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}
