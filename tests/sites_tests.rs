//! Integration tests for SharePoint site discovery.

use msgraph_drive::SharePoint;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> SharePoint {
    // Site discovery needs no drive id.
    SharePoint::builder()
        .access_token("token123")
        .base_url(server.uri())
        .build()
        .unwrap()
}

#[tokio::test]
async fn followed_sites() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/me/followedSites"))
        .and(header("authorization", "Bearer token123"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"value":[{"displayName":"Test site"}]}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let sites = client(&server).sites().followed().await.unwrap();
    assert_eq!(sites.value[0].display_name.as_deref(), Some("Test site"));
}

#[tokio::test]
async fn site_search_form_encodes_the_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sites"))
        .and(query_param("search", "test site"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"value":[{"displayName":"Test site","id":"123"}]}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let sites = client(&server).sites().search("test site").await.unwrap();
    assert_eq!(sites.value.len(), 1);

    // Spaces travel as `+` in the query string.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("search=test+site"));
}

#[tokio::test]
async fn site_drives() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/sites/123/drives"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"value":[{"id":"b!1abc","name":"Documents","driveType":"documentLibrary"}]}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let drives = client(&server).sites().drives("123").await.unwrap();
    assert_eq!(drives.value[0].id.as_deref(), Some("b!1abc"));
    assert_eq!(drives.value[0].name.as_deref(), Some("Documents"));
}
