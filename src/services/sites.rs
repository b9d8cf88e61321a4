//! SharePoint site discovery.
//!
//! Finding a document library's drive identifier usually takes three hops:
//! search (or list followed sites), pick a site, list its drives.

use crate::client::RequestExecutor;
use crate::errors::GraphDriveResult;
use crate::types::{DriveList, SiteList};
use std::sync::Arc;

/// Service for SharePoint site discovery.
pub struct SitesService {
    executor: Arc<RequestExecutor>,
}

impl SitesService {
    pub(crate) fn new(executor: Arc<RequestExecutor>) -> Self {
        Self { executor }
    }

    /// Lists the SharePoint sites the signed-in user follows.
    pub async fn followed(&self) -> GraphDriveResult<SiteList> {
        self.executor.get_json("/me/followedSites").await
    }

    /// Searches for SharePoint sites by free-text query.
    pub async fn search(&self, query: &str) -> GraphDriveResult<SiteList> {
        let query_string = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("search", query)
            .finish();
        self.executor.get_json(&format!("/sites?{query_string}")).await
    }

    /// Lists a SharePoint site's drives (document libraries).
    pub async fn drives(&self, site_id: &str) -> GraphDriveResult<DriveList> {
        self.executor
            .get_json(&format!("/sites/{site_id}/drives"))
            .await
    }
}
