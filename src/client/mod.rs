//! Client entry points for the two drive-scope variants.
//!
//! [`OneDrive`] targets a personal drive and defaults to the caller's own
//! (`/me/drive`); [`SharePoint`] targets a document library and requires an
//! explicit drive identifier for item operations. Both share the item and
//! upload logic through an injected scope policy.

use crate::auth::AccessToken;
use crate::config::{GraphDriveConfig, GraphDriveConfigBuilder};
use crate::errors::GraphDriveResult;
use crate::resilience::RetryConfig;
use crate::scope::{LibraryScope, PersonalScope, ScopePolicy};
use crate::services::{ItemsService, SitesService};
use crate::transport::{HttpTransport, ReqwestTransport};
use std::sync::Arc;
use std::time::Duration;

mod executor;
pub use executor::RequestExecutor;

fn build_executor(config: GraphDriveConfig) -> GraphDriveResult<Arc<RequestExecutor>> {
    let transport: Arc<dyn HttpTransport> = Arc::new(ReqwestTransport::with_settings(
        config.connect_timeout,
        &config.pool,
    )?);
    Ok(Arc::new(RequestExecutor::new(config, transport)))
}

/// Client for items stored in a personal drive.
///
/// # Example
///
/// ```no_run
/// use msgraph_drive::{ItemRef, OneDrive};
///
/// # async fn example() -> msgraph_drive::GraphDriveResult<()> {
/// let drive = OneDrive::new("access_token_here")?;
///
/// // List files and folders in the root directory:
/// let root = drive.items().list(None).await?;
///
/// // List a sub-directory:
/// let docs = drive.items().list(Some("/Documents")).await?;
///
/// // Get file or folder metadata:
/// let item = drive.items().get(&ItemRef::by_path("/Documents/my-data.csv")).await?;
///
/// // Download and upload:
/// drive
///     .items()
///     .download(&ItemRef::by_path("/Documents/my-data.csv"), "my-data.csv")
///     .await?;
/// drive
///     .items()
///     .upload(&ItemRef::by_path("/Documents/new-file.csv"), "new-file.csv")
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct OneDrive {
    executor: Arc<RequestExecutor>,
    scope: Arc<dyn ScopePolicy>,
}

impl OneDrive {
    /// Creates a client for the caller's own drive with default settings.
    pub fn new(access_token: impl Into<AccessToken>) -> GraphDriveResult<Self> {
        Self::builder().access_token(access_token).build()
    }

    /// Creates a new client builder.
    pub fn builder() -> OneDriveBuilder {
        OneDriveBuilder::new()
    }

    /// Access item operations: metadata, listing, download, upload.
    pub fn items(&self) -> ItemsService {
        ItemsService::new(Arc::clone(&self.executor), Arc::clone(&self.scope))
    }

    /// The configuration this client runs under.
    pub fn config(&self) -> &GraphDriveConfig {
        self.executor.config()
    }
}

/// Builder for [`OneDrive`].
pub struct OneDriveBuilder {
    config: GraphDriveConfigBuilder,
    drive_id: Option<String>,
}

impl OneDriveBuilder {
    fn new() -> Self {
        Self {
            config: GraphDriveConfig::builder(),
            drive_id: None,
        }
    }

    /// Sets the bearer token.
    pub fn access_token(mut self, token: impl Into<AccessToken>) -> Self {
        self.config = self.config.access_token(token);
        self
    }

    /// Targets an explicit drive instead of the caller's own.
    pub fn drive_id(mut self, drive_id: impl Into<String>) -> Self {
        self.drive_id = Some(drive_id.into());
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.base_url(url);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config = self.config.user_agent(ua);
        self
    }

    /// Sets the single-request upload cutoff.
    pub fn simple_upload_threshold(mut self, bytes: u64) -> Self {
        self.config = self.config.simple_upload_threshold(bytes);
        self
    }

    /// Sets the upload-session chunk size (must be a multiple of 320 KiB).
    pub fn upload_chunk_size(mut self, bytes: usize) -> Self {
        self.config = self.config.upload_chunk_size(bytes);
        self
    }

    /// Sets the retry policy for upload-session chunks.
    pub fn upload_retry(mut self, retry: RetryConfig) -> Self {
        self.config = self.config.upload_retry(retry);
        self
    }

    /// Builds the client.
    pub fn build(self) -> GraphDriveResult<OneDrive> {
        let config = self.config.build()?;
        let executor = build_executor(config)?;

        let scope: Arc<dyn ScopePolicy> = match self.drive_id {
            Some(id) => Arc::new(PersonalScope::with_drive(id)),
            None => Arc::new(PersonalScope::new()),
        };

        Ok(OneDrive { executor, scope })
    }
}

/// Client for items stored in a SharePoint document library.
///
/// A drive identifier (a drive being a document library) is required for
/// item operations and can be discovered through [`SharePoint::sites`]:
///
/// ```no_run
/// use msgraph_drive::SharePoint;
///
/// # async fn example() -> msgraph_drive::GraphDriveResult<()> {
/// let sharepoint = SharePoint::new("access_token_here")?;
///
/// // Find the site, then its drives:
/// let sites = sharepoint.sites().search("my sharepoint site").await?;
/// let site_id = sites.value[0].id.clone().unwrap_or_default();
/// let drives = sharepoint.sites().drives(&site_id).await?;
/// # Ok(())
/// # }
/// ```
pub struct SharePoint {
    executor: Arc<RequestExecutor>,
    scope: Arc<dyn ScopePolicy>,
}

impl SharePoint {
    /// Creates a client with default settings and no drive bound yet; site
    /// discovery works immediately, item operations need a drive identifier.
    pub fn new(access_token: impl Into<AccessToken>) -> GraphDriveResult<Self> {
        Self::builder().access_token(access_token).build()
    }

    /// Creates a new client builder.
    pub fn builder() -> SharePointBuilder {
        SharePointBuilder::new()
    }

    /// Access item operations: metadata, listing, download, upload.
    pub fn items(&self) -> ItemsService {
        ItemsService::new(Arc::clone(&self.executor), Arc::clone(&self.scope))
    }

    /// Access site discovery: followed sites, search, site drives.
    pub fn sites(&self) -> SitesService {
        SitesService::new(Arc::clone(&self.executor))
    }

    /// The configuration this client runs under.
    pub fn config(&self) -> &GraphDriveConfig {
        self.executor.config()
    }
}

/// Builder for [`SharePoint`].
pub struct SharePointBuilder {
    config: GraphDriveConfigBuilder,
    drive_id: Option<String>,
}

impl SharePointBuilder {
    fn new() -> Self {
        Self {
            config: GraphDriveConfig::builder(),
            drive_id: None,
        }
    }

    /// Sets the bearer token.
    pub fn access_token(mut self, token: impl Into<AccessToken>) -> Self {
        self.config = self.config.access_token(token);
        self
    }

    /// Sets the document library's drive identifier.
    pub fn drive_id(mut self, drive_id: impl Into<String>) -> Self {
        self.drive_id = Some(drive_id.into());
        self
    }

    /// Sets the API base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config = self.config.base_url(url);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.timeout(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.connect_timeout(timeout);
        self
    }

    /// Sets the user agent string.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config = self.config.user_agent(ua);
        self
    }

    /// Sets the single-request upload cutoff.
    pub fn simple_upload_threshold(mut self, bytes: u64) -> Self {
        self.config = self.config.simple_upload_threshold(bytes);
        self
    }

    /// Sets the upload-session chunk size (must be a multiple of 320 KiB).
    pub fn upload_chunk_size(mut self, bytes: usize) -> Self {
        self.config = self.config.upload_chunk_size(bytes);
        self
    }

    /// Sets the retry policy for upload-session chunks.
    pub fn upload_retry(mut self, retry: RetryConfig) -> Self {
        self.config = self.config.upload_retry(retry);
        self
    }

    /// Builds the client.
    pub fn build(self) -> GraphDriveResult<SharePoint> {
        let config = self.config.build()?;
        let executor = build_executor(config)?;

        let scope: Arc<dyn ScopePolicy> = match self.drive_id {
            Some(id) => Arc::new(LibraryScope::new(id)),
            None => Arc::new(LibraryScope::unbound()),
        };

        Ok(SharePoint { executor, scope })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn onedrive_builder_defaults() {
        let drive = OneDrive::builder()
            .access_token("token123")
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();
        assert_eq!(drive.config().timeout, Duration::from_secs(60));
    }

    #[test]
    fn clients_require_an_access_token() {
        assert!(OneDrive::builder().build().is_err());
        assert!(SharePoint::builder().build().is_err());
    }

    #[test]
    fn sharepoint_builds_without_a_drive_id() {
        // Site discovery needs no drive; item operations will fail with an
        // argument error until one is bound.
        assert!(SharePoint::new("token123").is_ok());
    }
}
