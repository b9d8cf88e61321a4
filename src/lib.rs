//! Microsoft Graph Drive Client
//!
//! This crate provides a type-safe interface for working with files stored
//! in OneDrive and SharePoint (DriveItems) through the Microsoft Graph REST
//! API: listing, metadata, streaming download, and upload, including the
//! chunked upload-session protocol for large files.
//!
//! Authentication is out of scope: the client consumes a pre-obtained
//! bearer token and attaches it to every request.
//!
//! # Features
//!
//! - **Item operations**: get metadata, list folders, download, upload
//! - **Two drive scopes**: personal drives (`/me/drive` or an explicit
//!   drive) and SharePoint document libraries
//! - **Chunked uploads**: automatic upload-session handling with
//!   per-chunk retry on transient server failures
//! - **Site discovery**: followed sites, site search, site drives
//! - **Typed errors**: invalid token / not found / rate limited / generic,
//!   classified from Graph error payloads
//!
//! # Example
//!
//! ```no_run
//! use msgraph_drive::{ItemRef, OneDrive};
//!
//! # async fn example() -> msgraph_drive::GraphDriveResult<()> {
//! let drive = OneDrive::new("access_token_here")?;
//!
//! // List files and folders in a sub-directory:
//! let listing = drive.items().list(Some("/Documents")).await?;
//! for item in listing.value {
//!     println!("{}", item.name.unwrap_or_default());
//! }
//!
//! // Upload a file (chunked automatically when large):
//! let uploaded = drive
//!     .items()
//!     .upload(&ItemRef::by_path("/Documents/report.csv"), "report.csv")
//!     .await?;
//! println!("uploaded as {:?}", uploaded.id);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod resilience;
pub mod scope;
pub mod services;
pub mod transport;
pub mod types;
pub mod urls;

// Re-exports for convenience
pub use auth::AccessToken;
pub use client::{OneDrive, SharePoint};
pub use config::GraphDriveConfig;
pub use errors::{ApiError, ArgumentError, GraphDriveError, GraphDriveResult};
pub use scope::{DriveScope, ItemRef};
pub use types::{DriveItem, DriveItemList};

/// Prelude module with commonly used types and traits.
///
/// ```no_run
/// use msgraph_drive::prelude::*;
/// ```
pub mod prelude {
    // Clients
    pub use crate::client::{OneDrive, SharePoint};

    // Configuration
    pub use crate::config::{GraphDriveConfig, GraphDriveConfigBuilder};

    // Addressing
    pub use crate::scope::{DriveScope, ItemRef, LibraryScope, PersonalScope, ScopePolicy};

    // Services
    pub use crate::services::{ItemsService, SitesService, UploadSession};

    // Common types
    pub use crate::types::{
        DriveInfo, DriveItem, DriveItemList, DriveList, Site, SiteList, UploadSessionInfo,
    };

    // Errors
    pub use crate::errors::{
        ApiError, ArgumentError, GraphDriveError, GraphDriveResult, TransportError,
    };

    // Auth
    pub use crate::auth::AccessToken;
}
