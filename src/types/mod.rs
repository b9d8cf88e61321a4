//! Wire models for Graph drive and site resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A file, folder, or other item stored in a drive.
///
/// Fields the service omits for a given item kind are `None`; folders carry
/// the `folder` facet, files the `file` facet.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DriveItem {
    /// Item identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Item name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    /// ETag of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,

    /// CTag of the item's content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub c_tag: Option<String>,

    /// URL to view the item in a browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<DateTime<Utc>>,

    /// File facet, present when the item is a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<FileFacet>,

    /// Folder facet, present when the item is a folder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder: Option<FolderFacet>,

    /// Parent drive and folder of the item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_reference: Option<ItemReference>,

    /// Pre-signed, short-lived URL for downloading the item's content.
    /// Requires no authentication.
    #[serde(
        rename = "@microsoft.graph.downloadUrl",
        skip_serializing_if = "Option::is_none"
    )]
    pub download_url: Option<String>,
}

impl DriveItem {
    /// Returns true when the item carries the folder facet.
    pub fn is_folder(&self) -> bool {
        self.folder.is_some()
    }
}

/// File-specific metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FileFacet {
    /// MIME type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,

    /// Content hashes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Hashes>,
}

/// Content hashes for a file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Hashes {
    /// QuickXor hash (OneDrive for Business and SharePoint).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quick_xor_hash: Option<String>,

    /// SHA-1 hash (personal OneDrive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha1_hash: Option<String>,

    /// SHA-256 hash.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256_hash: Option<String>,
}

/// Folder-specific metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct FolderFacet {
    /// Number of children.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub child_count: Option<i64>,
}

/// Reference to an item's parent drive and folder.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    /// Drive identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_id: Option<String>,

    /// Drive type (`personal`, `business`, `documentLibrary`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,

    /// Parent item identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Parent path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Site identifier (SharePoint).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
}

/// A collection of drive items, as returned by children listings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DriveItemList {
    /// The items.
    pub value: Vec<DriveItem>,

    /// Link to the next page, when the listing is paged.
    #[serde(
        rename = "@odata.nextLink",
        skip_serializing_if = "Option::is_none"
    )]
    pub next_link: Option<String>,
}

/// A SharePoint site.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    /// Site identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Site name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// URL of the site.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_date_time: Option<DateTime<Utc>>,

    /// Last modification time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified_date_time: Option<DateTime<Utc>>,
}

/// A collection of sites.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SiteList {
    /// The sites.
    pub value: Vec<Site>,
}

/// A drive. In SharePoint, a drive is a document library.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DriveInfo {
    /// Drive identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Drive name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Drive type (`personal`, `business`, `documentLibrary`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drive_type: Option<String>,

    /// URL of the drive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_url: Option<String>,

    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A collection of drives.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DriveList {
    /// The drives.
    pub value: Vec<DriveInfo>,
}

/// Response to an upload-session creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSessionInfo {
    /// Session-scoped, time-limited URL chunk requests are sent to.
    pub upload_url: String,

    /// When the session expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date_time: Option<DateTime<Utc>>,

    /// Byte ranges the server still expects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_expected_ranges: Option<Vec<String>>,
}
