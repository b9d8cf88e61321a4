//! Drive-scope variants: personal drives and document libraries.
//!
//! The two variants are polymorphic over the same operation set and differ
//! only in how endpoint paths are rooted and which identifiers are
//! mandatory. The shared item and upload logic composes over the
//! [`ScopePolicy`] trait rather than knowing about either variant.

use crate::errors::ArgumentError;
use crate::urls;

/// The drive namespace a request is rooted in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriveScope {
    /// The signed-in user's own drive (`/me/drive`).
    Me,
    /// An explicit drive (a document library in SharePoint).
    Drive(String),
}

/// Reference to a DriveItem, by server-assigned identifier or by
/// drive-relative path.
///
/// Exactly one addressing mode applies per reference; the variant makes
/// invalid combinations unrepresentable. Callers holding a pair of optional
/// fields go through [`ItemRef::new`], the single validation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemRef {
    /// Opaque item identifier.
    Id(String),
    /// Slash-delimited path from the drive root.
    Path(String),
}

impl ItemRef {
    /// Validates a raw (item_id, item_path) pair into a reference.
    ///
    /// Exactly one of the two must be present and non-empty; anything else
    /// is an [`ArgumentError`], raised before any network I/O.
    pub fn new(
        item_id: Option<String>,
        item_path: Option<String>,
    ) -> Result<Self, ArgumentError> {
        match (item_id, item_path) {
            (Some(_), Some(_)) => Err(ArgumentError::AmbiguousItemReference),
            (Some(id), None) if !id.is_empty() => Ok(ItemRef::Id(id)),
            (None, Some(path)) if !path.is_empty() => Ok(ItemRef::Path(path)),
            _ => Err(ArgumentError::MissingItemReference),
        }
    }

    /// References an item by its server-assigned identifier.
    pub fn by_id(id: impl Into<String>) -> Self {
        ItemRef::Id(id.into())
    }

    /// References an item by its drive-relative path.
    pub fn by_path(path: impl Into<String>) -> Self {
        ItemRef::Path(path.into())
    }
}

/// URL-rooting and required-argument rules for a drive scope variant.
///
/// Implementations supply [`drive_root`](ScopePolicy::drive_root); the
/// endpoint paths every operation uses are derived from it by the provided
/// methods, so argument validation happens exactly once per call, before
/// anything touches the network.
pub trait ScopePolicy: Send + Sync {
    /// Resolves the scope's drive root path, e.g. `/me/drive` or
    /// `/drives/<id>`. Fails when a required identifier is absent.
    fn drive_root(&self) -> Result<String, ArgumentError>;

    /// Endpoint path for the referenced item.
    fn item_path(&self, item: &ItemRef) -> Result<String, ArgumentError> {
        Ok(urls::item_url(&self.drive_root()?, item))
    }

    /// Endpoint path for a folder's children.
    fn children_path(&self, folder_path: Option<&str>) -> Result<String, ArgumentError> {
        Ok(urls::children_url(&self.drive_root()?, folder_path))
    }

    /// Endpoint path for the referenced item's content.
    fn content_path(&self, item: &ItemRef) -> Result<String, ArgumentError> {
        Ok(urls::content_url(&self.drive_root()?, item))
    }

    /// Endpoint path for creating an upload session on the referenced item.
    fn upload_session_path(&self, item: &ItemRef) -> Result<String, ArgumentError> {
        Ok(urls::create_upload_session_url(&self.drive_root()?, item))
    }
}

/// Personal-drive scope. Defaults to the caller's own drive and also accepts
/// an explicit drive identifier.
#[derive(Debug, Clone)]
pub struct PersonalScope {
    scope: DriveScope,
}

impl PersonalScope {
    /// Scope rooted at the caller's own drive.
    pub fn new() -> Self {
        Self {
            scope: DriveScope::Me,
        }
    }

    /// Scope rooted at an explicit drive.
    pub fn with_drive(drive_id: impl Into<String>) -> Self {
        Self {
            scope: DriveScope::Drive(drive_id.into()),
        }
    }
}

impl Default for PersonalScope {
    fn default() -> Self {
        Self::new()
    }
}

impl From<DriveScope> for PersonalScope {
    fn from(scope: DriveScope) -> Self {
        Self { scope }
    }
}

impl ScopePolicy for PersonalScope {
    fn drive_root(&self) -> Result<String, ArgumentError> {
        Ok(match &self.scope {
            DriveScope::Me => "/me/drive".to_string(),
            DriveScope::Drive(id) => format!("/drives/{id}"),
        })
    }
}

/// Document-library scope. An explicit drive identifier is required for
/// every item operation.
#[derive(Debug, Clone)]
pub struct LibraryScope {
    drive_id: Option<String>,
}

impl LibraryScope {
    /// Scope bound to a document library's drive.
    pub fn new(drive_id: impl Into<String>) -> Self {
        Self {
            drive_id: Some(drive_id.into()),
        }
    }

    /// Scope with no drive bound yet. Item operations fail with
    /// [`ArgumentError::MissingDriveId`] until a drive is supplied; site
    /// discovery does not need one.
    pub fn unbound() -> Self {
        Self { drive_id: None }
    }
}

impl ScopePolicy for LibraryScope {
    fn drive_root(&self) -> Result<String, ArgumentError> {
        match self.drive_id.as_deref() {
            Some(id) if !id.is_empty() => Ok(format!("/drives/{id}")),
            _ => Err(ArgumentError::MissingDriveId),
        }
    }
}
