//! Endpoint path construction for drive resources.
//!
//! Pure functions mapping a drive root plus an item reference to the Graph
//! endpoint path. Path-addressed items use the colon-delimited convention
//! (`root:/<path>` and `root:/<path>:/<verb>`); identifier-addressed items
//! target `items/<id>` directly.

use crate::scope::ItemRef;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Bytes escaped inside a drive path: everything except unreserved
/// characters, with `/` passed through as the segment delimiter.
const DRIVE_PATH: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

/// Percent-encodes a drive path, segment by segment.
///
/// Leading and trailing slashes are stripped before encoding; interior
/// slashes are preserved as delimiters.
pub fn encode_path(path: &str) -> String {
    utf8_percent_encode(path.trim_matches('/'), DRIVE_PATH).to_string()
}

/// Endpoint path for an item, addressed by identifier or by path.
pub fn item_url(drive_root: &str, item: &ItemRef) -> String {
    match item {
        ItemRef::Id(id) => format!("{drive_root}/items/{id}"),
        ItemRef::Path(path) => format!("{drive_root}/root:/{}", encode_path(path)),
    }
}

/// Endpoint path for listing a folder's children.
///
/// Targets the drive root's children when no folder path is given (an empty
/// or all-slash path counts as absent).
pub fn children_url(drive_root: &str, folder_path: Option<&str>) -> String {
    match folder_path.map(|p| encode_path(p)).filter(|p| !p.is_empty()) {
        None => format!("{drive_root}/root/children"),
        Some(path) => format!("{drive_root}/root:/{path}:/children"),
    }
}

/// Endpoint path for an item's content.
pub fn content_url(drive_root: &str, item: &ItemRef) -> String {
    let base = item_url(drive_root, item);
    match item {
        ItemRef::Id(_) => format!("{base}/content"),
        ItemRef::Path(_) => format!("{base}:/content"),
    }
}

/// Endpoint path for creating an upload session on an item.
pub fn create_upload_session_url(drive_root: &str, item: &ItemRef) -> String {
    let base = item_url(drive_root, item);
    match item {
        ItemRef::Id(_) => format!("{base}/createUploadSession"),
        ItemRef::Path(_) => format!("{base}:/createUploadSession"),
    }
}
