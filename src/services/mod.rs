//! Graph drive service implementations.

mod items;
mod sites;
mod upload;

pub use items::ItemsService;
pub use sites::SitesService;
pub use upload::UploadSession;
