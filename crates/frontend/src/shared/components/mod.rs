pub mod error_banner;
pub mod file_browser;
pub mod page_header;
pub mod pagination_controls;
pub mod status_badge;

pub use error_banner::ErrorBanner;
pub use file_browser::FileBrowser;
pub use page_header::PageHeader;
pub use pagination_controls::PaginationControls;
pub use status_badge::StatusBadge;
