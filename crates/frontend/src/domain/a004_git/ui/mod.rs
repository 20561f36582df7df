pub mod files;
pub mod list;

pub use files::GitFiles;
pub use list::GitList;
