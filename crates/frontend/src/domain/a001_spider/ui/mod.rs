pub mod files;
pub mod list;

pub use files::SpiderFiles;
pub use list::SpiderList;
