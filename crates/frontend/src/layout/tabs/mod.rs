//! Tab management module
//!
//! - `page` - tab content wrapper
//! - `registry` - tab.key to View mapping
//! - `tab_labels` - tab titles and keys

pub mod page;
pub mod registry;
pub mod tab_labels;

pub use page::TabPage;
pub use tab_labels::{files_tab_key, files_tab_title, parse_files_tab_key, tab_label_for_key};
