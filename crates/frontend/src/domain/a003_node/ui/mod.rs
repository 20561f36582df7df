pub mod list;

pub use list::NodeList;
