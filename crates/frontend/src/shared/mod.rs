pub mod api_error;
pub mod api_utils;
pub mod browser_file;
pub mod chat;
pub mod components;
pub mod date_utils;
pub mod debounce;
pub mod icons;
pub mod page_frame;
pub mod request;
pub mod settings;
pub mod store;
#[cfg(test)]
pub mod testing;
pub mod transport;
