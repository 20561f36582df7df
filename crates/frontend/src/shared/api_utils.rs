//! API utilities for frontend-backend communication
//!
//! Resolves the backend base URL used by the [`ApiClient`](super::request::ApiClient).

use super::settings::Settings;

/// Port the backend listens on next to the console
pub const API_PORT: u16 = 8000;

/// Get the base URL for API requests
///
/// Uses the override stored in settings when present, otherwise the current
/// window location with port 8000, e.g. "http://localhost:8000/api".
/// Returns an empty string if window is not available.
pub fn api_base(settings: &Settings) -> String {
    if let Some(base) = settings.api_base_override() {
        return base;
    }
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    location_api_base(&protocol, &hostname)
}

pub fn location_api_base(protocol: &str, hostname: &str) -> String {
    format!("{}//{}:{}/api", protocol, hostname, API_PORT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::settings::MemoryStorage;
    use std::rc::Rc;

    #[test]
    fn test_location_api_base() {
        assert_eq!(
            location_api_base("https:", "crawler.local"),
            "https://crawler.local:8000/api"
        );
    }

    #[test]
    fn test_override_wins() {
        let settings = Settings::new(Rc::new(MemoryStorage::default()));
        settings.set_api_base_override(Some("http://10.0.0.5:9000/api"));
        assert_eq!(api_base(&settings), "http://10.0.0.5:9000/api");
    }
}
