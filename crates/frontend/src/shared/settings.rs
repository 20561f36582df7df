//! Persisted console settings
//!
//! Values live in `localStorage` as JSON under fixed keys. Reads never fail:
//! a missing or unparsable value falls back to the default.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use web_sys::window;

pub const KEY_LANG: &str = "lang";
pub const KEY_TOKEN: &str = "token";
pub const KEY_SYSTEM_INFO: &str = "systemInfo";
pub const KEY_SIDEBAR_COLLAPSED: &str = "sidebarCollapsed";
pub const KEY_TABS: &str = "tabs";
pub const KEY_CHAT_SIDEBAR_VISIBLE: &str = "chatSidebarVisible";
pub const KEY_CHAT_SIDEBAR_WIDTH: &str = "chatSidebarWidth";
pub const KEY_API_BASE: &str = "apiBase";

pub const DEFAULT_LANG: &str = "en";
pub const DEFAULT_CHAT_SIDEBAR_WIDTH: u32 = 400;
pub const MIN_CHAT_SIDEBAR_WIDTH: u32 = 300;
pub const MAX_CHAT_SIDEBAR_WIDTH: u32 = 960;

/// String key-value storage (browser `localStorage` or memory in tests)
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

pub struct BrowserStorage;

fn get_local_storage() -> Option<web_sys::Storage> {
    window()?.local_storage().ok()?
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        get_local_storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = get_local_storage() {
            let _ = storage.set_item(key, value);
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = get_local_storage() {
            let _ = storage.remove_item(key);
        }
    }
}

#[derive(Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// Backend edition and version, cached after the first system info call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(default)]
    pub edition: String,
    #[serde(default)]
    pub version: String,
}

/// Opened tab restored on reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredTab {
    pub key: String,
    pub title: String,
}

#[derive(Clone)]
pub struct Settings {
    store: Rc<dyn KeyValueStore>,
}

impl Settings {
    pub fn new(store: Rc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn browser() -> Self {
        Self::new(Rc::new(BrowserStorage))
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.store.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("settings: ignoring invalid value for '{}': {}", key, e);
                None
            }
        }
    }

    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(raw) => self.store.set(key, &raw),
            Err(e) => log::error!("settings: failed to serialize '{}': {}", key, e),
        }
    }

    pub fn remove(&self, key: &str) {
        self.store.remove(key);
    }

    pub fn lang(&self) -> String {
        self.load(KEY_LANG)
            .unwrap_or_else(|| DEFAULT_LANG.to_string())
    }

    pub fn set_lang(&self, lang: &str) {
        self.save(KEY_LANG, lang);
    }

    pub fn token(&self) -> Option<String> {
        self.load::<String>(KEY_TOKEN).filter(|t| !t.is_empty())
    }

    pub fn set_token(&self, token: Option<&str>) {
        match token {
            Some(token) => self.save(KEY_TOKEN, token),
            None => self.remove(KEY_TOKEN),
        }
    }

    pub fn system_info(&self) -> Option<SystemInfo> {
        self.load(KEY_SYSTEM_INFO)
    }

    pub fn set_system_info(&self, info: &SystemInfo) {
        self.save(KEY_SYSTEM_INFO, info);
    }

    pub fn sidebar_collapsed(&self) -> bool {
        self.load(KEY_SIDEBAR_COLLAPSED).unwrap_or(false)
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) {
        self.save(KEY_SIDEBAR_COLLAPSED, &collapsed);
    }

    pub fn tabs(&self) -> Vec<StoredTab> {
        self.load(KEY_TABS).unwrap_or_default()
    }

    pub fn set_tabs(&self, tabs: &[StoredTab]) {
        self.save(KEY_TABS, tabs);
    }

    pub fn chat_sidebar_visible(&self) -> bool {
        self.load(KEY_CHAT_SIDEBAR_VISIBLE).unwrap_or(false)
    }

    pub fn set_chat_sidebar_visible(&self, visible: bool) {
        self.save(KEY_CHAT_SIDEBAR_VISIBLE, &visible);
    }

    pub fn chat_sidebar_width(&self) -> u32 {
        self.load::<u32>(KEY_CHAT_SIDEBAR_WIDTH)
            .map(clamp_chat_width)
            .unwrap_or(DEFAULT_CHAT_SIDEBAR_WIDTH)
    }

    pub fn set_chat_sidebar_width(&self, width: u32) {
        self.save(KEY_CHAT_SIDEBAR_WIDTH, &clamp_chat_width(width));
    }

    /// Stored override of the backend base URL, if any
    pub fn api_base_override(&self) -> Option<String> {
        self.load::<String>(KEY_API_BASE)
            .map(|base| base.trim().trim_end_matches('/').to_string())
            .filter(|base| !base.is_empty())
    }

    pub fn set_api_base_override(&self, base: Option<&str>) {
        match base {
            Some(base) => self.save(KEY_API_BASE, base),
            None => self.remove(KEY_API_BASE),
        }
    }
}

fn clamp_chat_width(width: u32) -> u32 {
    width.clamp(MIN_CHAT_SIDEBAR_WIDTH, MAX_CHAT_SIDEBAR_WIDTH)
}
