use crate::shared::api_utils::api_base;
use crate::shared::request::ApiClient;
use crate::shared::settings::{Settings, StoredTab, SystemInfo};
use leptos::prelude::Effect;
use leptos::prelude::*;
use std::collections::HashMap;
use web_sys::window;

const SYSTEM_INFO_PATH: &str = "/system-info";

#[derive(Clone, Copy)]
pub struct AppGlobalContext {
    pub opened: RwSignal<Vec<Tab>>,
    pub active: RwSignal<Option<String>>,
    pub left_open: RwSignal<bool>,
    pub chat_open: RwSignal<bool>,
    pub chat_width: RwSignal<u32>,
    pub system_info: RwSignal<Option<SystemInfo>>,
    pub lang: RwSignal<String>,
    settings: StoredValue<Settings, LocalStorage>,
    api: StoredValue<ApiClient, LocalStorage>,
}

impl AppGlobalContext {
    /// Context backed by browser storage and the default API base
    pub fn browser() -> Self {
        let settings = Settings::browser();
        let client = ApiClient::browser(api_base(&settings));
        client.set_token(settings.token());
        Self::new(settings, client)
    }

    pub fn new(settings: Settings, client: ApiClient) -> Self {
        let opened = restore_tabs(&settings.tabs());
        Self {
            opened: RwSignal::new(opened),
            active: RwSignal::new(None),
            left_open: RwSignal::new(!settings.sidebar_collapsed()),
            chat_open: RwSignal::new(settings.chat_sidebar_visible()),
            chat_width: RwSignal::new(settings.chat_sidebar_width()),
            system_info: RwSignal::new(settings.system_info()),
            lang: RwSignal::new(settings.lang()),
            settings: StoredValue::new_local(settings),
            api: StoredValue::new_local(client),
        }
    }

    pub fn api_client(&self) -> ApiClient {
        self.api.get_value()
    }

    pub fn settings(&self) -> Settings {
        self.settings.get_value()
    }

    /// Refresh the backend version shown in the header; the cached value stays on failure
    pub fn load_system_info(&self) {
        let this = *self;
        let client = self.api_client();
        leptos::task::spawn_local(async move {
            match client.get::<SystemInfo>(SYSTEM_INFO_PATH, Vec::new()).await {
                Ok(info) => {
                    this.settings.with_value(|s| s.set_system_info(&info));
                    this.system_info.set(Some(info));
                }
                Err(e) => log::warn!("system info unavailable: {}", e),
            }
        });
    }

    /// Persist opened tabs on every change
    pub fn init_persistence(&self) {
        let this = *self;
        Effect::new(move |_| {
            let tabs = this.opened.get();
            this.settings.with_value(|s| s.set_tabs(&store_tabs(&tabs)));
        });
    }

    /// Keep `<html lang>` in sync with the chosen language
    pub fn init_document_lang(&self) {
        let this = *self;
        Effect::new(move |_| {
            let lang = this.lang.get();
            let root = window()
                .and_then(|w| w.document())
                .and_then(|d| d.document_element());
            if let Some(root) = root {
                if let Err(e) = root.set_attribute("lang", &lang) {
                    log::warn!("failed to set document lang: {:?}", e);
                }
            }
        });
    }

    pub fn init_router_integration(&self) {
        let search = window()
            .and_then(|w| w.location().search().ok())
            .unwrap_or_default();
        let params: HashMap<String, String> =
            serde_qs::from_str(search.trim_start_matches('?')).unwrap_or_default();
        match params.get("active").cloned() {
            Some(active_key) => {
                let title = crate::layout::tabs::tab_label_for_key(&active_key);
                self.open_tab(&active_key, &title);
            }
            None => {
                let last = self
                    .opened
                    .with_untracked(|tabs| tabs.last().map(|t| t.key.clone()));
                if let Some(key) = last {
                    self.activate_tab(&key);
                }
            }
        }

        let this = *self;
        Effect::new(move |_| {
            if let Some(active_key) = this.active.get() {
                let query_string =
                    serde_qs::to_string(&HashMap::from([("active".to_string(), active_key)]))
                        .unwrap_or_default();
                let new_url = format!("?{}", query_string);

                let current_search = window()
                    .and_then(|w| w.location().search().ok())
                    .unwrap_or_default();

                // Only update URL if it actually changed
                if current_search != new_url {
                    if let Some(w) = window() {
                        if let Ok(history) = w.history() {
                            let _ = history.replace_state_with_url(
                                &wasm_bindgen::JsValue::NULL,
                                "",
                                Some(&new_url),
                            );
                        }
                    }
                }
            }
        });
    }

    pub fn open_tab(&self, key: &str, title: &str) {
        leptos::logging::log!("open_tab: key='{}', title='{}'", key, title);
        let exists = self
            .opened
            .with_untracked(|tabs| tabs.iter().any(|tab| tab.key == key));
        if !exists {
            self.opened.update(|tabs| tabs.push(Tab::new(key, title)));
        }
        self.activate_tab(key);
    }

    pub fn activate_tab(&self, key: &str) {
        self.active.set(Some(key.to_string()));
    }

    pub fn update_tab_title(&self, key: &str, new_title: &str) {
        self.opened.update(|tabs| {
            if let Some(tab) = tabs.iter_mut().find(|t| t.key == key) {
                tab.title = new_title.to_string();
            }
        });
    }

    /// Mark a tab as having unsaved edits
    pub fn set_tab_dirty(&self, key: &str, dirty: bool) {
        let changed = self.opened.with_untracked(|tabs| {
            tabs.iter().any(|t| t.key == key && t.dirty != dirty)
        });
        if changed {
            self.opened.update(|tabs| {
                if let Some(tab) = tabs.iter_mut().find(|t| t.key == key) {
                    tab.dirty = dirty;
                }
            });
        }
    }

    pub fn close_tab(&self, key: &str) {
        leptos::logging::log!("close_tab: key='{}'", key);
        self.opened.update(|tabs| tabs.retain(|tab| tab.key != key));
        if self
            .active
            .with_untracked(|active| active.as_deref() == Some(key))
        {
            let next_active = self
                .opened
                .with_untracked(|tabs| tabs.last().map(|t| t.key.clone()));
            self.active.set(next_active);
        }
    }

    pub fn toggle_left(&self) {
        self.left_open.update(|val| *val = !*val);
        let collapsed = !self.left_open.get_untracked();
        self.settings.with_value(|s| s.set_sidebar_collapsed(collapsed));
    }

    pub fn toggle_chat(&self) {
        self.chat_open.update(|val| *val = !*val);
        let visible = self.chat_open.get_untracked();
        self.settings.with_value(|s| s.set_chat_sidebar_visible(visible));
    }

    pub fn set_lang(&self, lang: &str) {
        self.settings.with_value(|s| s.set_lang(lang));
        self.lang.set(lang.to_string());
    }

    pub fn set_chat_width(&self, width: u32) {
        self.settings.with_value(|s| s.set_chat_sidebar_width(width));
        let stored = self.settings.with_value(|s| s.chat_sidebar_width());
        self.chat_width.set(stored);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub key: String,
    pub title: String,
    pub dirty: bool,
}

impl Tab {
    pub fn new(key: &str, title: &str) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            dirty: false,
        }
    }
}

/// Tabs as written to storage; the dirty flag is not kept across reloads
fn store_tabs(tabs: &[Tab]) -> Vec<StoredTab> {
    tabs.iter()
        .map(|t| StoredTab {
            key: t.key.clone(),
            title: t.title.clone(),
        })
        .collect()
}

fn restore_tabs(stored: &[StoredTab]) -> Vec<Tab> {
    let mut tabs: Vec<Tab> = Vec::with_capacity(stored.len());
    for s in stored {
        if !s.key.is_empty() && !tabs.iter().any(|t| t.key == s.key) {
            tabs.push(Tab::new(&s.key, &s.title));
        }
    }
    tabs
}
