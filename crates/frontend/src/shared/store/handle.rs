//! Leptos bindings for the stores
//!
//! Stores are `Rc`-based and live in local (non-`Send`) storage; their state
//! is mirrored into an `RwSignal` through `subscribe`, so views read the
//! signal and call async operations on the store.

use super::file::{FileState, FileStore};
use super::resource::{ResourceState, ResourceStore};
use crate::shared::request::ApiClient;
use contracts::domain::common::Resource;
use contracts::shared::filter::{Condition, Pagination};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Error slot of a page; operations started from the UI report into it
pub type ErrorSignal = RwSignal<Option<String>>;

fn report<T>(error: ErrorSignal, result: crate::shared::api_error::ApiResult<T>) -> Option<T> {
    match result {
        Ok(value) => {
            error.set(None);
            Some(value)
        }
        Err(e) => {
            log::warn!("request failed: {}", e);
            error.set(Some(e.to_string()));
            None
        }
    }
}

pub struct ResourceHandle<T: Resource + Send + Sync> {
    store: StoredValue<ResourceStore<T>, LocalStorage>,
    pub state: RwSignal<ResourceState<T>>,
}

impl<T: Resource + Send + Sync> Clone for ResourceHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Resource + Send + Sync> Copy for ResourceHandle<T> {}

impl<T: Resource + Send + Sync> ResourceHandle<T> {
    pub fn new(client: ApiClient) -> Self {
        let store = ResourceStore::<T>::new(client);
        let state = RwSignal::new(store.snapshot());
        store.subscribe(move |s| state.set(s.clone()));
        Self {
            store: StoredValue::new_local(store),
            state,
        }
    }

    /// Cheap clone of the store (all fields are `Rc`)
    pub fn store(&self) -> ResourceStore<T> {
        self.store.get_value()
    }

    /// Reload the table with the current pagination, filter and sort
    pub fn reload(&self, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            report(error, store.get_list().await);
        });
    }

    pub fn go_to_page(&self, pagination: Pagination, error: ErrorSignal) {
        self.store().set_table_pagination(pagination);
        self.reload(error);
    }

    /// Filter the table by a "contains" match on `key`; empty text drops the filter
    pub fn filter_contains(&self, key: &str, text: &str, error: ErrorSignal) {
        let store = self.store();
        let text = text.trim();
        if text.is_empty() {
            store.reset_table_list_filter_by_key(key);
        } else {
            store.set_table_list_filter_by_key(key, vec![Condition::contains(key, text)]);
        }
        store.reset_table_pagination();
        self.reload(error);
    }

    /// Exact-match filter on `key`; `None` drops it
    pub fn filter_equals(&self, key: &str, value: Option<String>, error: ErrorSignal) {
        let store = self.store();
        match value {
            Some(value) => store.set_table_list_filter_by_key(key, vec![Condition::equal(key, value)]),
            None => store.reset_table_list_filter_by_key(key),
        }
        store.reset_table_pagination();
        self.reload(error);
    }

    pub fn delete_and_reload(&self, id: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            if report(error, store.delete_by_id(&id).await).is_some() {
                report(error, store.get_list().await);
            }
        });
    }

    pub fn delete_many_and_reload(&self, ids: Vec<String>, error: ErrorSignal) {
        if ids.is_empty() {
            return;
        }
        let store = self.store();
        spawn_local(async move {
            if report(error, store.delete_list(ids).await).is_some() {
                report(error, store.get_list().await);
            }
        });
    }
}

pub struct FileHandle<T: Resource + Send + Sync> {
    store: StoredValue<FileStore<T>, LocalStorage>,
    pub resource: ResourceHandle<T>,
    pub files: RwSignal<FileState>,
}

impl<T: Resource + Send + Sync> Clone for FileHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Resource + Send + Sync> Copy for FileHandle<T> {}

impl<T: Resource + Send + Sync> FileHandle<T> {
    pub fn new(client: ApiClient) -> Self {
        let resource = ResourceHandle::<T>::new(client);
        let store = FileStore::new(resource.store());
        let files = RwSignal::new(store.snapshot());
        store.subscribe(move |s| files.set(s.clone()));
        Self {
            store: StoredValue::new_local(store),
            resource,
            files,
        }
    }

    pub fn store(&self) -> FileStore<T> {
        self.store.get_value()
    }

    /// Load the record (for its name) and the root of its file tree
    pub fn load(&self, id: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            report(error, store.resource().get_by_id(&id).await);
            report(error, store.list_dir(&id, "/").await);
        });
    }

    pub fn refresh_tree(&self, id: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            report(error, store.list_dir(&id, "/").await);
        });
    }

    /// Activate a file and fetch its content
    pub fn open_file(&self, id: String, path: String, error: ErrorSignal) {
        let store = self.store();
        store.set_active_file(&path);
        spawn_local(async move {
            report(error, store.get_file(&id, &path).await);
        });
    }

    /// Save the editor text of the active file
    pub fn save_active(&self, id: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            report(error, store.save_active_file(&id).await);
        });
    }

    /// Also runs from a cleanup, when the owning page may already be gone
    pub fn before_leave(&self, id: String) {
        let Some(store) = self.store.try_get_value() else {
            return;
        };
        spawn_local(async move { store.before_leave(&id).await });
    }

    pub fn create_file(&self, id: String, path: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            if report(error, store.save_file(&id, &path, "").await).is_some() {
                report(error, store.list_dir(&id, "/").await);
            }
        });
    }

    pub fn create_dir(&self, id: String, path: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            if report(error, store.save_dir(&id, &path).await).is_some() {
                report(error, store.list_dir(&id, "/").await);
            }
        });
    }

    pub fn rename(&self, id: String, path: String, new_path: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            if report(error, store.rename_file(&id, &path, &new_path).await).is_some() {
                store.reset_editor_cache(Some(&path));
                report(error, store.list_dir(&id, "/").await);
            }
        });
    }

    pub fn copy(&self, id: String, path: String, new_path: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            if report(error, store.copy_file(&id, &path, &new_path).await).is_some() {
                report(error, store.list_dir(&id, "/").await);
            }
        });
    }

    pub fn delete(&self, id: String, path: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            if report(error, store.delete_file(&id, &path).await).is_some() {
                store.reset_editor_cache(Some(&path));
                if store.with_state(|s| s.active_file_path() == Some(path.as_str())) {
                    store.set_active_nav_item(None);
                    store.reset_file_content();
                }
                report(error, store.list_dir(&id, "/").await);
            }
        });
    }

    /// Upload files picked in the browser; each entry is (path, bytes)
    pub fn upload(&self, id: String, files: Vec<(String, Vec<u8>)>, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            if report(error, store.save_files_binary(&id, files).await).is_some() {
                report(error, store.list_dir(&id, "/").await);
            }
        });
    }

    /// Download the whole tree as an archive
    pub fn export(&self, id: String, file_name: String, error: ErrorSignal) {
        let store = self.store();
        spawn_local(async move {
            if let Some(bytes) = report(error, store.export_files(&id).await) {
                if let Err(e) = crate::shared::browser_file::save_bytes(&bytes, &file_name) {
                    error.set(Some(e));
                }
            }
        });
    }
}
