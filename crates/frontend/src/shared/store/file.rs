//! File-backed resource store
//!
//! Adds a remote virtual filesystem (spider code, git working trees) on top of
//! [`ResourceStore`]. Unsaved editor text lives in an in-memory cache keyed by
//! path; the cache always wins over the last fetched content for that path and
//! is only cleared explicitly (saving keeps it).

use super::resource::ResourceStore;
use super::sequence::RequestSequence;
use crate::shared::api_error::ApiResult;
use crate::shared::request::{segment, ApiClient};
use crate::shared::transport::FormPart;
use contracts::domain::common::Resource;
use contracts::shared::file::{file_name, FileNavItem, FileRequest};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileState {
    /// Whole tree from the last listing; replaced, never merged
    pub file_nav_items: Vec<FileNavItem>,
    pub active_nav_item: Option<FileNavItem>,
    /// Content of the last `get_file` (or save) of `file_content_path`
    pub file_content: String,
    pub file_content_path: Option<String>,
    /// path → unsaved editor text
    pub editor_file_content_cache: HashMap<String, String>,
}

impl FileState {
    pub fn active_file_path(&self) -> Option<&str> {
        self.active_nav_item
            .as_ref()
            .filter(|item| !item.is_dir)
            .map(|item| item.path.as_str())
    }

    /// Server copy of the active file, once it has been fetched
    pub fn loaded_content(&self) -> Option<&str> {
        let active = self.active_file_path()?;
        (self.file_content_path.as_deref() == Some(active)).then_some(self.file_content.as_str())
    }

    /// Text shown in the editor: cached edit first, fetched content of the same path otherwise
    pub fn editor_content(&self) -> String {
        self.active_file_path()
            .and_then(|path| self.editor_file_content_cache.get(path))
            .map(String::as_str)
            .or_else(|| self.loaded_content())
            .unwrap_or_default()
            .to_string()
    }

    /// (path, text) of the active file, or `None` while there is nothing of its own to save
    pub fn savable_content(&self) -> Option<(String, String)> {
        let path = self.active_file_path()?;
        let content = self
            .editor_file_content_cache
            .get(path)
            .map(String::as_str)
            .or_else(|| self.loaded_content())?;
        Some((path.to_string(), content.to_string()))
    }

    pub fn is_dirty(&self, path: &str) -> bool {
        self.editor_file_content_cache.contains_key(path)
    }

    /// Active file has an edit that differs from the server copy
    pub fn has_unsaved_changes(&self) -> bool {
        self.active_file_path()
            .and_then(|path| self.editor_file_content_cache.get(path))
            .is_some_and(|cached| self.loaded_content() != Some(cached.as_str()))
    }
}

type FileListener = Rc<dyn Fn(&FileState)>;

#[derive(Clone)]
pub struct FileStore<T: Resource> {
    resource: ResourceStore<T>,
    client: ApiClient,
    files: Rc<RefCell<FileState>>,
    listeners: Rc<RefCell<Vec<FileListener>>>,
    content_seq: Rc<RequestSequence>,
}

impl<T: Resource> FileStore<T> {
    pub fn new(resource: ResourceStore<T>) -> Self {
        let client = resource.client().clone();
        Self {
            resource,
            client,
            files: Rc::new(RefCell::new(FileState::default())),
            listeners: Rc::new(RefCell::new(Vec::new())),
            content_seq: Rc::new(RequestSequence::new()),
        }
    }

    /// The underlying list/detail store
    pub fn resource(&self) -> &ResourceStore<T> {
        &self.resource
    }

    fn files_path(&self, id: &str, action: &str) -> String {
        format!("{}/{}/files/{}", self.resource.endpoint(), segment(id), action)
    }

    fn path_query(path: &str) -> Vec<(String, String)> {
        vec![("path".to_string(), path.to_string())]
    }

    // ========================================================================
    // State access
    // ========================================================================

    pub fn snapshot(&self) -> FileState {
        self.files.borrow().clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&FileState) -> R) -> R {
        f(&self.files.borrow())
    }

    pub fn subscribe(&self, listener: impl Fn(&FileState) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn mutate(&self, f: impl FnOnce(&mut FileState)) {
        f(&mut self.files.borrow_mut());
        let listeners = self.listeners.borrow().clone();
        let state = self.files.borrow();
        for listener in listeners {
            listener(&state);
        }
    }

    pub fn editor_content(&self) -> String {
        self.with_state(FileState::editor_content)
    }

    pub fn set_active_nav_item(&self, item: Option<FileNavItem>) {
        self.mutate(|s| s.active_nav_item = item);
    }

    /// Activate the tree entry at `path`; an unknown path clears the selection
    pub fn set_active_file(&self, path: &str) {
        let item = self.with_state(|s| FileNavItem::find(&s.file_nav_items, path).cloned());
        self.set_active_nav_item(item);
    }

    /// Record an unsaved edit for `path`
    pub fn set_editor_content(&self, path: &str, content: String) {
        self.mutate(|s| {
            s.editor_file_content_cache.insert(path.to_string(), content);
        });
    }

    /// Drop the cached edit for `path`, or the whole cache
    pub fn reset_editor_cache(&self, path: Option<&str>) {
        self.mutate(|s| match path {
            Some(path) => {
                s.editor_file_content_cache.remove(path);
            }
            None => s.editor_file_content_cache.clear(),
        });
    }

    pub fn reset_file_content(&self) {
        self.mutate(|s| {
            s.file_content.clear();
            s.file_content_path = None;
        });
    }

    // ========================================================================
    // Remote operations
    // ========================================================================

    pub async fn list_dir(&self, id: &str, path: &str) -> ApiResult<Vec<FileNavItem>> {
        let items: Option<Vec<FileNavItem>> = self
            .client
            .get(&self.files_path(id, "list"), Self::path_query(path))
            .await?;
        let items = items.unwrap_or_default();
        let applied = items.clone();
        self.mutate(|s| s.file_nav_items = applied);
        Ok(items)
    }

    pub async fn get_file(&self, id: &str, path: &str) -> ApiResult<String> {
        let ticket = self.content_seq.begin();
        let content: Option<String> = self
            .client
            .get(&self.files_path(id, "get"), Self::path_query(path))
            .await?;
        let content = content.unwrap_or_default();
        if self.content_seq.try_apply(ticket) {
            let applied = content.clone();
            self.mutate(|s| {
                s.file_content = applied;
                s.file_content_path = Some(path.to_string());
            });
        }
        Ok(content)
    }

    pub async fn get_file_info(&self, id: &str, path: &str) -> ApiResult<FileNavItem> {
        self.client
            .get(&self.files_path(id, "info"), Self::path_query(path))
            .await
    }

    pub async fn save_file(&self, id: &str, path: &str, data: &str) -> ApiResult<()> {
        self.client
            .post::<_, ()>(&self.files_path(id, "save"), &FileRequest::with_data(path, data))
            .await?;
        // the server copy of the active file now matches what was sent
        if self.with_state(|s| s.active_file_path() == Some(path)) {
            let saved = data.to_string();
            self.mutate(|s| {
                s.file_content = saved;
                s.file_content_path = Some(path.to_string());
            });
        }
        Ok(())
    }

    /// Upload raw bytes to `path` as multipart form data
    pub async fn save_file_binary(&self, id: &str, path: &str, bytes: Vec<u8>) -> ApiResult<()> {
        let parts = vec![
            FormPart::text("path", path),
            FormPart::file("file", file_name(path), bytes),
        ];
        self.client
            .post_multipart(&self.files_path(id, "save"), parts)
            .await
    }

    /// Upload several files in one multipart request; each is keyed by its target path
    pub async fn save_files_binary(&self, id: &str, files: Vec<(String, Vec<u8>)>) -> ApiResult<()> {
        let parts = files
            .into_iter()
            .map(|(path, bytes)| {
                let name = file_name(&path).to_string();
                FormPart::file(path, name, bytes)
            })
            .collect();
        self.client
            .post_multipart(&self.files_path(id, "save/batch"), parts)
            .await
    }

    pub async fn save_dir(&self, id: &str, path: &str) -> ApiResult<()> {
        self.client
            .post(&self.files_path(id, "save/dir"), &FileRequest::path(path))
            .await
    }

    pub async fn rename_file(&self, id: &str, path: &str, new_path: &str) -> ApiResult<()> {
        self.client
            .post(
                &self.files_path(id, "rename"),
                &FileRequest::with_new_path(path, new_path),
            )
            .await
    }

    pub async fn copy_file(&self, id: &str, path: &str, new_path: &str) -> ApiResult<()> {
        self.client
            .post(
                &self.files_path(id, "copy"),
                &FileRequest::with_new_path(path, new_path),
            )
            .await
    }

    pub async fn delete_file(&self, id: &str, path: &str) -> ApiResult<()> {
        let body = serde_json::to_value(FileRequest::path(path))
            .map_err(crate::shared::api_error::ApiError::decode)?;
        self.client
            .delete(&self.files_path(id, "delete"), Some(body))
            .await
    }

    /// Archive of the whole file tree
    pub async fn export_files(&self, id: &str) -> ApiResult<Vec<u8>> {
        self.client
            .get_bytes(&self.files_path(id, "export"), Vec::new())
            .await
    }

    /// Save the editor text of the active file; a no-op while it has nothing loaded or edited
    pub async fn save_active_file(&self, id: &str) -> ApiResult<()> {
        let Some((path, content)) = self.with_state(FileState::savable_content) else {
            return Ok(());
        };
        self.save_file(id, &path, &content).await
    }

    /// Save unsaved edits of the active file before navigating away; failures are only logged
    pub async fn before_leave(&self, id: &str) {
        let Some((path, content)) = self.with_state(|s| {
            s.has_unsaved_changes()
                .then(|| s.savable_content())
                .flatten()
        }) else {
            return;
        };

        match self.save_file(id, &path, &content).await {
            Ok(()) => log::debug!("saved {} before leaving {}", path, id),
            Err(e) => log::warn!("failed to save {} before leaving {}: {}", path, id, e),
        }
    }
}
