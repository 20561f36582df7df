//! Virtual filesystem DTOs for file-backed resources (spiders, git repos)

use serde::{Deserialize, Serialize};

/// File tree node; `path` is the identity key
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileNavItem {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub path: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_dir: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default)]
    pub children: Vec<FileNavItem>,
}

impl FileNavItem {
    pub fn file(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path).to_string(),
            extension: extension(&path).map(str::to_string),
            path,
            ..Default::default()
        }
    }

    pub fn dir(path: impl Into<String>, children: Vec<FileNavItem>) -> Self {
        let path = path.into();
        Self {
            name: file_name(&path).to_string(),
            path,
            is_dir: true,
            children,
            ..Default::default()
        }
    }

    /// Depth-first lookup by path
    pub fn find<'a>(items: &'a [FileNavItem], path: &str) -> Option<&'a FileNavItem> {
        for item in items {
            if item.path == path {
                return Some(item);
            }
            if let Some(found) = Self::find(&item.children, path) {
                return Some(found);
            }
        }
        None
    }
}

/// Last path segment (`/sub/b.py` → `b.py`)
pub fn file_name(path: &str) -> &str {
    path.trim_end_matches('/').rsplit('/').next().unwrap_or(path)
}

pub fn extension(path: &str) -> Option<&str> {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some(ext),
        _ => None,
    }
}

/// Body of the text file endpoints (save, rename, copy, delete, mkdir)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRequest {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

impl FileRequest {
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    pub fn with_data(path: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            data: Some(data.into()),
            ..Default::default()
        }
    }

    pub fn with_new_path(path: impl Into<String>, new_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            new_path: Some(new_path.into()),
            ..Default::default()
        }
    }
}
