//! File tree + text editor over a [`FileHandle`]
//!
//! Used by every file-backed resource (spider code, git working tree). The
//! component owns no file state: everything lives in the store, the view only
//! reads `handle.files` and calls handle operations.

use crate::layout::global_context::AppGlobalContext;
use crate::shared::browser_file::read_file;
use crate::shared::components::ErrorBanner;
use crate::shared::date_utils::format_size;
use crate::shared::icons::icon;
use crate::shared::store::FileHandle;
use crate::shared::store::FileState;
use contracts::domain::common::Resource;
use contracts::shared::file::{file_name, FileNavItem};
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::collections::HashSet;
use thaw::*;
use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

#[component]
#[allow(non_snake_case)]
pub fn FileBrowser<T>(
    handle: FileHandle<T>,
    #[prop(into)] id: String,
    /// Key of the tab hosting the browser; drives the dirty marker and the leave guard
    #[prop(into)]
    tab_key: String,
) -> impl IntoView
where
    T: Resource + Send + Sync,
{
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let error = RwSignal::new(None::<String>);
    let expanded = RwSignal::new(HashSet::<String>::new());
    let id = StoredValue::new(id);
    let tab_key = StoredValue::new(tab_key);

    handle.load(id.get_value(), error);

    // "*" marker on the tab
    Effect::new(move |_| {
        let unsaved = handle.files.with(FileState::has_unsaved_changes);
        ctx.set_tab_dirty(&tab_key.get_value(), unsaved);
    });

    // Leaving the tab saves unsaved edits of the active file
    Effect::new(move |was_active: Option<bool>| {
        let is_active = ctx.active.get().as_deref() == Some(tab_key.get_value().as_str());
        if was_active == Some(true) && !is_active {
            handle.before_leave(id.get_value());
        }
        is_active
    });

    // Closing the tab disposes the browser without deactivating it first
    let leave_id = id.get_value();
    on_cleanup(move || handle.before_leave(leave_id));

    let active_path =
        Signal::derive(move || handle.files.with(|f| f.active_file_path().map(str::to_string)));
    let selected = Signal::derive(move || handle.files.with(|f| f.active_nav_item.clone()));

    let on_select = Callback::new(move |item: FileNavItem| {
        if item.is_dir {
            expanded.update(|set| {
                if !set.remove(&item.path) {
                    set.insert(item.path.clone());
                }
            });
            handle.store().set_active_nav_item(Some(item));
        } else {
            handle.open_file(id.get_value(), item.path, error);
        }
    });

    let save = move || handle.save_active(id.get_value(), error);

    let new_file = move |_| {
        let dir = target_dir(selected.get_untracked().as_ref());
        if let Some(name) = prompt("New file name", "") {
            handle.create_file(id.get_value(), join_path(&dir, &name), error);
        }
    };

    let new_dir = move |_| {
        let dir = target_dir(selected.get_untracked().as_ref());
        if let Some(name) = prompt("New folder name", "") {
            expanded.update(|set| {
                set.insert(dir.clone());
            });
            handle.create_dir(id.get_value(), join_path(&dir, &name), error);
        }
    };

    let rename = move |_| {
        let Some(item) = selected.get_untracked() else {
            return;
        };
        if let Some(name) = prompt("Rename to", file_name(&item.path)) {
            let new_path = join_path(&parent_dir(&item.path), &name);
            if new_path != item.path {
                handle.rename(id.get_value(), item.path, new_path, error);
            }
        }
    };

    let copy = move |_| {
        let Some(item) = selected.get_untracked() else {
            return;
        };
        if let Some(new_path) = prompt("Copy to", &item.path) {
            if new_path != item.path {
                handle.copy(id.get_value(), item.path, new_path, error);
            }
        }
    };

    let delete = move |_| {
        let Some(item) = selected.get_untracked() else {
            return;
        };
        if confirm(&format!("Delete {}?", item.path)) {
            handle.delete(id.get_value(), item.path, error);
        }
    };

    let export = move |_| {
        let name = handle
            .resource
            .state
            .with_untracked(|s| s.form.display_name().to_string());
        let name = if name.is_empty() { id.get_value() } else { name };
        handle.export(id.get_value(), format!("{}.zip", name), error);
    };

    let on_upload = move |ev: leptos::ev::Event| {
        let Some(input) = ev
            .target()
            .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        let Some(list) = input.files() else {
            return;
        };
        let picked: Vec<web_sys::File> = (0..list.length()).filter_map(|i| list.get(i)).collect();
        input.set_value("");
        if picked.is_empty() {
            return;
        }
        let dir = target_dir(selected.get_untracked().as_ref());
        spawn_local(async move {
            let mut files = Vec::with_capacity(picked.len());
            for file in picked {
                match read_file(&file).await {
                    Ok(bytes) => files.push((join_path(&dir, &file.name()), bytes)),
                    Err(e) => {
                        error.set(Some(e));
                        return;
                    }
                }
            }
            handle.upload(id.get_value(), files, error);
        });
    };

    view! {
        <div class="file-browser">
            <div class="file-browser__toolbar">
                <Button size=ButtonSize::Small on_click=new_file>
                    {icon("plus")}
                    " File"
                </Button>
                <Button size=ButtonSize::Small on_click=new_dir>
                    {icon("folder-closed")}
                    " Folder"
                </Button>
                <Button
                    size=ButtonSize::Small
                    on_click=rename
                    disabled=Signal::derive(move || selected.get().is_none())
                >
                    "Rename"
                </Button>
                <Button
                    size=ButtonSize::Small
                    on_click=copy
                    disabled=Signal::derive(move || selected.get().is_none())
                >
                    "Copy"
                </Button>
                <Button
                    size=ButtonSize::Small
                    on_click=delete
                    disabled=Signal::derive(move || selected.get().is_none())
                >
                    {icon("delete")}
                    " Delete"
                </Button>
                <label class="file-browser__upload">
                    {icon("upload")}
                    " Upload"
                    <input type="file" multiple=true on:change=on_upload />
                </label>
                <Button size=ButtonSize::Small on_click=export>
                    {icon("download")}
                    " Export"
                </Button>
                <Button
                    size=ButtonSize::Small
                    on_click=move |_| handle.refresh_tree(id.get_value(), error)
                >
                    {icon("refresh")}
                </Button>
            </div>

            <ErrorBanner error=error />

            <div class="file-browser__body">
                <div class="file-browser__tree">
                    {move || {
                        let items = handle.files.with(|f| f.file_nav_items.clone());
                        if items.is_empty() {
                            view! { <div class="file-browser__empty">"No files"</div> }.into_any()
                        } else {
                            tree_view(items, 0, expanded, handle.files, on_select)
                        }
                    }}
                </div>

                <div class="file-browser__editor">
                    <div class="file-browser__editor-header">
                        <span class="file-browser__path">
                            {move || active_path.get().unwrap_or_else(|| "No file selected".to_string())}
                        </span>
                        <Button
                            size=ButtonSize::Small
                            appearance=ButtonAppearance::Primary
                            on_click=move |_| save()
                            disabled=Signal::derive(move || active_path.get().is_none())
                        >
                            {icon("save")}
                            " Save"
                        </Button>
                    </div>
                    <textarea
                        class="file-browser__text"
                        spellcheck="false"
                        prop:value=move || handle.files.with(FileState::editor_content)
                        disabled=move || active_path.get().is_none()
                        on:input=move |ev| {
                            if let Some(path) = active_path.get_untracked() {
                                handle.store().set_editor_content(&path, event_target_value(&ev));
                            }
                        }
                        on:keydown=move |ev: leptos::ev::KeyboardEvent| {
                            if (ev.ctrl_key() || ev.meta_key()) && ev.key() == "s" {
                                ev.prevent_default();
                                save();
                            }
                        }
                    ></textarea>
                </div>
            </div>
        </div>
    }
}

fn tree_view(
    items: Vec<FileNavItem>,
    depth: usize,
    expanded: RwSignal<HashSet<String>>,
    files: RwSignal<FileState>,
    on_select: Callback<FileNavItem>,
) -> AnyView {
    items
        .into_iter()
        .map(|item| {
            let path = item.path.clone();
            let is_dir = item.is_dir;
            let children = item.children.clone();
            let label = if item.name.is_empty() {
                file_name(&item.path).to_string()
            } else {
                item.name.clone()
            };
            let size = item.size.map(format_size);

            let is_open = {
                let path = path.clone();
                move || expanded.with(|set| set.contains(&path))
            };
            let is_active = {
                let path = path.clone();
                move || files.with(|f| f.active_nav_item.as_ref().map(|a| a.path.as_str()) == Some(path.as_str()))
            };
            let is_dirty = {
                let path = path.clone();
                move || files.with(|f| f.is_dirty(&path))
            };
            let glyph = {
                let is_open = is_open.clone();
                move || match (is_dir, is_open()) {
                    (true, true) => icon("folder-open"),
                    (true, false) => icon("folder-closed"),
                    _ => icon("file"),
                }
            };

            view! {
                <div class="file-tree__node">
                    <div
                        class="file-tree__item"
                        class:file-tree__item--active=is_active
                        style=format!("padding-left: {}px", 8 + depth * 14)
                        on:click=move |_| on_select.run(item.clone())
                    >
                        {glyph}
                        <span class="file-tree__name">{label}</span>
                        <Show when=is_dirty>
                            <span class="file-tree__dirty">"●"</span>
                        </Show>
                        {size.map(|s| view! { <span class="file-tree__size">{s}</span> })}
                    </div>
                    {move || {
                        (is_dir && is_open())
                            .then(|| tree_view(children.clone(), depth + 1, expanded, files, on_select))
                    }}
                </div>
            }
        })
        .collect_view()
        .into_any()
}

/// Directory new entries go into: the selected folder, else the folder of the selected file
pub fn target_dir(selected: Option<&FileNavItem>) -> String {
    match selected {
        Some(item) if item.is_dir => item.path.clone(),
        Some(item) => parent_dir(&item.path),
        None => "/".to_string(),
    }
}

pub fn parent_dir(path: &str) -> String {
    match path.trim_end_matches('/').rsplit_once('/') {
        Some((parent, _)) if !parent.is_empty() => parent.to_string(),
        _ => "/".to_string(),
    }
}

pub fn join_path(dir: &str, name: &str) -> String {
    let name = name.trim().trim_start_matches('/');
    let dir = dir.trim_end_matches('/');
    format!("{}/{}", dir, name)
}

fn prompt(message: &str, default: &str) -> Option<String> {
    web_sys::window()?
        .prompt_with_message_and_default(message, default)
        .ok()
        .flatten()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_dir() {
        assert_eq!(target_dir(None), "/");
        assert_eq!(target_dir(Some(&FileNavItem::dir("/sub", Vec::new()))), "/sub");
        assert_eq!(target_dir(Some(&FileNavItem::file("/sub/b.py"))), "/sub");
        assert_eq!(target_dir(Some(&FileNavItem::file("/a.py"))), "/");
    }

    #[test]
    fn test_join_path() {
        assert_eq!(join_path("/", "a.py"), "/a.py");
        assert_eq!(join_path("/sub/", "b.py"), "/sub/b.py");
        assert_eq!(join_path("/sub", " /c.py "), "/sub/c.py");
    }

    #[test]
    fn test_parent_dir() {
        assert_eq!(parent_dir("/sub/deep/x.py"), "/sub/deep");
        assert_eq!(parent_dir("/x.py"), "/");
        assert_eq!(parent_dir("/sub/"), "/");
    }
}
