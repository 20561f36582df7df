//! Tab content registry - the single mapping from tab.key to View

use super::tab_labels::parse_files_tab_key;
use crate::domain::a001_spider::ui::{SpiderFiles, SpiderList};
use crate::domain::a002_task::ui::TaskList;
use crate::domain::a003_node::ui::NodeList;
use crate::domain::a004_git::ui::{GitFiles, GitList};
use crate::layout::global_context::AppGlobalContext;
use contracts::domain::a001_spider::aggregate::Spider;
use contracts::domain::a002_task::aggregate::Task;
use contracts::domain::a003_node::aggregate::Node;
use contracts::domain::a004_git::aggregate::Git;
use contracts::domain::common::Resource;
use leptos::logging::log;
use leptos::prelude::*;

/// Render the content of a tab by its key.
///
/// Unknown keys (e.g. a stale tab restored from storage) get a placeholder.
pub fn render_tab_content(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    if let Some((resource, id)) = parse_files_tab_key(key) {
        let id = id.to_string();
        let tab_key = key.to_string();
        return match resource {
            r if r == Spider::full_name() => {
                view! { <SpiderFiles id=id tab_key=tab_key /> }.into_any()
            }
            r if r == Git::full_name() => {
                view! { <GitFiles id=id tab_key=tab_key /> }.into_any()
            }
            _ => unknown_tab(key, tabs_store),
        };
    }

    match key {
        k if k == Spider::full_name() => view! { <SpiderList /> }.into_any(),
        k if k == Task::full_name() => view! { <TaskList /> }.into_any(),
        k if k == Node::full_name() => view! { <NodeList /> }.into_any(),
        k if k == Git::full_name() => view! { <GitList /> }.into_any(),
        _ => unknown_tab(key, tabs_store),
    }
}

fn unknown_tab(key: &str, tabs_store: AppGlobalContext) -> AnyView {
    log!("Unknown tab type: {}", key);
    let key_for_close = key.to_string();
    view! {
        <div class="placeholder">
            <span>{format!("Unknown page: {}", key)}</span>
            <button
                class="placeholder__close"
                on:click=move |_| tabs_store.close_tab(&key_for_close)
            >
                "Close"
            </button>
        </div>
    }
    .into_any()
}
