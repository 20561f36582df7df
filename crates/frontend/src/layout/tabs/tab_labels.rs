//! Tab labels and keys - the single source of tab titles.

use contracts::domain::a001_spider::aggregate::Spider;
use contracts::domain::a002_task::aggregate::Task;
use contracts::domain::a003_node::aggregate::Node;
use contracts::domain::a004_git::aggregate::Git;
use contracts::domain::common::Resource;

const FILES_SEGMENT: &str = "_files_";

/// Key of the file browser tab of one record, e.g. "a001_spider_files_65f1"
pub fn files_tab_key<T: Resource>(id: &str) -> String {
    format!("{}{}{}", T::full_name(), FILES_SEGMENT, id)
}

/// Split a file tab key into (resource full name, record id)
pub fn parse_files_tab_key(key: &str) -> Option<(&str, &str)> {
    let (resource, id) = key.split_once(FILES_SEGMENT)?;
    (!resource.is_empty() && !id.is_empty()).then_some((resource, id))
}

pub fn files_tab_title(display_name: &str) -> String {
    format!("{}: files", display_name)
}

/// Readable title of the tab with the given key.
///
/// Fallback: the key itself.
pub fn tab_label_for_key(key: &str) -> String {
    if let Some((resource, id)) = parse_files_tab_key(key) {
        return files_tab_title(&format!("{} {}", element_name(resource), id));
    }
    match key {
        k if k == Spider::full_name() => Spider::list_name().to_string(),
        k if k == Task::full_name() => Task::list_name().to_string(),
        k if k == Node::full_name() => Node::list_name().to_string(),
        k if k == Git::full_name() => Git::list_name().to_string(),
        _ => key.to_string(),
    }
}

fn element_name(full_name: &str) -> &'static str {
    match full_name {
        n if n == Spider::full_name() => Spider::element_name(),
        n if n == Git::full_name() => Git::element_name(),
        _ => "Record",
    }
}
