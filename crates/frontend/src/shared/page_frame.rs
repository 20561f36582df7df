//! PageFrame: root wrapper for every page rendered inside a tab.
//!
//! Sets `id` = `"{entity}--{category}"` (e.g. `"a001_spider--list"`) and
//! `data-page-category` on the root element, so a page found in the DOM
//! inspector maps straight to its `domain/` module.

use leptos::prelude::*;

/// Table with filters and pagination
pub const PAGE_CAT_LIST: &str = "list";
/// File tree plus editor of one record
pub const PAGE_CAT_FILES: &str = "files";
/// Free-form page
pub const PAGE_CAT_CUSTOM: &str = "custom";

#[component]
pub fn PageFrame(
    /// `{entity}--{category}`; dynamic for pages opened per record
    #[prop(into)]
    page_id: String,
    category: &'static str,
    #[prop(optional)] class: &'static str,
    children: Children,
) -> impl IntoView {
    let base_class = match category {
        PAGE_CAT_FILES => "page page--files",
        PAGE_CAT_CUSTOM => "page page--custom",
        _ => "page",
    };
    let full_class = if class.is_empty() {
        base_class.to_string()
    } else {
        format!("{base_class} {class}")
    };

    view! {
        <div id=page_id class=full_class data-page-category=category>
            {children()}
        </div>
    }
}

/// Validate the `{entity}--{category}` page id format
pub fn is_valid_page_id(id: &str) -> bool {
    matches!(id.split_once("--"), Some((entity, cat)) if !entity.is_empty() && !cat.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_id_format() {
        assert!(is_valid_page_id("a001_spider--list"));
        assert!(is_valid_page_id("a004_git--files"));
        assert!(!is_valid_page_id("a001_spider"));
        assert!(!is_valid_page_id("--list"));
    }
}
