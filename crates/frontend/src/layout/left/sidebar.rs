//! Sidebar: navigation groups, each item opens (or activates) a tab

use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::tab_label_for_key;
use crate::shared::icons::icon;
use contracts::domain::a001_spider::aggregate::Spider;
use contracts::domain::a002_task::aggregate::Task;
use contracts::domain::a003_node::aggregate::Node;
use contracts::domain::a004_git::aggregate::Git;
use contracts::domain::common::Resource;
use leptos::prelude::*;

#[derive(Clone, Debug, PartialEq)]
struct MenuGroup {
    id: &'static str,
    label: &'static str,
    icon: &'static str,
    items: Vec<(String, &'static str)>, // (tab key, icon)
}

fn get_menu_groups() -> Vec<MenuGroup> {
    vec![
        MenuGroup {
            id: "crawling",
            label: "Crawling",
            icon: "spider",
            items: vec![(Spider::full_name(), "spider"), (Task::full_name(), "task")],
        },
        MenuGroup {
            id: "cluster",
            label: "Cluster",
            icon: "node",
            items: vec![(Node::full_name(), "node")],
        },
        MenuGroup {
            id: "sources",
            label: "Sources",
            icon: "git",
            items: vec![(Git::full_name(), "git")],
        },
    ]
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let groups = get_menu_groups();
    let expanded_groups = RwSignal::new(groups.iter().map(|g| g.id).collect::<Vec<_>>());

    view! {
        <div class="app-sidebar__content">
            {groups.into_iter().map(|group| {
                let group_id = group.id;
                view! {
                    <div>
                        <div
                            class="app-sidebar__item"
                            style:padding-left="12px"
                            on:click=move |_| {
                                expanded_groups.update(|items| {
                                    if let Some(pos) = items.iter().position(|x| *x == group_id) {
                                        items.remove(pos);
                                    } else {
                                        items.push(group_id);
                                    }
                                });
                            }
                        >
                            <div class="app-sidebar__item-content">
                                {icon(group.icon)}
                                <span>{group.label}</span>
                            </div>
                            <div
                                class="app-sidebar__chevron"
                                class:app-sidebar__chevron--expanded=move || expanded_groups.with(|g| g.contains(&group_id))
                            >
                                {icon("chevron-right")}
                            </div>
                        </div>

                        <Show when=move || expanded_groups.with(|g| g.contains(&group_id))>
                            <div class="app-sidebar__children">
                                {group.items.iter().cloned().map(|(key, icon_name)| {
                                    let key = StoredValue::new(key);
                                    let label = tab_label_for_key(&key.get_value());
                                    let label_for_click = label.clone();
                                    view! {
                                        <div
                                            class="app-sidebar__item"
                                            class:app-sidebar__item--active=move || {
                                                let k = key.get_value();
                                                ctx.active.with(|a| a.as_deref() == Some(k.as_str()))
                                            }
                                            style:padding-left="10px"
                                            on:click=move |_| ctx.open_tab(&key.get_value(), &label_for_click)
                                        >
                                            <div class="app-sidebar__item-content">
                                                {icon(icon_name)}
                                                <span>{label}</span>
                                            </div>
                                        </div>
                                    }
                                }).collect_view()}
                            </div>
                        </Show>
                    </div>
                }
            }).collect_view()}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_menu_item_has_a_label() {
        for group in get_menu_groups() {
            for (key, _) in group.items {
                assert_ne!(tab_label_for_key(&key), key);
            }
        }
    }
}
