use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::{files_tab_key, files_tab_title};
use crate::shared::components::{ErrorBanner, PageHeader, PaginationControls};
use crate::shared::date_utils::format_optional_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::store::ResourceHandle;
use contracts::domain::a001_spider::aggregate::Spider;
use contracts::domain::common::Resource;
use contracts::shared::filter::Pagination;
use leptos::prelude::*;
use std::collections::HashSet;
use thaw::*;

#[derive(Clone, Debug, PartialEq)]
pub struct SpiderRow {
    pub id: String,
    pub name: String,
    pub cmd: String,
    pub mode: String,
    pub priority: i32,
    pub updated: String,
}

impl From<&Spider> for SpiderRow {
    fn from(s: &Spider) -> Self {
        Self {
            id: s.id.clone().unwrap_or_default(),
            name: s.name.clone(),
            cmd: s.cmd.clone(),
            mode: s.mode.label().to_string(),
            priority: s.priority,
            updated: format_optional_datetime(s.metadata.last_modified()),
        }
    }
}

#[component]
#[allow(non_snake_case)]
pub fn SpiderList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let spiders = ResourceHandle::<Spider>::new(ctx.api_client());
    let error = RwSignal::new(None::<String>);
    let name_filter = RwSignal::new(String::new());
    let selected = RwSignal::new(HashSet::<String>::new());

    spiders.reload(error);

    let rows = Memo::new(move |_| {
        spiders
            .state
            .with(|s| s.table_data.iter().map(SpiderRow::from).collect::<Vec<_>>())
    });
    let pagination = Signal::derive(move || spiders.state.with(|s| s.table_pagination));
    let total = Signal::derive(move || spiders.state.with(|s| s.table_total));

    let open_files = move |row: &SpiderRow| {
        ctx.open_tab(
            &files_tab_key::<Spider>(&row.id),
            &files_tab_title(&row.name),
        );
    };

    let delete_selected = move || {
        let ids: Vec<String> = selected.get_untracked().into_iter().collect();
        if ids.is_empty() {
            return;
        }
        let confirmed = web_sys::window()
            .and_then(|w| {
                w.confirm_with_message(&format!("Delete {} spider(s)?", ids.len()))
                    .ok()
            })
            .unwrap_or(false);
        if confirmed {
            spiders.delete_many_and_reload(ids, error);
            selected.set(HashSet::new());
        }
    };

    view! {
        <PageFrame page_id=format!("{}--list", Spider::full_name()) category=PAGE_CAT_LIST>
            <PageHeader title=Spider::list_name()>
                <Input
                    value=name_filter
                    placeholder="Filter by name"
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            spiders.filter_contains("name", &name_filter.get_untracked(), error);
                        }
                    }
                />
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| spiders.reload(error)
                >
                    {icon("refresh")}
                    " Refresh"
                </Button>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| delete_selected()
                    disabled=Signal::derive(move || selected.get().is_empty())
                >
                    {icon("delete")}
                    {move || format!(" Delete ({})", selected.get().len())}
                </Button>
            </PageHeader>

            <div class="page__content">
                <ErrorBanner error=error />

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell min_width=40.0>""</TableHeaderCell>
                            <TableHeaderCell min_width=180.0>"Name"</TableHeaderCell>
                            <TableHeaderCell min_width=220.0>"Command"</TableHeaderCell>
                            <TableHeaderCell min_width=120.0>"Mode"</TableHeaderCell>
                            <TableHeaderCell min_width=80.0>"Priority"</TableHeaderCell>
                            <TableHeaderCell min_width=150.0>"Updated"</TableHeaderCell>
                            <TableHeaderCell min_width=80.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || rows.get()
                            key=|row| row.id.clone()
                            children=move |row| {
                                let id = row.id.clone();
                                let id_for_check = row.id.clone();
                                let row_for_open = row.clone();
                                let row_for_button = row.clone();
                                let name = row.name.clone();
                                let cmd = row.cmd.clone();
                                let mode = row.mode.clone();
                                let priority = row.priority;
                                let updated = row.updated.clone();
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <input
                                                type="checkbox"
                                                prop:checked=move || selected.with(|s| s.contains(&id))
                                                on:change=move |ev| {
                                                    let checked = event_target_checked(&ev);
                                                    selected.update(|s| {
                                                        if checked {
                                                            s.insert(id_for_check.clone());
                                                        } else {
                                                            s.remove(&id_for_check);
                                                        }
                                                    });
                                                }
                                            />
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>
                                                <a
                                                    href="#"
                                                    class="table__link"
                                                    on:click=move |ev| {
                                                        ev.prevent_default();
                                                        open_files(&row_for_open);
                                                    }
                                                >
                                                    {name}
                                                </a>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <code>{cmd}</code>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{mode}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{priority}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{updated}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <Button
                                                size=ButtonSize::Small
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| open_files(&row_for_button)
                                            >
                                                {icon("folder-open")}
                                            </Button>
                                        </TableCell>
                                    </TableRow>
                                }
                            }
                        />
                    </TableBody>
                </Table>

                <PaginationControls
                    pagination=pagination
                    total=total
                    on_change=Callback::new(move |p: Pagination| spiders.go_to_page(p, error))
                />
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::domain::a001_spider::aggregate::RunMode;

    #[test]
    fn test_row_from_spider() {
        let spider = Spider {
            id: Some("65f0c1".into()),
            name: "quotes".into(),
            cmd: "scrapy crawl quotes".into(),
            mode: RunMode::AllNodes,
            priority: 5,
            ..Default::default()
        };

        let row = SpiderRow::from(&spider);

        assert_eq!(row.id, "65f0c1");
        assert_eq!(row.mode, "All nodes");
        assert_eq!(row.priority, 5);
        assert!(row.updated.is_empty());
    }
}
