use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::{files_tab_key, files_tab_title};
use crate::shared::components::{ErrorBanner, PageHeader, PaginationControls, StatusBadge};
use crate::shared::date_utils::format_optional_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::store::ResourceHandle;
use contracts::domain::a004_git::aggregate::Git;
use contracts::domain::common::Resource;
use contracts::shared::filter::Pagination;
use leptos::prelude::*;
use thaw::*;

#[derive(Clone, Debug, PartialEq)]
pub struct GitRow {
    pub id: String,
    pub name: String,
    pub url: String,
    pub branch: String,
    pub status: String,
    pub error: String,
    pub updated: String,
}

impl From<&Git> for GitRow {
    fn from(g: &Git) -> Self {
        Self {
            id: g.id.clone().unwrap_or_default(),
            name: g.display_name().to_string(),
            url: g.url.clone(),
            branch: g.current_branch.clone(),
            status: g.status.clone(),
            error: g.error.clone(),
            updated: format_optional_datetime(g.metadata.last_modified()),
        }
    }
}

#[component]
#[allow(non_snake_case)]
pub fn GitList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let gits = ResourceHandle::<Git>::new(ctx.api_client());
    let error = RwSignal::new(None::<String>);
    let name_filter = RwSignal::new(String::new());

    gits.reload(error);

    let rows = Memo::new(move |_| {
        gits.state
            .with(|s| s.table_data.iter().map(GitRow::from).collect::<Vec<_>>())
    });
    let pagination = Signal::derive(move || gits.state.with(|s| s.table_pagination));
    let total = Signal::derive(move || gits.state.with(|s| s.table_total));

    let open_files = move |id: &str, name: &str| {
        ctx.open_tab(&files_tab_key::<Git>(id), &files_tab_title(name));
    };

    view! {
        <PageFrame page_id=format!("{}--list", Git::full_name()) category=PAGE_CAT_LIST>
            <PageHeader title=Git::list_name()>
                <Input
                    value=name_filter
                    placeholder="Filter by name"
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" {
                            gits.filter_contains("name", &name_filter.get_untracked(), error);
                        }
                    }
                />
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| gits.reload(error)
                >
                    {icon("refresh")}
                    " Refresh"
                </Button>
            </PageHeader>

            <div class="page__content">
                <ErrorBanner error=error />

                <Table attr:style="width: 100%;">
                    <TableHeader>
                        <TableRow>
                            <TableHeaderCell min_width=180.0>"Name"</TableHeaderCell>
                            <TableHeaderCell min_width=260.0>"URL"</TableHeaderCell>
                            <TableHeaderCell min_width=110.0>"Branch"</TableHeaderCell>
                            <TableHeaderCell min_width=100.0>"Status"</TableHeaderCell>
                            <TableHeaderCell min_width=150.0>"Updated"</TableHeaderCell>
                            <TableHeaderCell min_width=100.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || rows.get()
                            key=|row| row.id.clone()
                            children=move |row| {
                                let id = row.id.clone();
                                let name = row.name.clone();
                                let id_for_delete = row.id.clone();
                                let label = row.name.clone();
                                let url = row.url.clone();
                                let branch = row.branch.clone();
                                let status = row.status.clone();
                                let updated = row.updated.clone();
                                let error_text = row.error.clone();
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout>{label}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>{url}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{branch}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <span title=error_text>
                                                <StatusBadge status=status.clone() label=status />
                                            </span>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{updated}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <Button
                                                size=ButtonSize::Small
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| open_files(&id, &name)
                                            >
                                                {icon("folder-open")}
                                            </Button>
                                            <Button
                                                size=ButtonSize::Small
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| gits.delete_and_reload(id_for_delete.clone(), error)
                                            >
                                                {icon("delete")}
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
                    on_change=Callback::new(move |p: Pagination| gits.go_to_page(p, error))
                />
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_falls_back_to_url() {
        let git = Git {
            id: Some("g1".into()),
            url: "https://github.com/example/quotes.git".into(),
            current_branch: "main".into(),
            status: "ready".into(),
            ..Default::default()
        };

        let row = GitRow::from(&git);

        assert_eq!(row.name, "https://github.com/example/quotes.git");
        assert_eq!(row.branch, "main");
    }
}
