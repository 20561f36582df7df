use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::{ErrorBanner, PageHeader, PaginationControls, StatusBadge};
use crate::shared::date_utils::format_optional_datetime;
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::store::ResourceHandle;
use contracts::domain::a002_task::aggregate::{Task, TaskStatus};
use contracts::domain::common::Resource;
use contracts::shared::filter::{Pagination, Sort};
use leptos::prelude::*;
use thaw::*;

const STATUS_FILTER: [TaskStatus; 7] = [
    TaskStatus::Pending,
    TaskStatus::Assigned,
    TaskStatus::Running,
    TaskStatus::Finished,
    TaskStatus::Error,
    TaskStatus::Cancelled,
    TaskStatus::Abnormal,
];

#[derive(Clone, Debug, PartialEq)]
pub struct TaskRow {
    pub id: String,
    pub status: String,
    pub status_label: &'static str,
    pub spider_id: String,
    pub node_id: String,
    pub cmd: String,
    pub created: String,
}

impl From<&Task> for TaskRow {
    fn from(t: &Task) -> Self {
        Self {
            id: t.id.clone().unwrap_or_default(),
            status: t.status.label().to_lowercase(),
            status_label: t.status.label(),
            spider_id: t.spider_id.clone(),
            node_id: t.node_id.clone().unwrap_or_else(|| "-".to_string()),
            cmd: if t.param.is_empty() {
                t.cmd.clone()
            } else {
                format!("{} {}", t.cmd, t.param)
            },
            created: format_optional_datetime(t.metadata.created_ts),
        }
    }
}

#[component]
#[allow(non_snake_case)]
pub fn TaskList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let tasks = ResourceHandle::<Task>::new(ctx.api_client());
    let error = RwSignal::new(None::<String>);

    // Newest tasks first
    tasks.store().set_table_list_sort(vec![Sort::desc("_id")]);
    tasks.reload(error);

    let rows = Memo::new(move |_| {
        tasks
            .state
            .with(|s| s.table_data.iter().map(TaskRow::from).collect::<Vec<_>>())
    });
    let pagination = Signal::derive(move || tasks.state.with(|s| s.table_pagination));
    let total = Signal::derive(move || tasks.state.with(|s| s.table_total));

    view! {
        <PageFrame page_id=format!("{}--list", Task::full_name()) category=PAGE_CAT_LIST>
            <PageHeader title=Task::list_name()>
                <select
                    class="filter-select"
                    on:change=move |ev| {
                        let value = event_target_value(&ev);
                        let value = (!value.is_empty()).then_some(value);
                        tasks.filter_equals("status", value, error);
                    }
                >
                    <option value="">"All statuses"</option>
                    {STATUS_FILTER.iter().map(|status| {
                        view! {
                            <option value=status.label().to_lowercase()>{status.label()}</option>
                        }
                    }).collect_view()}
                </select>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| tasks.reload(error)
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
                            <TableHeaderCell min_width=110.0>"Status"</TableHeaderCell>
                            <TableHeaderCell min_width=160.0>"Spider"</TableHeaderCell>
                            <TableHeaderCell min_width=160.0>"Node"</TableHeaderCell>
                            <TableHeaderCell min_width=240.0>"Command"</TableHeaderCell>
                            <TableHeaderCell min_width=150.0>"Created"</TableHeaderCell>
                            <TableHeaderCell min_width=60.0>""</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || rows.get()
                            key=|row| row.id.clone()
                            children=move |row| {
                                let id = row.id.clone();
                                let status = row.status.clone();
                                let status_label = row.status_label;
                                let spider_id = row.spider_id.clone();
                                let node_id = row.node_id.clone();
                                let cmd = row.cmd.clone();
                                let created = row.created.clone();
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <StatusBadge status=status label=status_label />
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{spider_id}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{node_id}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout truncate=true>
                                                <code>{cmd}</code>
                                            </TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{created}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <Button
                                                size=ButtonSize::Small
                                                appearance=ButtonAppearance::Subtle
                                                on_click=move |_| tasks.delete_and_reload(id.clone(), error)
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
                    on_change=Callback::new(move |p: Pagination| tasks.go_to_page(p, error))
                />
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_joins_cmd_and_param() {
        let task = Task {
            id: Some("t1".into()),
            spider_id: "s1".into(),
            status: TaskStatus::Running,
            cmd: "scrapy crawl quotes".into(),
            param: "-a page=2".into(),
            ..Default::default()
        };

        let row = TaskRow::from(&task);

        assert_eq!(row.status, "running");
        assert_eq!(row.cmd, "scrapy crawl quotes -a page=2");
        assert_eq!(row.node_id, "-");
    }
}
