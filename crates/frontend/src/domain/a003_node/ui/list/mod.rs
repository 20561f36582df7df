use crate::layout::global_context::AppGlobalContext;
use crate::shared::components::{ErrorBanner, PageHeader, PaginationControls, StatusBadge};
use crate::shared::icons::icon;
use crate::shared::page_frame::{PageFrame, PAGE_CAT_LIST};
use crate::shared::store::ResourceHandle;
use contracts::domain::a003_node::aggregate::{Node, NodeStatus};
use contracts::domain::common::Resource;
use contracts::shared::filter::Pagination;
use leptos::prelude::*;
use serde_json::json;
use thaw::*;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeRow {
    pub id: String,
    pub name: String,
    pub role: &'static str,
    pub ip: String,
    pub status: &'static str,
    pub enabled: bool,
    pub max_runners: u32,
}

impl From<&Node> for NodeRow {
    fn from(n: &Node) -> Self {
        Self {
            id: n.id.clone().unwrap_or_default(),
            name: n.name.clone(),
            role: if n.is_master { "master" } else { "worker" },
            ip: n.ip.clone(),
            status: match n.status {
                NodeStatus::Online => "online",
                NodeStatus::Offline => "offline",
            },
            enabled: n.enabled,
            max_runners: n.max_runners,
        }
    }
}

#[component]
#[allow(non_snake_case)]
pub fn NodeList() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let nodes = ResourceHandle::<Node>::new(ctx.api_client());
    let error = RwSignal::new(None::<String>);

    nodes.reload(error);

    let rows = Memo::new(move |_| {
        nodes
            .state
            .with(|s| s.table_data.iter().map(NodeRow::from).collect::<Vec<_>>())
    });
    let pagination = Signal::derive(move || nodes.state.with(|s| s.table_pagination));
    let total = Signal::derive(move || nodes.state.with(|s| s.table_total));

    // Node enable toggle goes through the batch update
    let set_enabled = move |id: String, enabled: bool| {
        let store = nodes.store();
        leptos::task::spawn_local(async move {
            let result = store
                .update_list(vec![id], &json!({ "enabled": enabled }), vec!["enabled".to_string()])
                .await;
            match result {
                Ok(()) => nodes.reload(error),
                Err(e) => error.set(Some(e.to_string())),
            }
        });
    };

    view! {
        <PageFrame page_id=format!("{}--list", Node::full_name()) category=PAGE_CAT_LIST>
            <PageHeader title=Node::list_name()>
                <Button
                    appearance=ButtonAppearance::Secondary
                    on_click=move |_| nodes.reload(error)
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
                            <TableHeaderCell min_width=90.0>"Role"</TableHeaderCell>
                            <TableHeaderCell min_width=130.0>"IP"</TableHeaderCell>
                            <TableHeaderCell min_width=100.0>"Status"</TableHeaderCell>
                            <TableHeaderCell min_width=90.0>"Enabled"</TableHeaderCell>
                            <TableHeaderCell min_width=100.0>"Max runners"</TableHeaderCell>
                        </TableRow>
                    </TableHeader>
                    <TableBody>
                        <For
                            each=move || rows.get()
                            key=|row| (row.id.clone(), row.enabled)
                            children=move |row| {
                                let id = row.id.clone();
                                let enabled = row.enabled;
                                let name = row.name.clone();
                                let role = row.role;
                                let ip = row.ip.clone();
                                let status = row.status;
                                let max_runners = row.max_runners;
                                view! {
                                    <TableRow>
                                        <TableCell>
                                            <TableCellLayout>{name}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{role}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{ip}</TableCellLayout>
                                        </TableCell>
                                        <TableCell>
                                            <StatusBadge status=status label=status />
                                        </TableCell>
                                        <TableCell>
                                            <input
                                                type="checkbox"
                                                prop:checked=enabled
                                                on:change=move |ev| set_enabled(id.clone(), event_target_checked(&ev))
                                            />
                                        </TableCell>
                                        <TableCell>
                                            <TableCellLayout>{max_runners}</TableCellLayout>
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
                    on_change=Callback::new(move |p: Pagination| nodes.go_to_page(p, error))
                />
            </div>
        </PageFrame>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_from_node() {
        let node = Node {
            id: Some("n1".into()),
            name: "master".into(),
            is_master: true,
            status: NodeStatus::Online,
            enabled: true,
            max_runners: 8,
            ..Default::default()
        };

        let row = NodeRow::from(&node);

        assert_eq!(row.role, "master");
        assert_eq!(row.status, "online");
        assert_eq!(row.max_runners, 8);
    }
}
