use crate::shared::icons::icon;
use contracts::shared::filter::Pagination;
use leptos::prelude::*;

pub const PAGE_SIZE_OPTIONS: [u32; 4] = [10, 20, 50, 100];

/// Pager for server-side pagination (pages are 1-based)
#[component]
pub fn PaginationControls(
    #[prop(into)] pagination: Signal<Pagination>,
    #[prop(into)] total: Signal<u64>,
    on_change: Callback<Pagination>,
) -> impl IntoView {
    let total_pages = move || {
        let size = u64::from(pagination.get().size.max(1));
        total.get().div_ceil(size).max(1) as u32
    };
    let page = move || pagination.get().page;
    let go_to = move |p: u32| {
        let current = pagination.get_untracked();
        on_change.run(Pagination {
            page: p.max(1),
            size: current.size,
        });
    };

    view! {
        <div class="pagination-controls">
            <button
                class="pagination-btn"
                on:click=move |_| go_to(1)
                disabled=move || page() <= 1
                title="First page"
            >
                {icon("chevrons-left")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go_to(page().saturating_sub(1))
                disabled=move || page() <= 1
                title="Previous page"
            >
                {icon("chevron-left")}
            </button>
            <span class="pagination-info">
                {move || format!("{} / {} ({})", page(), total_pages(), total.get())}
            </span>
            <button
                class="pagination-btn"
                on:click=move |_| go_to(page() + 1)
                disabled=move || page() >= total_pages()
                title="Next page"
            >
                {icon("chevron-right")}
            </button>
            <button
                class="pagination-btn"
                on:click=move |_| go_to(total_pages())
                disabled=move || page() >= total_pages()
                title="Last page"
            >
                {icon("chevrons-right")}
            </button>
            <select
                class="page-size-select"
                on:change=move |ev| {
                    let size = event_target_value(&ev)
                        .parse()
                        .unwrap_or(contracts::shared::filter::DEFAULT_PAGE_SIZE);
                    // changing the page size always goes back to the first page
                    on_change.run(Pagination { page: 1, size });
                }
                prop:value=move || pagination.get().size.to_string()
            >
                {PAGE_SIZE_OPTIONS.iter().map(|&size| {
                    view! {
                        <option value=size.to_string() selected=move || pagination.get().size == size>
                            {size.to_string()}
                        </option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}
