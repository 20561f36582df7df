use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::files_tab_title;
use crate::shared::components::{FileBrowser, PageHeader, StatusBadge};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_FILES};
use crate::shared::store::FileHandle;
use contracts::domain::a004_git::aggregate::Git;
use contracts::domain::common::Resource;
use leptos::prelude::*;

/// Working tree of a git repository
#[component]
#[allow(non_snake_case)]
pub fn GitFiles(#[prop(into)] id: String, #[prop(into)] tab_key: String) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let files = FileHandle::<Git>::new(ctx.api_client());

    let name = Signal::derive(move || {
        files
            .resource
            .state
            .with(|s| s.form.display_name().to_string())
    });
    let branch = Signal::derive(move || {
        files.resource.state.with(|s| {
            (!s.form.current_branch.is_empty()).then(|| format!("branch: {}", s.form.current_branch))
        })
    });
    let status = Signal::derive(move || files.resource.state.with(|s| s.form.status.clone()));

    let title_key = tab_key.clone();
    Effect::new(move |_| {
        let name = name.get();
        if !name.is_empty() {
            ctx.update_tab_title(&title_key, &files_tab_title(&name));
        }
    });

    view! {
        <PageFrame page_id=format!("{}--files", Git::full_name()) category=PAGE_CAT_FILES>
            <PageHeader title=Git::element_name() subtitle=branch>
                <span class="page__record-name">{move || name.get()}</span>
                {move || {
                    let status = status.get();
                    (!status.is_empty()).then(|| view! { <StatusBadge status=status.clone() label=status /> })
                }}
            </PageHeader>
            <FileBrowser handle=files id=id tab_key=tab_key />
        </PageFrame>
    }
}
