use crate::layout::global_context::AppGlobalContext;
use crate::layout::tabs::files_tab_title;
use crate::shared::components::{FileBrowser, PageHeader};
use crate::shared::page_frame::{PageFrame, PAGE_CAT_FILES};
use crate::shared::store::FileHandle;
use contracts::domain::a001_spider::aggregate::Spider;
use contracts::domain::common::Resource;
use leptos::prelude::*;

/// Spider code: file tree and editor
#[component]
#[allow(non_snake_case)]
pub fn SpiderFiles(#[prop(into)] id: String, #[prop(into)] tab_key: String) -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");
    let files = FileHandle::<Spider>::new(ctx.api_client());

    let name = Signal::derive(move || {
        files
            .resource
            .state
            .with(|s| s.form.display_name().to_string())
    });
    let subtitle = Signal::derive(move || {
        files.resource.state.with(|s| {
            (!s.form.cmd.is_empty()).then(|| s.form.cmd.clone())
        })
    });

    // Tab title follows the record name once it has loaded
    let title_key = tab_key.clone();
    Effect::new(move |_| {
        let name = name.get();
        if !name.is_empty() {
            ctx.update_tab_title(&title_key, &files_tab_title(&name));
        }
    });

    view! {
        <PageFrame page_id=format!("{}--files", Spider::full_name()) category=PAGE_CAT_FILES>
            <PageHeader title=Spider::element_name() subtitle=subtitle>
                <span class="page__record-name">{move || name.get()}</span>
            </PageHeader>
            <FileBrowser handle=files id=id tab_key=tab_key />
        </PageFrame>
    }
}
