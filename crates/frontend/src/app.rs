use crate::layout::global_context::AppGlobalContext;
use crate::layout::Shell;
use leptos::prelude::*;

#[component]
pub fn App() -> impl IntoView {
    let ctx = AppGlobalContext::browser();
    provide_context(ctx);

    // Runs once on startup: tab persistence, document language, `?active=` sync, backend version
    ctx.init_persistence();
    ctx.init_document_lang();
    ctx.init_router_integration();
    ctx.load_system_info();

    view! { <Shell /> }
}
