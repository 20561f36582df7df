pub mod center;
pub mod global_context;
pub mod left;
pub mod right;
pub mod tabs;
pub mod top_header;

use crate::domain::a005_ai_chat::ui::ChatPanel;
use center::Tabs;
use global_context::AppGlobalContext;
use left::Sidebar;
use leptos::prelude::*;
use right::Right;
use top_header::TopHeader;

/// Main application shell.
///
/// ```text
/// +------------------------------------------+
/// |              TopHeader                   |
/// +------------------------------------------+
/// |  Sidebar  |    Tabs       |  Chat panel  |
/// +------------------------------------------+
/// ```
///
/// The sidebar zone collapses with `left_open`; the chat zone is resizable.
#[component]
pub fn Shell() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext context not found");

    view! {
        <div class="app-layout">
            <TopHeader />
            <div class="app-body">
                <aside data-zone="left" class="left" class:hidden=move || !ctx.left_open.get()>
                    <Sidebar />
                </aside>
                <main data-zone="center" class="app-main">
                    <Tabs />
                </main>
                <Right>
                    <ChatPanel />
                </Right>
            </div>
        </div>
    }
}
