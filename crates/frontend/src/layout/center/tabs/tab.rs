use crate::layout::global_context::{AppGlobalContext, Tab as TabData};
use leptos::ev;
use leptos::prelude::*;

/// Header of one tab in the tab bar
#[component]
pub fn Tab(tab: TabData) -> impl IntoView {
    let tabs_store = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");

    let key = StoredValue::new(tab.key.clone());
    let is_active = Memo::new(move |_| {
        let key = key.get_value();
        tabs_store.active.with(|active| active.as_deref() == Some(key.as_str()))
    });
    // title/dirty are read from the store so renames show up without re-keying
    let current = move || {
        let key = key.get_value();
        tabs_store
            .opened
            .with(|tabs| tabs.iter().find(|t| t.key == key).cloned())
    };

    let on_click = move |_| tabs_store.activate_tab(&key.get_value());
    let on_close = move |ev: ev::MouseEvent| {
        ev.stop_propagation();
        tabs_store.close_tab(&key.get_value());
    };

    view! {
        <div class="tab" class:active=is_active on:click=on_click>
            <span>{move || current().map(|t| t.title).unwrap_or_default()}</span>
            {move || current().filter(|t| t.dirty).map(|_| " *")}
            <button class="tab-close" on:click=on_close>"×"</button>
        </div>
    }
}
