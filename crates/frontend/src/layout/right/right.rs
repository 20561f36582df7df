use crate::layout::global_context::AppGlobalContext;
use crate::shared::settings::{MAX_CHAT_SIDEBAR_WIDTH, MIN_CHAT_SIDEBAR_WIDTH};
use leptos::prelude::window_event_listener;
use leptos::prelude::*;

/// Resizable chat sidebar; width and visibility are kept in settings
#[component]
pub fn Right(children: Children) -> impl IntoView {
    let ctx = leptos::context::use_context::<AppGlobalContext>()
        .expect("AppGlobalContext context not found");
    let is_open = move || ctx.chat_open.get();

    let width = RwSignal::new(f64::from(ctx.chat_width.get_untracked()));
    let is_resizing = RwSignal::new(false);
    let start_x = RwSignal::new(0.0f64);
    let start_width = RwSignal::new(0.0f64);

    // Resize start
    let on_resize_start = move |ev: leptos::ev::MouseEvent| {
        if !is_open() {
            return;
        }
        is_resizing.set(true);
        start_x.set(f64::from(ev.client_x()));
        start_width.set(width.get_untracked());
        ev.prevent_default();
    };

    let _ = window_event_listener(leptos::ev::mousemove, move |ev: leptos::ev::MouseEvent| {
        if !is_resizing.get_untracked() {
            return;
        }
        // the panel grows to the left: cursor left of the start means wider
        let dx = start_x.get_untracked() - f64::from(ev.client_x());
        width.set((start_width.get_untracked() + dx).clamp(
            f64::from(MIN_CHAT_SIDEBAR_WIDTH),
            f64::from(MAX_CHAT_SIDEBAR_WIDTH),
        ));
    });

    // Width is persisted only when the drag ends
    let _ = window_event_listener(leptos::ev::mouseup, move |_ev: leptos::ev::MouseEvent| {
        if is_resizing.get_untracked() {
            is_resizing.set(false);
            ctx.set_chat_width(width.get_untracked().round() as u32);
            width.set(f64::from(ctx.chat_width.get_untracked()));
        }
    });

    Effect::new(move |_| {
        let resizing = is_resizing.get();
        if let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        {
            let (cursor, select) = if resizing { ("col-resize", "none") } else { ("", "") };
            let _ = body.style().set_property("cursor", cursor);
            let _ = body.style().set_property("user-select", select);
        }
    });

    view! {
        <div
            data-zone="right"
            class="right-panel"
            class:right-panel--hidden=move || !is_open()
            class:right-panel--resizing=move || is_resizing.get()
            style:width=move || if is_open() { format!("{}px", width.get()) } else { "0px".to_string() }
        >
            <div class="right-panel__resizer" on:mousedown=on_resize_start></div>
            {children()}
        </div>
    }
}
