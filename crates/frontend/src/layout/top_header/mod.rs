//! TopHeader component - application top navigation bar.
//!
//! Toggles for the navigation sidebar and the chat panel, language, backend version.

use crate::layout::global_context::AppGlobalContext;
use crate::shared::icons::icon;
use leptos::prelude::*;

const LANGUAGES: [(&str, &str); 2] = [("en", "EN"), ("zh", "中文")];

#[component]
pub fn TopHeader() -> impl IntoView {
    let ctx =
        leptos::context::use_context::<AppGlobalContext>().expect("AppGlobalContext not found");

    let is_sidebar_visible = move || ctx.left_open.get();
    let is_chat_visible = move || ctx.chat_open.get();
    let version = move || {
        ctx.system_info
            .get()
            .map(|info| format!("{} {}", info.edition, info.version).trim().to_string())
            .unwrap_or_default()
    };

    view! {
        <div class="top-header">
            <div class="top-header__brand">
                <button
                    class="top-header__icon-btn"
                    on:click=move |_| ctx.toggle_left()
                    title=move || if is_sidebar_visible() { "Hide navigation" } else { "Show navigation" }
                >
                    {move || if is_sidebar_visible() {
                        icon("panel-left-close")
                    } else {
                        icon("panel-left-open")
                    }}
                </button>
                <span class="top-header__title">"Crawler Console"</span>
                <span class="top-header__version">{version}</span>
            </div>

            <div class="top-header__actions">
                <select
                    class="top-header__lang"
                    on:change=move |ev| ctx.set_lang(&event_target_value(&ev))
                >
                    {LANGUAGES.iter().map(|(code, label)| {
                        view! {
                            <option value=*code selected=move || ctx.lang.get() == *code>{*label}</option>
                        }
                    }).collect_view()}
                </select>
                <button
                    class="top-header__icon-btn"
                    class:top-header__icon-btn--active=is_chat_visible
                    on:click=move |_| ctx.toggle_chat()
                    title=move || if is_chat_visible() { "Hide AI assistant" } else { "Show AI assistant" }
                >
                    {icon("message-square")}
                </button>
            </div>
        </div>
    }
}
