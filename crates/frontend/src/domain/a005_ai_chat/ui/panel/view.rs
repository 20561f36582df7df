//! AI assistant panel - View Component

use super::model::{send_message, stop_stream};
use super::view_model::ChatPanelVm;
use crate::layout::global_context::AppGlobalContext;
use crate::shared::chat::ChatStreamClient;
use crate::shared::components::ErrorBanner;
use crate::shared::icons::icon;
use contracts::shared::chat::{ChatMessage, ChatRole, MessageStatus};
use leptos::prelude::*;
use thaw::*;

#[component]
#[allow(non_snake_case)]
pub fn ChatPanel() -> impl IntoView {
    let ctx = use_context::<AppGlobalContext>().expect("AppGlobalContext not found");
    let vm = ChatPanelVm::new();
    let client = StoredValue::new_local(ChatStreamClient::new(ctx.api_client()));
    let messages_container_ref = NodeRef::<leptos::html::Div>::new();

    // Auto-scroll to the latest message
    Effect::new(move |_| {
        vm.conversation.track();
        if let Some(container) = messages_container_ref.get() {
            request_animation_frame(move || {
                container.set_scroll_top(container.scroll_height());
            });
        }
    });

    let handle_send = move || send_message(vm, client.get_value());

    view! {
        <div class="chat-panel">
            <Flex justify=FlexJustify::SpaceBetween align=FlexAlign::Center class="chat-panel__header">
                <h2 class="chat-panel__title">"AI Assistant"</h2>
                <Space>
                    <Button
                        size=ButtonSize::Small
                        appearance=ButtonAppearance::Subtle
                        disabled=vm.is_sending
                        on_click=move |_| vm.conversation.update(|c| c.clear())
                    >
                        {icon("plus")}
                        " New chat"
                    </Button>
                    <Button
                        size=ButtonSize::Small
                        appearance=ButtonAppearance::Subtle
                        on_click=move |_| ctx.toggle_chat()
                    >
                        {icon("close")}
                    </Button>
                </Space>
            </Flex>

            <ErrorBanner error=vm.error />

            <div node_ref=messages_container_ref class="chat-panel__messages">
                {move || {
                    vm.conversation.with(|c| {
                        c.messages.iter().cloned().map(message_bubble).collect_view()
                    })
                }}
            </div>

            <div class="chat-panel__input">
                <Textarea
                    value=vm.new_message
                    placeholder="Ask about spiders, tasks, nodes... (Ctrl+Enter to send)"
                    attr:style="width: 100%; min-height: 60px; max-height: 200px; resize: vertical;"
                    disabled=vm.is_sending
                    on:keydown=move |ev: web_sys::KeyboardEvent| {
                        if ev.key() == "Enter" && ev.ctrl_key() {
                            ev.prevent_default();
                            handle_send();
                        }
                    }
                />
                <Show
                    when=move || vm.is_sending.get()
                    fallback=move || view! {
                        <Button appearance=ButtonAppearance::Primary on_click=move |_| handle_send()>
                            {icon("send")}
                            " Send"
                        </Button>
                    }
                >
                    <Button appearance=ButtonAppearance::Secondary on_click=move |_| stop_stream(vm)>
                        {icon("stop")}
                        " Stop"
                    </Button>
                </Show>
            </div>
        </div>
    }
}

fn message_bubble(msg: ChatMessage) -> impl IntoView {
    let is_user = msg.role == ChatRole::User;
    let text = msg.text();
    let mut meta_parts = Vec::new();
    if let Some(model) = &msg.model {
        meta_parts.push(model.clone());
    }
    if let Some(usage) = msg.usage {
        meta_parts.push(format!("{} tokens", usage.total_tokens));
    }
    let failed = msg.status == MessageStatus::Failed;
    let error = msg.error.clone().filter(|_| failed);

    view! {
        <div
            class="chat-message"
            class:chat-message--user=is_user
            class:chat-message--assistant=!is_user
        >
            <div class="chat-message__bubble">
                <div style="white-space: pre-wrap;">{text}</div>
                {msg.is_streaming.then(|| view! { <Spinner size=SpinnerSize::Tiny /> })}
                {error.map(|e| view! { <div class="chat-message__error">{e}</div> })}
                {(!meta_parts.is_empty()).then(|| view! {
                    <div class="chat-message__meta">{meta_parts.join(" • ")}</div>
                })}
            </div>
        </div>
    }
}
