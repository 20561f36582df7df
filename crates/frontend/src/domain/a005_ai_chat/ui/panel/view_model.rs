use crate::shared::chat::ChatConversation;
use futures_util::future::AbortHandle;
use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct ChatPanelVm {
    pub conversation: RwSignal<ChatConversation>,
    pub new_message: RwSignal<String>,
    pub error: RwSignal<Option<String>>,
    pub is_sending: RwSignal<bool>,
    /// Stops the in-flight stream
    pub abort: StoredValue<Option<AbortHandle>>,
}

impl ChatPanelVm {
    pub fn new() -> Self {
        Self {
            conversation: RwSignal::new(ChatConversation::new()),
            new_message: RwSignal::new(String::new()),
            error: RwSignal::new(None),
            is_sending: RwSignal::new(false),
            abort: StoredValue::new(None),
        }
    }
}
