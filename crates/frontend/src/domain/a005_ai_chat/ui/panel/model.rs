use super::view_model::ChatPanelVm;
use crate::shared::api_error::ApiError;
use crate::shared::chat::{ChatConversation, ChatStreamClient, ChatStreamHandler};
use contracts::shared::chat::ChatChunk;
use futures_util::future::AbortHandle;
use leptos::prelude::*;

/// Applies stream callbacks to the conversation signal
struct PanelHandler {
    conversation: RwSignal<ChatConversation>,
}

impl ChatStreamHandler for PanelHandler {
    fn on_chunk(&mut self, chunk: ChatChunk) {
        self.conversation.update(|c| c.on_chunk(chunk));
    }

    fn on_error(&mut self, error: ApiError) {
        self.conversation.update(|c| c.on_error(error));
    }

    fn on_complete(&mut self) {
        self.conversation.update(|c| c.on_complete());
    }
}

/// Start a turn with the typed message and stream the answer into `vm`
pub fn send_message(vm: ChatPanelVm, client: ChatStreamClient) {
    let query = vm.new_message.get_untracked();
    if query.trim().is_empty() || vm.is_sending.get_untracked() {
        return;
    }

    let Some(request) = vm.conversation.try_update(|c| c.start_turn(query.trim())) else {
        return;
    };
    vm.new_message.set(String::new());
    vm.error.set(None);
    vm.is_sending.set(true);

    let (handle, registration) = AbortHandle::new_pair();
    vm.abort.set_value(Some(handle));

    wasm_bindgen_futures::spawn_local(async move {
        let mut handler = PanelHandler {
            conversation: vm.conversation,
        };
        match client
            .send_with_abort(&request, &mut handler, registration)
            .await
        {
            Ok(()) => {}
            Err(ApiError::Aborted) => vm.conversation.update(|c| c.abort()),
            Err(e) => vm.error.set(Some(e.to_string())),
        }
        vm.abort.set_value(None);
        vm.is_sending.set(false);
    });
}

pub fn stop_stream(vm: ChatPanelVm) {
    if let Some(handle) = vm.abort.get_value() {
        handle.abort();
    }
}
