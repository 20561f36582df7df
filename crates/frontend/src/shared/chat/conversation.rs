use super::client::ChatStreamHandler;
use crate::shared::api_error::ApiError;
use contracts::shared::chat::{ChatChunk, ChatMessage, ChatRequest, ChatRole};

/// Message history of one chat panel
///
/// Each turn appends the user message and an empty assistant message; the
/// assistant message receives the streamed chunks through [`ChatStreamHandler`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatConversation {
    pub conversation_id: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub system_prompt: Option<String>,
    pub messages: Vec<ChatMessage>,
}

impl ChatConversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: Some(provider.into()),
            model: Some(model.into()),
            ..Default::default()
        }
    }

    /// Append a user turn and the pending answer, returning the request to stream
    pub fn start_turn(&mut self, query: impl Into<String>) -> ChatRequest {
        let query = query.into();
        // a previous answer must not stay in the streaming state
        if let Some(current) = self.streaming_mut() {
            current.fail(ApiError::Aborted.to_string());
        }

        let mut user = ChatMessage::user(query.clone());
        user.id = Some(uuid::Uuid::new_v4().to_string());
        user.conversation_id = self.conversation_id.clone();
        self.messages.push(user);
        self.messages.push(ChatMessage::assistant_pending());

        ChatRequest {
            query,
            conversation_id: self.conversation_id.clone(),
            provider: self.provider.clone(),
            model: self.model.clone(),
            system_prompt: self.system_prompt.clone(),
        }
    }

    pub fn is_streaming(&self) -> bool {
        self.messages.iter().any(|m| m.is_streaming)
    }

    /// Mark the in-flight answer as stopped by the user
    pub fn abort(&mut self) {
        if let Some(current) = self.streaming_mut() {
            current.fail(ApiError::Aborted.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.conversation_id = None;
        self.messages.clear();
    }

    pub fn last_assistant(&self) -> Option<&ChatMessage> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::Assistant)
    }

    fn streaming_mut(&mut self) -> Option<&mut ChatMessage> {
        self.messages
            .iter_mut()
            .rev()
            .find(|m| m.role == ChatRole::Assistant && m.is_streaming)
    }
}

impl ChatStreamHandler for ChatConversation {
    fn on_chunk(&mut self, chunk: ChatChunk) {
        if let Some(id) = chunk.conversation_id.as_ref().filter(|id| !id.is_empty()) {
            self.conversation_id = Some(id.clone());
        }
        match self.streaming_mut() {
            Some(current) => current.append_chunk(&chunk),
            None => log::debug!("chat chunk after the answer was closed, ignored"),
        }
    }

    fn on_error(&mut self, error: ApiError) {
        log::warn!("chat stream error: {}", error);
        if let Some(current) = self.streaming_mut() {
            current.fail(error.to_string());
        }
    }

    fn on_complete(&mut self) {
        if let Some(current) = self.streaming_mut() {
            current.complete();
        }
    }
}
