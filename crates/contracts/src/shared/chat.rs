//! AI chat conversation DTOs and streamed chunks

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    #[default]
    User,
    Assistant,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    #[default]
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// One incremental unit of a streamed chat completion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatChunk {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

/// Part of a message body; assistant messages may carry several
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessageContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    pub role: ChatRole,
    #[serde(default)]
    pub contents: Vec<ChatMessageContent>,
    #[serde(default)]
    pub status: MessageStatus,
    #[serde(default)]
    pub is_streaming: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<TokenUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            contents: vec![ChatMessageContent {
                content: text.into(),
                ..Default::default()
            }],
            status: MessageStatus::Completed,
            ..Default::default()
        }
    }

    /// Empty assistant message waiting for streamed chunks
    pub fn assistant_pending() -> Self {
        Self {
            role: ChatRole::Assistant,
            status: MessageStatus::Pending,
            is_streaming: true,
            ..Default::default()
        }
    }

    /// Full text of the message, all content parts concatenated
    pub fn text(&self) -> String {
        self.contents.iter().map(|c| c.content.as_str()).collect()
    }

    /// Append a streamed chunk in arrival order; a done or error chunk closes the message
    pub fn append_chunk(&mut self, chunk: &ChatChunk) {
        if !self.is_streaming {
            return;
        }
        if let Some(error) = chunk.error.as_ref().filter(|e| !e.is_empty()) {
            self.fail(error.clone());
            return;
        }

        if !chunk.text.is_empty() {
            match self.contents.last_mut() {
                Some(last) => last.content.push_str(&chunk.text),
                None => self.contents.push(ChatMessageContent {
                    id: chunk.message_id.clone(),
                    content: chunk.text.clone(),
                    usage: None,
                }),
            }
        }
        if chunk.model.is_some() {
            self.model = chunk.model.clone();
        }
        if chunk.conversation_id.is_some() {
            self.conversation_id = chunk.conversation_id.clone();
        }
        if chunk.message_id.is_some() && self.id.is_none() {
            self.id = chunk.message_id.clone();
        }
        if let Some(usage) = chunk.usage {
            self.usage = Some(usage);
            if let Some(last) = self.contents.last_mut() {
                last.usage = Some(usage);
            }
        }
        if chunk.is_done {
            self.complete();
        }
    }

    pub fn complete(&mut self) {
        if self.is_streaming {
            self.is_streaming = false;
            self.status = MessageStatus::Completed;
        }
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.is_streaming = false;
        self.status = MessageStatus::Failed;
        self.error = Some(error.into());
    }
}

/// Body of the streaming chat endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(text: &str, is_done: bool) -> ChatChunk {
        ChatChunk {
            text: text.to_string(),
            is_done,
            ..Default::default()
        }
    }

    #[test]
    fn test_chunks_accumulate_until_done() {
        let mut msg = ChatMessage::assistant_pending();
        msg.append_chunk(&chunk("Hel", false));
        msg.append_chunk(&ChatChunk {
            usage: Some(TokenUsage {
                prompt_tokens: 3,
                completion_tokens: 2,
                total_tokens: 5,
            }),
            ..chunk("lo", true)
        });
        // After done nothing is appended
        msg.append_chunk(&chunk("!", false));

        assert_eq!(msg.text(), "Hello");
        assert_eq!(msg.status, MessageStatus::Completed);
        assert!(!msg.is_streaming);
        assert_eq!(msg.usage.map(|u| u.total_tokens), Some(5));
    }

    #[test]
    fn test_error_chunk_fails_message() {
        let mut msg = ChatMessage::assistant_pending();
        msg.append_chunk(&chunk("partial", false));
        msg.append_chunk(&ChatChunk {
            error: Some("rate limited".into()),
            ..Default::default()
        });

        assert_eq!(msg.status, MessageStatus::Failed);
        assert_eq!(msg.error.as_deref(), Some("rate limited"));
        assert_eq!(msg.text(), "partial");
    }

    #[test]
    fn test_chunk_defaults() {
        let c: ChatChunk = serde_json::from_str(r#"{"text":"a","is_done":false}"#).unwrap();
        assert_eq!(c, chunk("a", false));
    }
}
