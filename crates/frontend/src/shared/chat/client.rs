//! Streaming chat completion over a plain POST response
//!
//! EventSource only supports GET, so the request goes through the regular
//! transport and the body is decoded with [`SseDecoder`].

use super::decoder::{SseDecoder, SseFrame};
use crate::shared::api_error::{ApiError, ApiResult};
use crate::shared::request::{http_error, ApiClient};
use contracts::shared::chat::{ChatChunk, ChatRequest};
use futures_util::future::{AbortRegistration, Abortable};
use futures_util::StreamExt;

pub const CHAT_STREAM_PATH: &str = "/ai/chat/stream";

/// Receives the decoded stream
pub trait ChatStreamHandler {
    fn on_chunk(&mut self, chunk: ChatChunk);
    fn on_error(&mut self, error: ApiError);
    fn on_complete(&mut self);
}

#[derive(Clone)]
pub struct ChatStreamClient {
    client: ApiClient,
    path: String,
}

impl ChatStreamClient {
    pub fn new(client: ApiClient) -> Self {
        Self::with_path(client, CHAT_STREAM_PATH)
    }

    pub fn with_path(client: ApiClient, path: impl Into<String>) -> Self {
        Self {
            client,
            path: path.into(),
        }
    }

    /// Send `request` and deliver chunks until the server closes the stream
    ///
    /// Malformed `data:` payloads are logged and skipped; `event: error`
    /// frames go to `on_error` without ending the stream. Transport failures
    /// end it with `on_error` and are returned.
    pub async fn send<H>(&self, request: &ChatRequest, handler: &mut H) -> ApiResult<()>
    where
        H: ChatStreamHandler + ?Sized,
    {
        let response = match self.client.post_stream(&self.path, request).await {
            Ok(response) => response,
            Err(e) => {
                handler.on_error(e.clone());
                return Err(e);
            }
        };

        let mut body = response.body;
        if !(200..300).contains(&response.status) {
            let mut bytes = Vec::new();
            while let Some(Ok(chunk)) = body.next().await {
                bytes.extend_from_slice(&chunk);
            }
            let error = http_error(response.status, &bytes);
            handler.on_error(error.clone());
            return Err(error);
        }

        let mut decoder = SseDecoder::new();
        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => {
                    for frame in decoder.feed(&bytes) {
                        dispatch(frame, handler);
                    }
                }
                Err(e) => {
                    log::error!("chat stream interrupted: {}", e);
                    handler.on_error(e.clone());
                    return Err(e);
                }
            }
        }
        for frame in decoder.finish() {
            dispatch(frame, handler);
        }

        handler.on_complete();
        Ok(())
    }

    /// Like [`send`](Self::send), stopped early when the paired `AbortHandle` fires
    pub async fn send_with_abort<H>(
        &self,
        request: &ChatRequest,
        handler: &mut H,
        registration: AbortRegistration,
    ) -> ApiResult<()>
    where
        H: ChatStreamHandler + ?Sized,
    {
        match Abortable::new(self.send(request, handler), registration).await {
            Ok(result) => result,
            Err(_aborted) => {
                log::debug!("chat stream aborted by caller");
                Err(ApiError::Aborted)
            }
        }
    }
}

fn dispatch<H: ChatStreamHandler + ?Sized>(frame: SseFrame, handler: &mut H) {
    if frame.is_error() {
        let raw = frame.data.join("\n");
        let message = serde_json::from_str::<ChatChunk>(&raw)
            .ok()
            .and_then(|chunk| chunk.error)
            .or_else(|| Some(raw).filter(|r| !r.trim().is_empty()))
            .unwrap_or_else(|| "stream error".to_string());
        handler.on_error(ApiError::Stream(message));
        return;
    }

    for data in frame.data {
        let payload = data.trim();
        if payload.is_empty() || payload == "[DONE]" {
            continue;
        }
        match serde_json::from_str::<ChatChunk>(payload) {
            Ok(chunk) => handler.on_chunk(chunk),
            Err(e) => log::warn!("skipping malformed chat chunk ({}): {}", e, payload),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::MockTransport;
    use crate::shared::transport::Method;
    use futures_util::future::AbortHandle;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl ChatStreamHandler for Recorder {
        fn on_chunk(&mut self, chunk: ChatChunk) {
            self.events.push(format!("chunk:{}:{}", chunk.text, chunk.is_done));
        }

        fn on_error(&mut self, error: ApiError) {
            self.events.push(format!("error:{}", error));
        }

        fn on_complete(&mut self) {
            self.events.push("complete".to_string());
        }
    }

    fn chat_client(mock: &Rc<MockTransport>) -> ChatStreamClient {
        ChatStreamClient::new(ApiClient::new(mock.clone(), "http://localhost:8000/api"))
    }

    fn request() -> ChatRequest {
        ChatRequest {
            query: "list my spiders".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_frames_split_mid_frame() {
        let stream = "data: {\"text\":\"a\",\"is_done\":false}\n\ndata: {\"text\":\"b\",\"is_done\":true}\n\n";
        let bytes = stream.as_bytes();
        let mock = Rc::new(MockTransport::new());
        mock.respond_stream(
            CHAT_STREAM_PATH,
            vec![bytes[..10].to_vec(), bytes[10..45].to_vec(), bytes[45..].to_vec()],
        );

        let mut recorder = Recorder::default();
        chat_client(&mock).send(&request(), &mut recorder).await.unwrap();

        assert_eq!(
            recorder.events,
            vec!["chunk:a:false", "chunk:b:true", "complete"]
        );
        let sent = &mock.requests()[0];
        assert_eq!(sent.method, Method::Post);
        assert_eq!(sent.json_body().unwrap()["query"], "list my spiders");
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_skipped() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_stream(
            CHAT_STREAM_PATH,
            vec![b"data: {not json}\n\ndata: {\"text\":\"ok\",\"is_done\":true}\n\n".to_vec()],
        );

        let mut recorder = Recorder::default();
        chat_client(&mock).send(&request(), &mut recorder).await.unwrap();

        assert_eq!(recorder.events, vec!["chunk:ok:true", "complete"]);
    }

    #[tokio::test]
    async fn test_error_event_does_not_end_stream() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_stream(
            CHAT_STREAM_PATH,
            vec![
                b"event: error\ndata: {\"error\":\"model overloaded\"}\n\n".to_vec(),
                b"data: {\"text\":\"retry\"}".to_vec(),
            ],
        );

        let mut recorder = Recorder::default();
        chat_client(&mock).send(&request(), &mut recorder).await.unwrap();

        assert_eq!(
            recorder.events,
            vec![
                "error:Stream error: model overloaded",
                "chunk:retry:false",
                "complete"
            ]
        );
    }

    #[tokio::test]
    async fn test_http_error_reported_once() {
        let mock = Rc::new(MockTransport::new());
        let client = ChatStreamClient::with_path(
            ApiClient::new(mock.clone(), "http://localhost:8000/api"),
            "/ai/chat/missing",
        );

        let mut recorder = Recorder::default();
        let result = client.send(&request(), &mut recorder).await;

        assert_eq!(
            result,
            Err(ApiError::Http {
                status: 404,
                message: "no stream".into()
            })
        );
        assert_eq!(recorder.events, vec!["error:Server error 404: no stream"]);
    }

    #[tokio::test]
    async fn test_abort_skips_completion() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_stream(CHAT_STREAM_PATH, vec![b"data: {\"text\":\"a\"}\n\n".to_vec()]);
        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();

        let mut recorder = Recorder::default();
        let result = chat_client(&mock)
            .send_with_abort(&request(), &mut recorder, registration)
            .await;

        assert_eq!(result, Err(ApiError::Aborted));
        assert!(recorder.events.is_empty());
    }
}
