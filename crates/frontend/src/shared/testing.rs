//! Test doubles for the client layer: an in-memory transport and a tokio sleeper

use crate::shared::api_error::ApiError;
use crate::shared::debounce::Sleeper;
use crate::shared::transport::{
    ApiRequest, HttpResponse, Method, StreamResponse, Transport,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use futures_util::stream::StreamExt;
use futures_util::FutureExt;
use serde_json::{json, Value};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

type Handler = Rc<dyn Fn(&ApiRequest) -> HttpResponse>;

struct Route {
    method: Method,
    path: String,
    delay: Box<dyn Fn(&ApiRequest) -> Duration>,
    handler: Handler,
}

/// Recording transport answering from registered routes
///
/// Routes match on method and URL suffix; later registrations win.
#[derive(Default)]
pub struct MockTransport {
    routes: RefCell<Vec<Route>>,
    streams: RefCell<Vec<(String, Vec<Vec<u8>>)>>,
    requests: RefCell<Vec<ApiRequest>>,
}

pub fn json_response(value: Value) -> HttpResponse {
    HttpResponse {
        status: 200,
        body: value.to_string().into_bytes(),
    }
}

pub fn ok_envelope(data: Value) -> HttpResponse {
    json_response(json!({"status": "ok", "message": "success", "data": data}))
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(
        &self,
        method: Method,
        path: &str,
        handler: impl Fn(&ApiRequest) -> HttpResponse + 'static,
    ) {
        self.respond_delayed(method, path, |_| Duration::ZERO, handler);
    }

    /// Route whose answer is held back by `delay(request)`
    pub fn respond_delayed(
        &self,
        method: Method,
        path: &str,
        delay: impl Fn(&ApiRequest) -> Duration + 'static,
        handler: impl Fn(&ApiRequest) -> HttpResponse + 'static,
    ) {
        self.routes.borrow_mut().push(Route {
            method,
            path: path.to_string(),
            delay: Box::new(delay),
            handler: Rc::new(handler),
        });
    }

    pub fn respond(&self, method: Method, path: &str, response: HttpResponse) {
        self.respond_with(method, path, move |_| response.clone());
    }

    pub fn respond_json(&self, method: Method, path: &str, value: Value) {
        self.respond(method, path, json_response(value));
    }

    /// Streamed POST answered with the given byte chunks, in order
    pub fn respond_stream(&self, path: &str, chunks: Vec<Vec<u8>>) {
        self.streams.borrow_mut().push((path.to_string(), chunks));
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests
            .borrow()
            .iter()
            .filter(|r| r.method == method && r.url.ends_with(path))
            .cloned()
            .collect()
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());

        let matched = {
            let routes = self.routes.borrow();
            routes
                .iter()
                .rev()
                .find(|r| r.method == request.method && request.url.ends_with(&r.path))
                .map(|r| ((r.delay)(&request), r.handler.clone()))
        };
        let Some((delay, handler)) = matched else {
            return Ok(HttpResponse {
                status: 404,
                body: br#"{"status":"error","message":"error","error":"no route"}"#.to_vec(),
            });
        };

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(handler(&request))
    }

    async fn open_stream(&self, request: ApiRequest) -> Result<StreamResponse, ApiError> {
        self.requests.borrow_mut().push(request.clone());
        let chunks = self
            .streams
            .borrow()
            .iter()
            .rev()
            .find(|(path, _)| request.url.ends_with(path.as_str()))
            .map(|(_, chunks)| chunks.clone());

        match chunks {
            Some(chunks) => Ok(StreamResponse {
                status: 200,
                body: futures_util::stream::iter(chunks.into_iter().map(Ok)).boxed_local(),
            }),
            None => Ok(StreamResponse {
                status: 404,
                body: futures_util::stream::iter(vec![Ok(
                    br#"{"status":"error","error":"no stream"}"#.to_vec()
                )])
                .boxed_local(),
            }),
        }
    }
}

/// Sleeper backed by the tokio timer
pub struct TokioSleeper;

impl Sleeper for TokioSleeper {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        tokio::time::sleep(duration).boxed_local()
    }
}
