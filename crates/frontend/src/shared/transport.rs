//! HTTP transport seam
//!
//! `ApiClient` talks to the backend through the [`Transport`] trait. In the
//! browser that is [`GlooTransport`] (fetch via `gloo-net`); tests plug in an
//! in-memory transport.

use crate::shared::api_error::ApiError;
use async_trait::async_trait;
use futures_util::stream::{LocalBoxStream, StreamExt};
use gloo_net::http::{Request, RequestBuilder};
use wasm_bindgen::JsCast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormValue {
    Text(String),
    Bytes(Vec<u8>),
}

/// One field of a multipart form
#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub file_name: Option<String>,
    pub value: FormValue,
}

impl FormPart {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            value: FormValue::Text(value.into()),
        }
    }

    pub fn file(name: impl Into<String>, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            file_name: Some(file_name.into()),
            value: FormValue::Bytes(bytes),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(serde_json::Value),
    Multipart(Vec<FormPart>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
}

impl ApiRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: RequestBody::Empty,
        }
    }

    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn json_body(&self) -> Option<&serde_json::Value> {
        match &self.body {
            RequestBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub type ByteStream = LocalBoxStream<'static, Result<Vec<u8>, ApiError>>;

/// Response whose body is consumed incrementally
pub struct StreamResponse {
    pub status: u16,
    pub body: ByteStream,
}

#[async_trait(?Send)]
pub trait Transport {
    /// Send a request and buffer the whole body
    async fn send(&self, request: ApiRequest) -> Result<HttpResponse, ApiError>;

    /// Send a request and hand back the body as a stream of byte chunks
    async fn open_stream(&self, request: ApiRequest) -> Result<StreamResponse, ApiError>;
}

/// Browser fetch transport
#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

impl GlooTransport {
    fn builder(request: &ApiRequest) -> RequestBuilder {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };
        if !request.query.is_empty() {
            builder = builder.query(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }
        builder
    }

    fn build(request: &ApiRequest) -> Result<Request, ApiError> {
        let builder = Self::builder(request);
        let built = match &request.body {
            RequestBody::Empty => builder.build(),
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(parts) => builder.body(form_data(parts)?),
        };
        built.map_err(|e| ApiError::Network(e.to_string()))
    }
}

fn form_data(parts: &[FormPart]) -> Result<web_sys::FormData, ApiError> {
    let form = web_sys::FormData::new().map_err(ApiError::network)?;
    for part in parts {
        match &part.value {
            FormValue::Text(text) => form
                .append_with_str(&part.name, text)
                .map_err(ApiError::network)?,
            FormValue::Bytes(bytes) => {
                let chunks = js_sys::Array::new();
                chunks.push(&js_sys::Uint8Array::from(bytes.as_slice()));
                let blob =
                    web_sys::Blob::new_with_u8_array_sequence(&chunks).map_err(ApiError::network)?;
                let file_name = part.file_name.as_deref().unwrap_or(&part.name);
                form.append_with_blob_and_filename(&part.name, &blob, file_name)
                    .map_err(ApiError::network)?;
            }
        }
    }
    Ok(form)
}

/// Reads a fetch body chunk by chunk through its default reader
fn read_body(body: web_sys::ReadableStream) -> ByteStream {
    let reader: web_sys::ReadableStreamDefaultReader = body.get_reader().unchecked_into();

    futures_util::stream::unfold(Some(reader), |reader| async move {
        let reader = reader?;
        let result = match wasm_bindgen_futures::JsFuture::from(reader.read()).await {
            Ok(result) => result,
            Err(e) => return Some((Err(ApiError::Stream(format!("{e:?}"))), None)),
        };

        let done = js_sys::Reflect::get(&result, &"done".into())
            .ok()
            .and_then(|v| v.as_bool())
            .unwrap_or(true);
        if done {
            return None;
        }

        match js_sys::Reflect::get(&result, &"value".into()) {
            Ok(value) => {
                let bytes = js_sys::Uint8Array::new(&value).to_vec();
                Some((Ok(bytes), Some(reader)))
            }
            Err(e) => Some((Err(ApiError::Stream(format!("{e:?}"))), None)),
        }
    })
    .boxed_local()
}

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<HttpResponse, ApiError> {
        let response = Self::build(&request)?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let body = response
            .binary()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }

    async fn open_stream(&self, request: ApiRequest) -> Result<StreamResponse, ApiError> {
        let response = Self::build(&request)?
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let status = response.status();
        let body = match response.body() {
            Some(stream) => read_body(stream),
            None => futures_util::stream::empty().boxed_local(),
        };
        Ok(StreamResponse { status, body })
    }
}
