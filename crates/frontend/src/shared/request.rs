//! Request layer over the backend REST API
//!
//! Wraps the raw verbs of a [`Transport`] and unwraps the
//! `{status, message, data, total, error}` envelope into `Result<T, ApiError>`.

use crate::shared::api_error::{ApiError, ApiResult};
use crate::shared::transport::{
    ApiRequest, FormPart, GlooTransport, HttpResponse, Method, RequestBody, StreamResponse,
    Transport,
};
use contracts::shared::envelope::{EnvelopeOutcome, ResponseEnvelope};
use contracts::shared::filter::ListParams;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// Page of a list endpoint together with the collection total
#[derive(Debug, Clone, PartialEq)]
pub struct ListData<T> {
    pub data: Vec<T>,
    pub total: u64,
}

impl<T> Default for ListData<T> {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            total: 0,
        }
    }
}

pub type Query = Vec<(String, String)>;

#[derive(Clone)]
pub struct ApiClient {
    transport: Rc<dyn Transport>,
    base_url: Rc<str>,
    token: Rc<RefCell<Option<String>>>,
}

impl ApiClient {
    pub fn new(transport: Rc<dyn Transport>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').into(),
            token: Rc::new(RefCell::new(None)),
        }
    }

    /// Client for the running page: fetch transport and the configured API base
    pub fn browser(base_url: impl Into<String>) -> Self {
        Self::new(Rc::new(GlooTransport), base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str, query: Query, body: RequestBody) -> ApiRequest {
        let mut request = ApiRequest::new(method, self.url(path));
        request.query = query;
        request.body = body;
        if let Some(token) = self.token.borrow().as_ref() {
            request
                .headers
                .push(("Authorization".to_string(), token.clone()));
        }
        request
    }

    /// Send and map non-2xx statuses to errors; the body is returned untouched
    pub async fn send_raw(&self, request: ApiRequest) -> ApiResult<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.send(request).await?;
        if response.is_success() {
            return Ok(response);
        }

        let error = http_error(response.status, &response.body);
        log::warn!("{} {} failed: {}", method.as_str(), url, error);
        Err(error)
    }

    /// Send and unwrap the envelope into `(data, total)`
    async fn send_envelope(&self, request: ApiRequest) -> ApiResult<(Value, Option<u64>)> {
        let response = self.send_raw(request).await?;
        if response.body.is_empty() {
            return Ok((Value::Null, None));
        }

        let envelope: ResponseEnvelope<Value> =
            serde_json::from_slice(&response.body).map_err(ApiError::decode)?;
        match envelope.into_outcome() {
            EnvelopeOutcome::Ok { data, total } => Ok((data.unwrap_or(Value::Null), total)),
            EnvelopeOutcome::Err { message } => Err(ApiError::Backend(message)),
        }
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: RequestBody,
    ) -> ApiResult<T> {
        let request = self.request(method, path, query, body);
        let (data, _) = self.send_envelope(request).await?;
        serde_json::from_value(data).map_err(ApiError::decode)
    }

    async fn call_list<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: Query,
        body: RequestBody,
    ) -> ApiResult<ListData<T>> {
        let request = self.request(method, path, query, body);
        let (data, total) = self.send_envelope(request).await?;
        let data: Vec<T> = match data {
            Value::Null => Vec::new(),
            other => serde_json::from_value(other).map_err(ApiError::decode)?,
        };
        let total = total.unwrap_or(data.len() as u64);
        Ok(ListData { data, total })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str, query: Query) -> ApiResult<T> {
        self.call(Method::Get, path, query, RequestBody::Empty).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.call(Method::Post, path, Vec::new(), json_body(body)?)
            .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        self.call(Method::Put, path, Vec::new(), json_body(body)?)
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str, body: Option<Value>) -> ApiResult<T> {
        let body = body.map(RequestBody::Json).unwrap_or(RequestBody::Empty);
        self.call(Method::Delete, path, Vec::new(), body).await
    }

    pub async fn get_list<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ListParams,
    ) -> ApiResult<ListData<T>> {
        self.call_list(Method::Get, path, params.to_query_pairs(), RequestBody::Empty)
            .await
    }

    pub async fn post_list<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ListData<T>> {
        self.call_list(Method::Post, path, Vec::new(), json_body(body)?)
            .await
    }

    pub async fn put_list<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ListData<T>> {
        self.call_list(Method::Put, path, Vec::new(), json_body(body)?)
            .await
    }

    pub async fn delete_list<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ListData<T>> {
        self.call_list(Method::Delete, path, Vec::new(), json_body(body)?)
            .await
    }

    /// Multipart POST (binary file uploads)
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<FormPart>,
    ) -> ApiResult<T> {
        self.call(Method::Post, path, Vec::new(), RequestBody::Multipart(parts))
            .await
    }

    /// Raw bytes without envelope (archive downloads)
    pub async fn get_bytes(&self, path: &str, query: Query) -> ApiResult<Vec<u8>> {
        let request = self.request(Method::Get, path, query, RequestBody::Empty);
        Ok(self.send_raw(request).await?.body)
    }

    /// POST with a JSON body, response body consumed as a stream
    pub async fn post_stream<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<StreamResponse> {
        let mut request = self.request(Method::Post, path, Vec::new(), json_body(body)?);
        request
            .headers
            .push(("Accept".to_string(), "text/event-stream".to_string()));
        self.transport.open_stream(request).await
    }
}

fn json_body<B: Serialize + ?Sized>(body: &B) -> ApiResult<RequestBody> {
    serde_json::to_value(body)
        .map(RequestBody::Json)
        .map_err(ApiError::decode)
}

/// Error for a non-2xx response, using the envelope text when the body has one
pub fn http_error(status: u16, body: &[u8]) -> ApiError {
    if status == 401 {
        return ApiError::Unauthorized;
    }
    let message = serde_json::from_slice::<ResponseEnvelope<Value>>(body)
        .ok()
        .and_then(|envelope| envelope.error_message())
        .unwrap_or_else(|| String::from_utf8_lossy(body).trim().to_string());
    ApiError::Http { status, message }
}

/// Percent-encode one path segment (ids may come from user input)
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::testing::MockTransport;
    use contracts::domain::a001_spider::aggregate::Spider;
    use contracts::shared::filter::{Condition, Pagination};
    use serde_json::json;

    fn client(mock: &Rc<MockTransport>) -> ApiClient {
        ApiClient::new(mock.clone(), "http://localhost:8000/api/")
    }

    #[tokio::test]
    async fn test_get_unwraps_envelope() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(
            Method::Get,
            "/spiders/s1",
            json!({"status": "ok", "message": "success", "data": {"_id": "s1", "name": "quotes"}}),
        );

        let spider: Spider = client(&mock).get("/spiders/s1", Vec::new()).await.unwrap();
        assert_eq!(spider.name, "quotes");
        assert_eq!(mock.requests()[0].url, "http://localhost:8000/api/spiders/s1");
    }

    #[tokio::test]
    async fn test_backend_error_status() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(
            Method::Post,
            "/spiders",
            json!({"status": "error", "message": "error", "error": "name is required"}),
        );

        let result: ApiResult<Spider> = client(&mock).post("/spiders", &Spider::default()).await;
        assert_eq!(result, Err(ApiError::Backend("name is required".into())));
    }

    #[tokio::test]
    async fn test_http_error_uses_envelope_message() {
        let mock = Rc::new(MockTransport::new());
        mock.respond(
            Method::Get,
            "/spiders/missing",
            HttpResponse {
                status: 404,
                body: br#"{"status":"error","message":"error","error":"not found"}"#.to_vec(),
            },
        );
        mock.respond(
            Method::Get,
            "/tasks",
            HttpResponse {
                status: 401,
                body: Vec::new(),
            },
        );

        let api = client(&mock);
        let missing: ApiResult<Spider> = api.get("/spiders/missing", Vec::new()).await;
        assert_eq!(
            missing,
            Err(ApiError::Http {
                status: 404,
                message: "not found".into()
            })
        );

        let unauthorized: ApiResult<ListData<Value>> =
            api.get_list("/tasks", &ListParams::default()).await;
        assert_eq!(unauthorized, Err(ApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_get_list_sends_params_and_reads_total() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(
            Method::Get,
            "/spiders",
            json!({"status": "ok", "data": [{"name": "a"}, {"name": "b"}], "total": 12}),
        );

        let params = ListParams {
            pagination: Pagination { page: 3, size: 2 },
            conditions: vec![Condition::contains("name", "a")],
            ..Default::default()
        };
        let list: ListData<Spider> = client(&mock).get_list("/spiders", &params).await.unwrap();

        assert_eq!(list.total, 12);
        assert_eq!(list.data.len(), 2);
        let request = &mock.requests()[0];
        assert_eq!(request.query_value("page"), Some("3"));
        assert_eq!(request.query_value("size"), Some("2"));
        assert_eq!(
            request.query_value("conditions"),
            Some(r#"[{"key":"name","op":"c","value":"a"}]"#)
        );
    }

    #[tokio::test]
    async fn test_null_list_is_empty() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(Method::Get, "/nodes", json!({"status": "ok", "data": null, "total": 0}));

        let list: ListData<Value> = client(&mock)
            .get_list("/nodes", &ListParams::all())
            .await
            .unwrap();
        assert_eq!(list, ListData::default());
    }

    #[tokio::test]
    async fn test_token_header() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(Method::Delete, "/spiders/s1", json!({"status": "ok"}));

        let api = client(&mock);
        api.set_token(Some("secret".into()));
        let _: () = api.delete("/spiders/s1", None).await.unwrap();

        assert_eq!(
            mock.requests()[0].headers,
            vec![("Authorization".to_string(), "secret".to_string())]
        );
    }

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("a b/c"), "a%20b%2Fc");
    }
}
