//! Generic list/detail store for a backend resource
//!
//! Every resource (spiders, tasks, nodes, git repos) gets the same state shape
//! and the same CRUD operations against its REST endpoint. Views subscribe to
//! state changes and mirror the state into their own signals.

use super::sequence::RequestSequence;
use crate::shared::api_error::ApiResult;
use crate::shared::debounce::{GlooSleeper, KeyedDebounce, Sleeper, DEFAULT_WAIT};
use crate::shared::request::{segment, ApiClient, ListData};
use contracts::domain::common::Resource;
use contracts::shared::batch::BatchRequest;
use contracts::shared::filter::{Condition, ListParams, Pagination, Sort};
use serde_json::Value;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Which modal dialog of the resource screen is open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKey {
    Create,
    Edit,
    Clone,
    Run,
    UploadFiles,
    Logs,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    /// Current edit buffer; replaced wholesale by `get_by_id`
    pub form: T,
    /// Batch edit buffer
    pub form_list: Vec<T>,
    pub table_data: Vec<T>,
    pub table_total: u64,
    pub table_pagination: Pagination,
    pub table_list_filter: Vec<Condition>,
    pub table_list_sort: Vec<Sort>,
    pub table_loading: bool,
    /// Unpaginated cache for select options
    pub all_list: Vec<T>,
    pub dialog_visible_key: Option<DialogKey>,
}

impl<T: Default> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            form: T::default(),
            form_list: Vec::new(),
            table_data: Vec::new(),
            table_total: 0,
            table_pagination: Pagination::default(),
            table_list_filter: Vec::new(),
            table_list_sort: Vec::new(),
            table_loading: false,
            all_list: Vec::new(),
            dialog_visible_key: None,
        }
    }
}

impl<T> ResourceState<T> {
    /// Params of the table request built from pagination, filter and sort
    pub fn list_params(&self) -> ListParams {
        ListParams {
            pagination: self.table_pagination,
            conditions: self.table_list_filter.clone(),
            sort: self.table_list_sort.clone(),
            all: false,
        }
    }

    pub fn total_pages(&self) -> u64 {
        let size = u64::from(self.table_pagination.size.max(1));
        self.table_total.div_ceil(size)
    }
}

type Listener<T> = Rc<dyn Fn(&ResourceState<T>)>;

#[derive(Clone)]
pub struct ResourceStore<T: Resource> {
    client: ApiClient,
    endpoint: Rc<str>,
    state: Rc<RefCell<ResourceState<T>>>,
    listeners: Rc<RefCell<Vec<Listener<T>>>>,
    list_seq: Rc<RequestSequence>,
    form_seq: Rc<RequestSequence>,
    fetch_by_id: KeyedDebounce<String, ApiResult<T>>,
}

impl<T: Resource> ResourceStore<T> {
    pub fn new(client: ApiClient) -> Self {
        Self::with_debounce(client, DEFAULT_WAIT, Rc::new(GlooSleeper))
    }

    pub fn with_debounce(client: ApiClient, wait: Duration, sleeper: Rc<dyn Sleeper>) -> Self {
        let endpoint: Rc<str> = T::endpoint().into();
        let fetch_by_id = {
            let client = client.clone();
            let endpoint = endpoint.clone();
            KeyedDebounce::new(
                move |id: String| {
                    let client = client.clone();
                    let path = format!("{}/{}", endpoint, segment(&id));
                    async move { client.get::<T>(&path, Vec::new()).await }
                },
                wait,
                sleeper,
            )
        };

        Self {
            client,
            endpoint,
            state: Rc::new(RefCell::new(ResourceState::default())),
            listeners: Rc::new(RefCell::new(Vec::new())),
            list_seq: Rc::new(RequestSequence::new()),
            form_seq: Rc::new(RequestSequence::new()),
            fetch_by_id,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn item_path(&self, id: &str) -> String {
        format!("{}/{}", self.endpoint, segment(id))
    }

    fn batch_path(&self) -> String {
        format!("{}/batch", self.endpoint)
    }

    // ========================================================================
    // State access
    // ========================================================================

    pub fn snapshot(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&ResourceState<T>) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Called with the new state after every change
    pub fn subscribe(&self, listener: impl Fn(&ResourceState<T>) + 'static) {
        self.listeners.borrow_mut().push(Rc::new(listener));
    }

    fn mutate(&self, f: impl FnOnce(&mut ResourceState<T>)) {
        f(&mut self.state.borrow_mut());
        let listeners = self.listeners.borrow().clone();
        let state = self.state.borrow();
        for listener in listeners {
            listener(&state);
        }
    }

    // ========================================================================
    // Local mutations
    // ========================================================================

    pub fn set_form(&self, form: T) {
        self.mutate(|s| s.form = form);
    }

    pub fn update_form(&self, f: impl FnOnce(&mut T)) {
        self.mutate(|s| f(&mut s.form));
    }

    pub fn reset_form(&self) {
        self.mutate(|s| s.form = T::default());
    }

    pub fn set_form_list(&self, form_list: Vec<T>) {
        self.mutate(|s| s.form_list = form_list);
    }

    pub fn set_table_pagination(&self, pagination: Pagination) {
        self.mutate(|s| s.table_pagination = pagination);
    }

    pub fn reset_table_pagination(&self) {
        self.mutate(|s| s.table_pagination = Pagination::default());
    }

    pub fn set_table_list_filter(&self, conditions: Vec<Condition>) {
        self.mutate(|s| s.table_list_filter = conditions);
    }

    /// Replace the conditions on `key`, keeping the others in order
    pub fn set_table_list_filter_by_key(&self, key: &str, conditions: Vec<Condition>) {
        self.mutate(|s| {
            s.table_list_filter.retain(|c| c.key != key);
            s.table_list_filter.extend(conditions.into_iter().map(|mut c| {
                c.key = key.to_string();
                c
            }));
        });
    }

    pub fn reset_table_list_filter_by_key(&self, key: &str) {
        self.mutate(|s| s.table_list_filter.retain(|c| c.key != key));
    }

    pub fn reset_table_list_filter(&self) {
        self.mutate(|s| s.table_list_filter.clear());
    }

    pub fn set_table_list_sort(&self, sort: Vec<Sort>) {
        self.mutate(|s| s.table_list_sort = sort);
    }

    pub fn reset_table_data(&self) {
        self.mutate(|s| {
            s.table_data.clear();
            s.table_total = 0;
        });
    }

    pub fn show_dialog(&self, key: DialogKey) {
        self.mutate(|s| s.dialog_visible_key = Some(key));
    }

    pub fn hide_dialog(&self) {
        self.mutate(|s| s.dialog_visible_key = None);
    }

    // ========================================================================
    // Remote operations
    // ========================================================================

    /// Fetch one record into `form`; bursts for the same id share one request
    pub async fn get_by_id(&self, id: &str) -> ApiResult<T> {
        let ticket = self.form_seq.begin();
        let form = self.fetch_by_id.call(id.to_string()).await?;
        if self.form_seq.try_apply(ticket) {
            let applied = form.clone();
            self.mutate(|s| s.form = applied);
        } else {
            log::debug!("{}: dropped stale form for {}", self.endpoint, id);
        }
        Ok(form)
    }

    /// The caller refreshes list/detail afterwards
    pub async fn create(&self, form: &T) -> ApiResult<T> {
        self.client.post(&self.endpoint, form).await
    }

    pub async fn update_by_id(&self, id: &str, form: &T) -> ApiResult<T> {
        self.client.put(&self.item_path(id), form).await
    }

    pub async fn delete_by_id(&self, id: &str) -> ApiResult<()> {
        self.client.delete(&self.item_path(id), None).await
    }

    /// Load the table page described by the current pagination, filter and sort
    pub async fn get_list(&self) -> ApiResult<ListData<T>> {
        let params = self.with_state(|s| s.list_params());
        self.get_list_with_params(params).await
    }

    pub async fn get_list_with_params(&self, params: ListParams) -> ApiResult<ListData<T>> {
        let ticket = self.list_seq.begin();
        self.mutate(|s| s.table_loading = true);

        let result = self.client.get_list::<T>(&self.endpoint, &params).await;
        let is_latest = ticket == self.list_seq.latest_issued();

        let mut list = match result {
            Ok(list) => list,
            Err(e) => {
                if is_latest {
                    self.mutate(|s| s.table_loading = false);
                }
                return Err(e);
            }
        };

        let size = params.pagination.size as usize;
        if !params.all && list.data.len() > size {
            log::warn!(
                "{}: backend returned {} rows for page size {}",
                self.endpoint,
                list.data.len(),
                size
            );
            list.data.truncate(size);
        }

        if self.list_seq.try_apply(ticket) {
            let applied = list.clone();
            self.mutate(|s| {
                s.table_data = applied.data;
                s.table_total = applied.total;
                if is_latest {
                    s.table_loading = false;
                }
            });
        } else {
            log::debug!("{}: dropped stale list response", self.endpoint);
        }
        Ok(list)
    }

    /// Whole collection for select options; meant for small reference tables
    pub async fn get_all_list(&self) -> ApiResult<Vec<T>> {
        let list = self
            .client
            .get_list::<T>(&self.endpoint, &ListParams::all())
            .await?;
        let all = list.data;
        let applied = all.clone();
        self.mutate(|s| s.all_list = applied);
        Ok(all)
    }

    pub async fn create_list(&self, forms: &[T]) -> ApiResult<Vec<T>> {
        let list = self.client.post_list::<_, T>(&self.batch_path(), forms).await?;
        Ok(list.data)
    }

    /// Apply `patch` to the listed `fields` of every record in `ids`
    pub async fn update_list(&self, ids: Vec<String>, patch: &Value, fields: Vec<String>) -> ApiResult<()> {
        let body = BatchRequest::update(ids, patch, fields);
        self.client.put(&self.batch_path(), &body).await
    }

    pub async fn delete_list(&self, ids: Vec<String>) -> ApiResult<()> {
        let body = serde_json::to_value(BatchRequest::ids(ids))
            .map_err(crate::shared::api_error::ApiError::decode)?;
        self.client.delete(&self.batch_path(), Some(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::api_error::ApiError;
    use crate::shared::testing::{json_response, ok_envelope, MockTransport, TokioSleeper};
    use crate::shared::transport::Method;
    use contracts::domain::a001_spider::aggregate::Spider;
    use contracts::shared::filter::FilterOp;
    use serde_json::json;
    use std::cell::Cell;

    fn store(mock: &Rc<MockTransport>) -> ResourceStore<Spider> {
        let client = ApiClient::new(mock.clone(), "http://localhost:8000/api");
        ResourceStore::with_debounce(client, Duration::from_millis(20), Rc::new(TokioSleeper))
    }

    fn spiders(names: &[&str]) -> Value {
        Value::Array(
            names
                .iter()
                .map(|n| json!({"_id": format!("id-{n}"), "name": n}))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_get_list_populates_table() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(
            Method::Get,
            "/spiders",
            json!({"status": "ok", "data": spiders(&["a", "b"]), "total": 2}),
        );
        let store = store(&mock);

        store.get_list().await.unwrap();

        store.with_state(|s| {
            assert_eq!(s.table_data.len(), 2);
            assert_eq!(s.table_data[1].name, "b");
            assert_eq!(s.table_total, 2);
            assert!(!s.table_loading);
        });
    }

    #[tokio::test]
    async fn test_table_never_exceeds_page_size() {
        let names: Vec<String> = (0..15).map(|i| format!("s{i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(
            Method::Get,
            "/spiders",
            json!({"status": "ok", "data": spiders(&refs), "total": 15}),
        );
        let store = store(&mock);
        store.set_table_pagination(Pagination { page: 1, size: 10 });

        let list = store.get_list().await.unwrap();

        assert_eq!(list.data.len(), 10);
        store.with_state(|s| {
            assert!(s.table_data.len() <= s.table_pagination.size as usize);
            assert_eq!(s.table_total, 15);
            assert_eq!(s.total_pages(), 2);
        });
    }

    #[tokio::test]
    async fn test_get_list_sends_filter_and_sort() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(Method::Get, "/spiders", json!({"status": "ok", "data": [], "total": 0}));
        let store = store(&mock);
        store.set_table_list_filter_by_key("name", vec![Condition::contains("ignored", "quo")]);
        store.set_table_list_sort(vec![Sort::desc("created_ts")]);
        store.set_table_pagination(Pagination { page: 2, size: 20 });

        store.get_list().await.unwrap();

        let request = &mock.requests_to(Method::Get, "/spiders")[0];
        assert_eq!(request.query_value("page"), Some("2"));
        assert_eq!(
            request.query_value("conditions"),
            Some(r#"[{"key":"name","op":"c","value":"quo"}]"#)
        );
        assert_eq!(
            request.query_value("sort"),
            Some(r#"[{"key":"created_ts","d":"desc"}]"#)
        );
    }

    #[tokio::test]
    async fn test_stale_list_response_is_discarded() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_delayed(
            Method::Get,
            "/spiders",
            |req| {
                if req.query_value("page") == Some("1") {
                    Duration::from_millis(60)
                } else {
                    Duration::ZERO
                }
            },
            |req| {
                let name = format!("page-{}", req.query_value("page").unwrap_or("?"));
                json_response(json!({"status": "ok", "data": [{"name": name}], "total": 2}))
            },
        );
        let store = store(&mock);

        let slow = store.get_list_with_params(ListParams::page(Pagination { page: 1, size: 1 }));
        let fast = store.get_list_with_params(ListParams::page(Pagination { page: 2, size: 1 }));
        let (slow, fast) = futures_util::join!(slow, fast);

        assert_eq!(slow.unwrap().data[0].name, "page-1");
        assert_eq!(fast.unwrap().data[0].name, "page-2");
        // The older request resolved last but must not overwrite the table
        store.with_state(|s| assert_eq!(s.table_data[0].name, "page-2"));
    }

    #[tokio::test]
    async fn test_get_by_id_debounced_and_replaces_form() {
        let mock = Rc::new(MockTransport::new());
        mock.respond(
            Method::Get,
            "/spiders/s1",
            ok_envelope(json!({"_id": "s1", "name": "quotes"})),
        );
        let store = store(&mock);
        store.update_form(|f| f.description = "draft".into());

        let results = futures_util::future::join_all(vec![
            store.get_by_id("s1"),
            store.get_by_id("s1"),
            store.get_by_id("s1"),
        ])
        .await;

        assert!(results.iter().all(|r| r.as_ref().map(|s| s.name.as_str()) == Ok("quotes")));
        assert_eq!(mock.requests_to(Method::Get, "/spiders/s1").len(), 1);
        store.with_state(|s| {
            assert_eq!(s.form.name, "quotes");
            // Replaced wholesale, not merged
            assert_eq!(s.form.description, "");
        });
    }

    #[tokio::test]
    async fn test_get_by_id_failure_keeps_form() {
        let mock = Rc::new(MockTransport::new());
        let store = store(&mock);
        store.set_form(Spider {
            name: "local".into(),
            ..Default::default()
        });

        let result = store.get_by_id("missing").await;

        assert!(matches!(result, Err(ApiError::Http { status: 404, .. })));
        assert_eq!(store.snapshot().form.name, "local");
    }

    #[tokio::test]
    async fn test_crud_paths() {
        let mock = Rc::new(MockTransport::new());
        mock.respond(Method::Post, "/spiders", ok_envelope(json!({"_id": "new", "name": "n"})));
        mock.respond(Method::Put, "/spiders/new", ok_envelope(json!({"_id": "new", "name": "m"})));
        mock.respond(Method::Delete, "/spiders/new", ok_envelope(Value::Null));
        let store = store(&mock);

        let form = Spider {
            name: "n".into(),
            ..Default::default()
        };
        let created = store.create(&form).await.unwrap();
        assert_eq!(created.id.as_deref(), Some("new"));

        let updated = store.update_by_id("new", &created).await.unwrap();
        assert_eq!(updated.name, "m");

        store.delete_by_id("new").await.unwrap();
        assert_eq!(mock.requests().len(), 3);
        assert_eq!(mock.requests()[0].json_body().unwrap()["name"], "n");
    }

    #[tokio::test]
    async fn test_batch_operations() {
        let mock = Rc::new(MockTransport::new());
        mock.respond(Method::Post, "/spiders/batch", ok_envelope(spiders(&["a", "b"])));
        mock.respond(Method::Put, "/spiders/batch", ok_envelope(Value::Null));
        mock.respond(Method::Delete, "/spiders/batch", ok_envelope(Value::Null));
        let store = store(&mock);

        let created = store
            .create_list(&[Spider::default(), Spider::default()])
            .await
            .unwrap();
        assert_eq!(created.len(), 2);

        store
            .update_list(vec!["a".into()], &json!({"priority": 7}), vec!["priority".into()])
            .await
            .unwrap();
        let put = &mock.requests_to(Method::Put, "/spiders/batch")[0];
        assert_eq!(put.json_body().unwrap()["data"], json!(r#"{"priority":7}"#));

        store.delete_list(vec!["a".into(), "b".into()]).await.unwrap();
        let delete = &mock.requests_to(Method::Delete, "/spiders/batch")[0];
        assert_eq!(delete.json_body(), Some(&json!({"ids": ["a", "b"]})));
    }

    #[tokio::test]
    async fn test_get_all_list() {
        let mock = Rc::new(MockTransport::new());
        mock.respond_json(
            Method::Get,
            "/spiders",
            json!({"status": "ok", "data": spiders(&["a", "b", "c"]), "total": 3}),
        );
        let store = store(&mock);

        store.get_all_list().await.unwrap();

        assert_eq!(store.snapshot().all_list.len(), 3);
        assert!(store.snapshot().table_data.is_empty());
        assert_eq!(mock.requests()[0].query_value("all"), Some("true"));
    }

    #[test]
    fn test_filter_by_key_and_dialog() {
        let store = store(&Rc::new(MockTransport::new()));
        let notified = Rc::new(Cell::new(0));
        let counter = notified.clone();
        store.subscribe(move |_| counter.set(counter.get() + 1));

        store.set_table_list_filter(vec![Condition::equal("status", "running")]);
        store.set_table_list_filter_by_key(
            "node_id",
            vec![Condition::new("", FilterOp::In, json!(["n1", "n2"]))],
        );
        store.set_table_list_filter_by_key("status", vec![Condition::equal("", "error")]);

        let keys: Vec<String> = store
            .snapshot()
            .table_list_filter
            .iter()
            .map(|c| format!("{}={}", c.key, c.value))
            .collect();
        assert_eq!(keys, vec![r#"node_id=["n1","n2"]"#, r#"status="error""#]);

        store.reset_table_list_filter_by_key("node_id");
        assert_eq!(store.snapshot().table_list_filter.len(), 1);

        store.show_dialog(DialogKey::Edit);
        assert_eq!(store.snapshot().dialog_visible_key, Some(DialogKey::Edit));
        store.hide_dialog();
        assert_eq!(store.snapshot().dialog_visible_key, None);

        assert_eq!(notified.get(), 6);
    }
}
