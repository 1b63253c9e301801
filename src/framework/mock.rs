//! # Mock Framework
//!
//! Utilities for testing services in isolation.
//!
//! - [`MockDataService`] stands in for a [`DataService`]: queue expectations with
//!   the builder API, run the code under test, then inspect [`MockDataService::calls`]
//!   to assert exactly what was forwarded, and [`MockDataService::verify`] that
//!   every expectation was consumed.
//! - [`InMemoryTransport`] stands in for the network below a real
//!   [`RequestActor`](crate::framework::RequestActor), with canned responses
//!   and a call log.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::framework::{
    DataService, FindListOptions, FrameworkError, PaginatedList, RemoteData, RemoteDataHandle,
    RestMethod, RestRequest, RestResource, RestResponse, RestTransport, SearchParam,
};

// =============================================================================
// RECORDED CALLS
// =============================================================================

/// A call received by [`MockDataService`], arguments captured verbatim.
#[derive(Debug, Clone, PartialEq)]
pub enum DataServiceCall {
    FindById(String),
    FindByHref(String),
    SearchBy {
        method: String,
        options: FindListOptions,
    },
    GetSearchByHref {
        method: String,
        options: FindListOptions,
    },
    Create {
        object: Value,
        params: Vec<SearchParam>,
    },
    Delete(String),
}

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// Represents an expected call to the mock service and its canned answer.
enum Expectation<T> {
    FindById {
        id: String,
        response: RemoteData<T>,
    },
    FindByHref {
        href: String,
        response: RemoteData<T>,
    },
    SearchBy {
        method: String,
        response: RemoteData<PaginatedList<T>>,
    },
    Create {
        response: RemoteData<T>,
    },
    Delete {
        id: String,
        response: RemoteData<()>,
    },
}

/// A fake [`DataService`] with expectation tracking for fluent testing.
///
/// Clones share state, so a test can keep one copy while the service under
/// test owns another.
///
/// # Example
/// ```ignore
/// let mock = MockDataService::<ResourcePolicy>::new();
/// mock.expect_find_by_id("1").return_ok(policy);
///
/// let service = ResourcePolicyService::new(mock.clone());
/// service.find_by_id("1").await;
///
/// assert_eq!(mock.calls(), vec![DataServiceCall::FindById("1".into())]);
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockDataService<T> {
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
    calls: Arc<Mutex<Vec<DataServiceCall>>>,
    search_href: Arc<Mutex<Option<String>>>,
}

impl<T> Clone for MockDataService<T> {
    fn clone(&self) -> Self {
        Self {
            expectations: self.expectations.clone(),
            calls: self.calls.clone(),
            search_href: self.search_href.clone(),
        }
    }
}

impl<T: RestResource> Default for MockDataService<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: RestResource> MockDataService<T> {
    /// Creates a new mock service with no expectations.
    pub fn new() -> Self {
        Self {
            expectations: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            search_href: Arc::new(Mutex::new(None)),
        }
    }

    /// Expects a `find_by_id` call.
    pub fn expect_find_by_id(&self, id: impl Into<String>) -> ExpectationBuilder<T, T> {
        let id = id.into();
        self.builder(move |response| Expectation::FindById { id, response })
    }

    /// Expects a `find_by_href` call.
    pub fn expect_find_by_href(&self, href: impl Into<String>) -> ExpectationBuilder<T, T> {
        let href = href.into();
        self.builder(move |response| Expectation::FindByHref { href, response })
    }

    /// Expects a `search_by` call on the named search method.
    pub fn expect_search_by(&self, method: impl Into<String>) -> ExpectationBuilder<T, PaginatedList<T>> {
        let method = method.into();
        self.builder(move |response| Expectation::SearchBy { method, response })
    }

    /// Expects a `create` call.
    pub fn expect_create(&self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Create { response })
    }

    /// Expects a `delete` call.
    pub fn expect_delete(&self, id: impl Into<String>) -> ExpectationBuilder<T, ()> {
        let id = id.into();
        self.builder(move |response| Expectation::Delete { id, response })
    }

    /// Fixes the href answered by `get_search_by_href`.
    pub fn with_search_href(self, href: impl Into<String>) -> Self {
        *self.search_href.lock().unwrap() = Some(href.into());
        self
    }

    fn builder<P>(
        &self,
        make: impl FnOnce(RemoteData<P>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, P> {
        ExpectationBuilder {
            make: Box::new(make),
            expectations: self.expectations.clone(),
        }
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<DataServiceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn record(&self, call: DataServiceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next(&self) -> Option<Expectation<T>> {
        self.expectations.lock().unwrap().pop_front()
    }
}

/// Builder finishing an expectation with its canned envelope.
pub struct ExpectationBuilder<T, P> {
    make: Box<dyn FnOnce(RemoteData<P>) -> Expectation<T> + Send>,
    expectations: Arc<Mutex<VecDeque<Expectation<T>>>>,
}

impl<T, P> ExpectationBuilder<T, P> {
    /// Answers with a successful envelope (status 200).
    pub fn return_ok(self, payload: P) {
        self.return_remote_data(RemoteData::success(payload, 200));
    }

    /// Answers with a failed envelope.
    pub fn return_err(self, status_code: u16, message: impl Into<String>) {
        self.return_remote_data(RemoteData::failed(Some(status_code), message));
    }

    /// Answers with exactly this envelope.
    pub fn return_remote_data(self, response: RemoteData<P>) {
        let expectation = (self.make)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

#[async_trait]
impl<T: RestResource> DataService<T> for MockDataService<T> {
    async fn find_by_id(&self, id: &str) -> RemoteDataHandle<T> {
        self.record(DataServiceCall::FindById(id.to_string()));
        match self.next() {
            Some(Expectation::FindById { id: expected, response }) => {
                assert_eq!(expected, id, "find_by_id called with unexpected id");
                RemoteDataHandle::ready(response)
            }
            _ => panic!("Unexpected request or expectation mismatch: find_by_id({id})"),
        }
    }

    async fn find_by_href(&self, href: &str) -> RemoteDataHandle<T> {
        self.record(DataServiceCall::FindByHref(href.to_string()));
        match self.next() {
            Some(Expectation::FindByHref { href: expected, response }) => {
                assert_eq!(expected, href, "find_by_href called with unexpected href");
                RemoteDataHandle::ready(response)
            }
            _ => panic!("Unexpected request or expectation mismatch: find_by_href({href})"),
        }
    }

    async fn search_by(&self, method: &str, options: FindListOptions) -> RemoteDataHandle<PaginatedList<T>> {
        self.record(DataServiceCall::SearchBy {
            method: method.to_string(),
            options,
        });
        match self.next() {
            Some(Expectation::SearchBy { method: expected, response }) => {
                assert_eq!(expected, method, "search_by called with unexpected method");
                RemoteDataHandle::ready(response)
            }
            _ => panic!("Unexpected request or expectation mismatch: search_by({method})"),
        }
    }

    async fn get_search_by_href(&self, method: &str, options: &FindListOptions) -> Result<String, FrameworkError> {
        self.record(DataServiceCall::GetSearchByHref {
            method: method.to_string(),
            options: options.clone(),
        });
        let fixed = self.search_href.lock().unwrap().clone();
        Ok(fixed.unwrap_or_else(|| format!("mock://{}/search/{method}", T::LINK_PATH)))
    }

    async fn create(&self, object: T, params: Vec<SearchParam>) -> RemoteDataHandle<T> {
        let object = serde_json::to_value(&object).unwrap_or(Value::Null);
        self.record(DataServiceCall::Create { object, params });
        match self.next() {
            Some(Expectation::Create { response }) => RemoteDataHandle::ready(response),
            _ => panic!("Unexpected request or expectation mismatch: create"),
        }
    }

    async fn delete(&self, id: &str) -> RemoteDataHandle<()> {
        self.record(DataServiceCall::Delete(id.to_string()));
        match self.next() {
            Some(Expectation::Delete { id: expected, response }) => {
                assert_eq!(expected, id, "delete called with unexpected id");
                RemoteDataHandle::ready(response)
            }
            _ => panic!("Unexpected request or expectation mismatch: delete({id})"),
        }
    }
}

// =============================================================================
// IN-MEMORY TRANSPORT
// =============================================================================

/// A [`RestTransport`] answering from a route table.
///
/// Unrouted requests answer `404 Not Found`. Clones share routes and log.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    routes: Arc<Mutex<HashMap<(RestMethod, String), RestResponse>>>,
    log: Arc<Mutex<Vec<RestRequest>>>,
    delay: Option<Duration>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every answer, to keep requests in flight for a while.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Routes `method href` to a response, replacing any previous route.
    pub fn respond(&self, method: RestMethod, href: impl Into<String>, status_code: u16, body: Option<Value>) {
        let status_text = match status_code {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "",
        };
        self.routes.lock().unwrap().insert(
            (method, href.into()),
            RestResponse::new(status_code, status_text, body),
        );
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<RestRequest> {
        self.log.lock().unwrap().clone()
    }

    pub fn calls_to(&self, href: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|r| r.href == href).count()
    }
}

#[async_trait]
impl RestTransport for InMemoryTransport {
    async fn execute(&self, request: RestRequest) -> Result<RestResponse, FrameworkError> {
        self.log.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let response = self
            .routes
            .lock()
            .unwrap()
            .get(&(request.method, request.href.clone()))
            .cloned();
        Ok(response.unwrap_or_else(|| RestResponse::new(404, "Not Found", None)))
    }
}
