//! # Generic Data Service
//!
//! [`DataService`] is the contract typed services are written against.
//! [`RestDataService`] is its production implementation: it resolves hrefs
//! with a [`HalEndpoint`], goes through the shared [`RequestClient`] (and thus
//! the request cache), and decodes HAL JSON into `T`.

use std::marker::PhantomData;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::framework::options::HalPage;
use crate::framework::{
    FindListOptions, FrameworkError, HalEndpoint, PageInfo, PaginatedList, RemoteDataHandle,
    RequestClient, RestRequest, RestResource, SearchParam,
};

/// Generic access to one REST resource type.
///
/// Every method answers with an envelope handle; failures are reported inside
/// the envelope, never as an `Err`.
#[async_trait]
pub trait DataService<T: RestResource>: Send + Sync {
    async fn find_by_id(&self, id: &str) -> RemoteDataHandle<T>;

    async fn find_by_href(&self, href: &str) -> RemoteDataHandle<T>;

    /// Runs the named search endpoint with `options`.
    async fn search_by(&self, method: &str, options: FindListOptions) -> RemoteDataHandle<PaginatedList<T>>;

    /// Resolves the concrete href of a search.
    async fn get_search_by_href(&self, method: &str, options: &FindListOptions) -> Result<String, FrameworkError>;

    /// POSTs `object` to the collection endpoint with `params` as query arguments.
    async fn create(&self, object: T, params: Vec<SearchParam>) -> RemoteDataHandle<T>;

    async fn delete(&self, id: &str) -> RemoteDataHandle<()>;
}

/// [`DataService`] over the request cache.
#[derive(Clone)]
pub struct RestDataService<T: RestResource> {
    client: RequestClient,
    endpoint: HalEndpoint,
    _resource: PhantomData<fn() -> T>,
}

impl<T: RestResource> RestDataService<T> {
    pub fn new(client: RequestClient, endpoint: HalEndpoint) -> Self {
        Self {
            client,
            endpoint,
            _resource: PhantomData,
        }
    }

    fn collection(&self) -> String {
        self.endpoint.endpoint(T::LINK_PATH)
    }
}

#[async_trait]
impl<T: RestResource> DataService<T> for RestDataService<T> {
    #[instrument(skip(self), fields(resource = T::RESOURCE_TYPE))]
    async fn find_by_id(&self, id: &str) -> RemoteDataHandle<T> {
        let href = self.endpoint.id_href(T::LINK_PATH, id);
        self.find_by_href(&href).await
    }

    #[instrument(skip(self), fields(resource = T::RESOURCE_TYPE))]
    async fn find_by_href(&self, href: &str) -> RemoteDataHandle<T> {
        debug!("Sending request");
        match self.client.fetch(href.to_string()).await {
            Ok(handle) => handle.map_payload(decode_object::<T>),
            Err(e) => RemoteDataHandle::failed(e),
        }
    }

    #[instrument(skip(self, options), fields(resource = T::RESOURCE_TYPE))]
    async fn search_by(&self, method: &str, options: FindListOptions) -> RemoteDataHandle<PaginatedList<T>> {
        let href = match self.get_search_by_href(method, &options).await {
            Ok(href) => href,
            Err(e) => return RemoteDataHandle::failed(e),
        };
        debug!(%href, "Sending request");
        match self.client.fetch(href).await {
            Ok(handle) => handle.map_payload(decode_page::<T>),
            Err(e) => RemoteDataHandle::failed(e),
        }
    }

    async fn get_search_by_href(&self, method: &str, options: &FindListOptions) -> Result<String, FrameworkError> {
        self.endpoint.search_href(T::LINK_PATH, method, options)
    }

    #[instrument(skip(self, object), fields(resource = T::RESOURCE_TYPE))]
    async fn create(&self, object: T, params: Vec<SearchParam>) -> RemoteDataHandle<T> {
        let collection = self.collection();
        let prepared = serde_json::to_value(&object)
            .map_err(|e| FrameworkError::Decode(e.to_string()))
            .and_then(|body| {
                let href = HalEndpoint::list_href(&collection, &FindListOptions::with_search_params(params))?;
                Ok(RestRequest::post(href, body))
            });
        let request = match prepared {
            Ok(request) => request,
            Err(e) => return RemoteDataHandle::failed(e),
        };

        debug!(href = %request.href, "Sending request");
        match self.client.send(request, Some(collection)).await {
            Ok(handle) => handle.map_payload(decode_object::<T>),
            Err(e) => RemoteDataHandle::failed(e),
        }
    }

    #[instrument(skip(self), fields(resource = T::RESOURCE_TYPE))]
    async fn delete(&self, id: &str) -> RemoteDataHandle<()> {
        let request = RestRequest::delete(self.endpoint.id_href(T::LINK_PATH, id));
        debug!(href = %request.href, "Sending request");
        match self.client.send(request, Some(self.collection())).await {
            Ok(handle) => handle.map_payload(|_| Ok(())),
            Err(e) => RemoteDataHandle::failed(e),
        }
    }
}

/// Decodes a single HAL object, checking its `type` tag when present.
pub(crate) fn decode_object<T: RestResource>(value: Value) -> Result<T, String> {
    if let Some(found) = value.get("type").and_then(Value::as_str) {
        if found != T::RESOURCE_TYPE {
            return Err(format!(
                "Expected a {} but received a {found}",
                T::RESOURCE_TYPE
            ));
        }
    }
    serde_json::from_value(value)
        .map_err(|e| FrameworkError::Decode(format!("{}: {e}", T::RESOURCE_TYPE)).to_string())
}

/// Decodes a HAL collection page: `_embedded.{LINK_PATH}` plus `page`.
pub(crate) fn decode_page<T: RestResource>(value: Value) -> Result<PaginatedList<T>, String> {
    let items = match value.get("_embedded").and_then(|embedded| embedded.get(T::LINK_PATH)) {
        Some(Value::Array(items)) => items.clone(),
        Some(_) => {
            return Err(FrameworkError::Decode(format!("_embedded.{} is not an array", T::LINK_PATH)).to_string())
        }
        // empty pages come without _embedded
        None => Vec::new(),
    };

    let page = items
        .into_iter()
        .map(decode_object::<T>)
        .collect::<Result<Vec<T>, String>>()?;

    let page_info = match value.get("page") {
        Some(hal_page) => serde_json::from_value::<HalPage>(hal_page.clone())
            .map(PageInfo::from)
            .map_err(|e| FrameworkError::Decode(format!("page: {e}")).to_string())?,
        None => PageInfo {
            elements_per_page: page.len() as u32,
            total_elements: page.len() as u64,
            total_pages: 1,
            current_page: 1,
        },
    };

    Ok(PaginatedList::new(page_info, page))
}
