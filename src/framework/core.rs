//! # Core Request Framework
//!
//! This module defines the generic building blocks behind every typed service.
//!
//! ## Key Types
//!
//! - [`RestResource`]: The trait that all REST resource types must implement.
//! - [`RequestActor`]: The actor that owns the request cache.
//! - [`RequestClient`]: The cloneable handle used to talk to it.
//! - [`CacheRequest`]: The messages they exchange.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::framework::{
    FrameworkError, RemoteData, RemoteDataHandle, RestRequest, RestResponse, RestTransport,
};

// =============================================================================
// 1. THE ABSTRACTION
// =============================================================================

/// Trait that any resource type must implement to be served by a
/// [`RestDataService`](crate::framework::RestDataService).
///
/// # Architecture Note
/// The data layer is written *once*, against this contract. A resource only
/// has to say where it lives (`LINK_PATH`) and how the server tags it
/// (`RESOURCE_TYPE`); serde does the rest.
pub trait RestResource: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Value of the HAL `type` field, e.g. `"resourcepolicy"`.
    const RESOURCE_TYPE: &'static str;

    /// Link path of the collection, also the `_embedded` key of its pages.
    const LINK_PATH: &'static str;
}

impl RemoteData<Value> {
    /// Folds a raw transport response into a completed envelope.
    pub fn from_response(response: RestResponse) -> Self {
        if response.is_success() {
            let status = response.status_code;
            RemoteData::success(response.body.unwrap_or(Value::Null), status)
        } else {
            RemoteData::failed(Some(response.status_code), response.error_message())
        }
    }
}

// =============================================================================
// 2. THE MESSAGES
// =============================================================================

/// Type alias for the one-shot response channel used by the request actor.
pub type Reply<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Shared slot of one request. Every observer subscribes to it.
struct Entry {
    sender: watch::Sender<RemoteData<Value>>,
    completed_at: OnceLock<Instant>,
}

impl Entry {
    fn new() -> (Arc<Self>, watch::Receiver<RemoteData<Value>>) {
        let (sender, receiver) = watch::channel(RemoteData::request_pending());
        let entry = Arc::new(Self {
            sender,
            completed_at: OnceLock::new(),
        });
        (entry, receiver)
    }

    /// Completed at least `ttl` before `now`. Pending entries never expire.
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.completed_at
            .get()
            .is_some_and(|at| now.saturating_duration_since(*at) >= ttl)
    }

    fn complete(&self, outcome: RemoteData<Value>) {
        let _ = self.completed_at.set(Instant::now());
        self.sender.send_replace(outcome);
    }
}

/// Messages understood by [`RequestActor`].
#[derive(Debug)]
pub enum CacheRequest {
    /// Cached GET. At most one fetch per href is ever in flight.
    Fetch {
        href: String,
        respond_to: Reply<RemoteDataHandle<Value>>,
    },
    /// Uncached request (POST, DELETE, ...). On success, every cached href
    /// containing `invalidate` is dropped before the result is published.
    Send {
        request: RestRequest,
        invalidate: Option<String>,
        respond_to: Reply<RemoteDataHandle<Value>>,
    },
    /// Drops every cached href containing `href_substring`.
    Invalidate {
        href_substring: String,
        respond_to: Reply<usize>,
    },
}

// =============================================================================
// 3. THE REQUEST ACTOR
// =============================================================================

/// Owns the request cache and dispatches transport calls.
///
/// # Concurrency Model
/// The cache is only touched from inside [`run`](RequestActor::run), one
/// message at a time, so it needs no lock. Transport calls run in their own
/// tasks and publish straight into the entry's `watch` channel; a finished
/// mutation reports back through a weak sender so that it never keeps the
/// actor alive on its own.
///
/// Completed entries live for `ttl`. Expired ones are swept on every fetch.
pub struct RequestActor<R: RestTransport> {
    receiver: mpsc::Receiver<CacheRequest>,
    loopback: mpsc::WeakSender<CacheRequest>,
    transport: Arc<R>,
    ttl: Duration,
    cache: HashMap<String, Arc<Entry>>,
}

impl<R: RestTransport> RequestActor<R> {
    pub fn new(buffer_size: usize, ttl: Duration, transport: R) -> (Self, RequestClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            loopback: sender.downgrade(),
            transport: Arc::new(transport),
            ttl,
            cache: HashMap::new(),
        };
        (actor, RequestClient::new(sender))
    }

    /// Runs the actor's event loop until every [`RequestClient`] is dropped.
    pub async fn run(mut self) {
        info!("Request cache started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                CacheRequest::Fetch { href, respond_to } => {
                    let handle = self.fetch(href);
                    let _ = respond_to.send(Ok(handle));
                }
                CacheRequest::Send {
                    request,
                    invalidate,
                    respond_to,
                } => {
                    debug!(method = request.method.as_str(), href = %request.href, "Send");
                    let (entry, receiver) = Entry::new();
                    self.dispatch(request, entry, invalidate);
                    let _ = respond_to.send(Ok(RemoteDataHandle::new(receiver)));
                }
                CacheRequest::Invalidate {
                    href_substring,
                    respond_to,
                } => {
                    let before = self.cache.len();
                    self.cache.retain(|href, _| !href.contains(&href_substring));
                    let removed = before - self.cache.len();
                    info!(%href_substring, removed, size = self.cache.len(), "Invalidated");
                    let _ = respond_to.send(Ok(removed));
                }
            }
        }

        info!(size = self.cache.len(), "Shutdown");
    }

    fn fetch(&mut self, href: String) -> RemoteDataHandle<Value> {
        self.evict_expired();

        if let Some(entry) = self.cache.get(&href) {
            // failed entries are retried, everything else is shared
            if !entry.sender.borrow().has_failed() {
                debug!(%href, "Cache hit");
                return RemoteDataHandle::new(entry.sender.subscribe());
            }
            debug!(%href, "Retrying failed request");
        }

        let (entry, receiver) = Entry::new();
        self.cache.insert(href.clone(), entry.clone());
        debug!(%href, size = self.cache.len(), "Fetch");
        self.dispatch(RestRequest::get(href), entry, None);
        RemoteDataHandle::new(receiver)
    }

    fn evict_expired(&mut self) {
        let (ttl, now) = (self.ttl, Instant::now());
        let before = self.cache.len();
        self.cache.retain(|_, entry| !entry.is_expired(ttl, now));
        let evicted = before - self.cache.len();
        if evicted > 0 {
            debug!(evicted, size = self.cache.len(), "Evicted expired entries");
        }
    }

    fn dispatch(&self, request: RestRequest, entry: Arc<Entry>, invalidate: Option<String>) {
        let transport = self.transport.clone();
        let loopback = self.loopback.clone();

        tokio::spawn(async move {
            let href = request.href.clone();
            let method = request.method.as_str();
            entry.sender.send_replace(RemoteData::response_pending());

            let outcome = match transport.execute(request).await {
                Ok(response) => RemoteData::from_response(response),
                Err(e) => RemoteData::failed(None, e.to_string()),
            };

            match (&outcome.status_code, &outcome.error_message) {
                (status, Some(error)) => warn!(method, %href, ?status, %error, "Request failed"),
                (status, None) => info!(method, %href, ?status, "Request ok"),
            }

            if let (true, Some(href_substring)) = (outcome.has_succeeded(), invalidate) {
                if let Some(sender) = loopback.upgrade() {
                    let (respond_to, _) = oneshot::channel();
                    let _ = sender
                        .send(CacheRequest::Invalidate {
                            href_substring,
                            respond_to,
                        })
                        .await;
                }
            }

            entry.complete(outcome);
        });
    }
}

// =============================================================================
// 4. THE CLIENT
// =============================================================================

/// A cloneable client for the [`RequestActor`].
#[derive(Clone)]
pub struct RequestClient {
    sender: mpsc::Sender<CacheRequest>,
}

impl RequestClient {
    pub fn new(sender: mpsc::Sender<CacheRequest>) -> Self {
        Self { sender }
    }

    pub async fn fetch(&self, href: String) -> Result<RemoteDataHandle<Value>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Fetch { href, respond_to })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn send(
        &self,
        request: RestRequest,
        invalidate: Option<String>,
    ) -> Result<RemoteDataHandle<Value>, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Send {
                request,
                invalidate,
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }

    pub async fn invalidate(&self, href_substring: impl Into<String>) -> Result<usize, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(CacheRequest::Invalidate {
                href_substring: href_substring.into(),
                respond_to,
            })
            .await
            .map_err(|_| FrameworkError::ActorClosed)?;
        response.await.map_err(|_| FrameworkError::ActorDropped)?
    }
}
