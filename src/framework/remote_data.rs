//! # Remote Data Envelope
//!
//! Every fetch in this crate answers with a [`RemoteDataHandle`]: an observable
//! view of a [`RemoteData`] envelope that moves through
//! `RequestPending -> ResponsePending -> Success | Error`.
//!
//! The handle is backed by a `tokio::sync::watch` channel, so many observers can
//! share one in-flight request and every one of them sees the same transitions.
//! Nothing here ever returns `Err` to the caller: failures are a state of the
//! envelope, to be inspected like any other.

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use crate::framework::FrameworkError;

/// Lifecycle of a single remote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Queued, nothing sent yet.
    RequestPending,
    /// Sent, waiting for the server.
    ResponsePending,
    Success,
    Error,
}

/// The envelope around a (possibly unfinished) remote fetch of `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteData<T> {
    pub state: RequestState,
    pub status_code: Option<u16>,
    pub error_message: Option<String>,
    pub payload: Option<T>,
    pub time_completed: Option<DateTime<Utc>>,
}

impl<T> RemoteData<T> {
    pub fn request_pending() -> Self {
        Self::in_state(RequestState::RequestPending)
    }

    pub fn response_pending() -> Self {
        Self::in_state(RequestState::ResponsePending)
    }

    fn in_state(state: RequestState) -> Self {
        Self {
            state,
            status_code: None,
            error_message: None,
            payload: None,
            time_completed: None,
        }
    }

    /// A completed, successful envelope.
    pub fn success(payload: T, status_code: u16) -> Self {
        Self {
            state: RequestState::Success,
            status_code: Some(status_code),
            error_message: None,
            payload: Some(payload),
            time_completed: Some(Utc::now()),
        }
    }

    /// A completed, failed envelope. `status_code` is `None` when no response
    /// was ever received (network failure, closed cache).
    pub fn failed(status_code: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            state: RequestState::Error,
            status_code,
            error_message: Some(message.into()),
            payload: None,
            time_completed: Some(Utc::now()),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.state,
            RequestState::RequestPending | RequestState::ResponsePending
        )
    }

    pub fn has_succeeded(&self) -> bool {
        self.state == RequestState::Success
    }

    pub fn has_failed(&self) -> bool {
        self.state == RequestState::Error
    }

    pub fn has_completed(&self) -> bool {
        !self.is_loading()
    }

    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Convert the payload, keeping state and metadata. A conversion failure
    /// turns the envelope into an `Error` carrying the message.
    pub fn try_map<U>(self, f: impl FnOnce(T) -> Result<U, String>) -> RemoteData<U> {
        let RemoteData {
            state,
            status_code,
            error_message,
            payload,
            time_completed,
        } = self;

        match payload.map(f) {
            Some(Ok(payload)) => RemoteData {
                state,
                status_code,
                error_message,
                payload: Some(payload),
                time_completed,
            },
            Some(Err(message)) => RemoteData {
                state: RequestState::Error,
                status_code,
                error_message: Some(message),
                payload: None,
                time_completed,
            },
            None => RemoteData {
                state,
                status_code,
                error_message,
                payload: None,
                time_completed,
            },
        }
    }
}

/// Observable handle to a [`RemoteData`] envelope.
///
/// Cloning a handle creates another observer of the same request.
#[derive(Debug, Clone)]
pub struct RemoteDataHandle<T> {
    receiver: watch::Receiver<RemoteData<T>>,
}

impl<T: Clone> RemoteDataHandle<T> {
    pub fn new(receiver: watch::Receiver<RemoteData<T>>) -> Self {
        Self { receiver }
    }

    /// A handle whose envelope will never change again.
    pub fn ready(data: RemoteData<T>) -> Self {
        let (_sender, receiver) = watch::channel(data);
        Self { receiver }
    }

    /// A completed `Error` handle describing a framework failure.
    pub fn failed(error: FrameworkError) -> Self {
        Self::ready(RemoteData::failed(None, error.to_string()))
    }

    /// Snapshot of the envelope as it is right now.
    pub fn current(&self) -> RemoteData<T> {
        self.receiver.borrow().clone()
    }

    /// Waits for the next transition. Returns `None` once the producer is gone.
    pub async fn changed(&mut self) -> Option<RemoteData<T>> {
        self.receiver.changed().await.ok()?;
        Some(self.receiver.borrow_and_update().clone())
    }

    /// Waits until the envelope reaches `Success` or `Error`.
    ///
    /// If the producer disappears first, the result is an `Error` envelope.
    pub async fn completed(&mut self) -> RemoteData<T> {
        let outcome = self
            .receiver
            .wait_for(|data| data.has_completed())
            .await
            .map(|data| (*data).clone());

        match outcome {
            Ok(data) => data,
            Err(_) => RemoteData::failed(None, FrameworkError::Abandoned.to_string()),
        }
    }
}

impl<T> RemoteDataHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Derives a handle of another payload type.
    ///
    /// A forwarding task follows every transition of `self` until the source
    /// closes or every observer of the derived handle is dropped.
    pub fn map_payload<U, F>(mut self, f: F) -> RemoteDataHandle<U>
    where
        U: Clone + Send + Sync + 'static,
        F: Fn(T) -> Result<U, String> + Send + Sync + 'static,
    {
        let initial = self.receiver.borrow_and_update().clone().try_map(&f);
        let (sender, receiver) = watch::channel(initial);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    changed = self.receiver.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let next = self.receiver.borrow_and_update().clone().try_map(&f);
                        if sender.send(next).is_err() {
                            break;
                        }
                    }
                    _ = sender.closed() => break,
                }
            }
        });

        RemoteDataHandle::new(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_helpers() {
        let pending = RemoteData::<u32>::response_pending();
        assert!(pending.is_loading());
        assert!(!pending.has_completed());

        let ok = RemoteData::success(7u32, 200);
        assert!(ok.has_succeeded());
        assert!(ok.has_completed());
        assert_eq!(ok.payload(), Some(&7));

        let failed = RemoteData::<u32>::failed(Some(404), "Not found");
        assert!(failed.has_failed());
        assert_eq!(failed.status_code, Some(404));
        assert_eq!(failed.error_message.as_deref(), Some("Not found"));
    }

    #[test]
    fn test_try_map_failure_becomes_error() {
        let data = RemoteData::success("x".to_string(), 200)
            .try_map(|_| Err::<u32, _>("bad payload".to_string()));
        assert!(data.has_failed());
        assert_eq!(data.status_code, Some(200));
        assert_eq!(data.error_message.as_deref(), Some("bad payload"));
        assert!(data.payload.is_none());
    }

    #[tokio::test]
    async fn test_handle_follows_transitions() {
        let (sender, receiver) = watch::channel(RemoteData::<u32>::response_pending());
        let mut handle = RemoteDataHandle::new(receiver);
        assert!(handle.current().is_loading());

        let waiter = tokio::spawn(async move { handle.completed().await });
        sender.send_replace(RemoteData::success(42, 200));

        let data = waiter.await.unwrap();
        assert_eq!(data.payload, Some(42));
    }

    #[tokio::test]
    async fn test_completed_when_producer_dropped() {
        let (sender, receiver) = watch::channel(RemoteData::<u32>::response_pending());
        let mut handle = RemoteDataHandle::new(receiver);
        drop(sender);

        let data = handle.completed().await;
        assert!(data.has_failed());
        assert_eq!(data.error_message.as_deref(), Some("Request abandoned before completion"));
    }

    #[tokio::test]
    async fn test_map_payload_forwards_transitions() {
        let (sender, receiver) = watch::channel(RemoteData::<u32>::response_pending());
        let mut mapped = RemoteDataHandle::new(receiver).map_payload(|n| Ok(n.to_string()));
        assert!(mapped.current().is_loading());

        sender.send_replace(RemoteData::success(5, 200));
        let data = mapped.completed().await;
        assert_eq!(data.payload.as_deref(), Some("5"));
        assert_eq!(data.status_code, Some(200));
    }
}
