use crate::framework::{DataService, RemoteDataHandle, RestResource};
use async_trait::async_trait;

/// Trait for resource-specific services to inherit the standard lookups.
///
/// This trait reduces boilerplate by providing default implementations for
/// `find_by_id`, `find_by_href` and `delete`, each a straight pass-through to
/// the underlying [`DataService`].
#[async_trait]
pub trait DataClient<T: RestResource>: Send + Sync {
    /// The generic data service this client delegates to.
    type Service: DataService<T>;

    /// Access the inner generic service.
    fn data_service(&self) -> &Self::Service;

    /// Fetch a resource by identifier.
    #[tracing::instrument(skip(self))]
    async fn find_by_id(&self, id: &str) -> RemoteDataHandle<T> {
        tracing::debug!("Sending request");
        self.data_service().find_by_id(id).await
    }

    /// Fetch a resource by its direct href.
    #[tracing::instrument(skip(self))]
    async fn find_by_href(&self, href: &str) -> RemoteDataHandle<T> {
        tracing::debug!("Sending request");
        self.data_service().find_by_href(href).await
    }

    /// Delete a resource by identifier.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: &str) -> RemoteDataHandle<()> {
        tracing::debug!("Sending request");
        self.data_service().delete(id).await
    }
}
