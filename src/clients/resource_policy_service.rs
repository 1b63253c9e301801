use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::clients::data_client::DataClient;
use crate::framework::{
    DataService, FindListOptions, PaginatedList, RemoteDataHandle, RestDataService, SearchParam,
};
use crate::model::{ActionType, ResourcePolicy};

/// Search endpoint scoped by person.
pub const SEARCH_BY_EPERSON_METHOD: &str = "eperson";
/// Search endpoint scoped by group.
pub const SEARCH_BY_GROUP_METHOD: &str = "group";
/// Search endpoint scoped by protected resource.
pub const SEARCH_BY_RESOURCE_METHOD: &str = "resource";

/// Typed access to resource policies.
///
/// Every search is a pure translation step: build one [`FindListOptions`],
/// forward it to the data service, hand back its envelope untouched. Caching,
/// de-duplication and error reporting all live below, in the [`DataService`].
#[derive(Clone)]
pub struct ResourcePolicyService<D = RestDataService<ResourcePolicy>> {
    data_service: D,
}

impl<D: DataService<ResourcePolicy>> ResourcePolicyService<D> {
    pub fn new(data_service: D) -> Self {
        Self { data_service }
    }

    /// Policies held by a person, optionally limited to one resource.
    #[instrument(skip(self))]
    pub async fn search_by_eperson(
        &self,
        eperson_id: &str,
        resource_id: Option<&str>,
    ) -> RemoteDataHandle<PaginatedList<ResourcePolicy>> {
        let options = scoped_options(eperson_id, non_empty(resource_id).map(|id| ("resource", id.to_string())));
        debug!(?options, "Sending request");
        self.data_service
            .search_by(SEARCH_BY_EPERSON_METHOD, options)
            .await
    }

    /// Policies held by a group, optionally limited to one resource.
    #[instrument(skip(self))]
    pub async fn search_by_group(
        &self,
        group_id: &str,
        resource_id: Option<&str>,
    ) -> RemoteDataHandle<PaginatedList<ResourcePolicy>> {
        let options = scoped_options(group_id, non_empty(resource_id).map(|id| ("resource", id.to_string())));
        debug!(?options, "Sending request");
        self.data_service
            .search_by(SEARCH_BY_GROUP_METHOD, options)
            .await
    }

    /// Policies protecting a resource, optionally limited to one action.
    #[instrument(skip(self))]
    pub async fn search_by_resource(
        &self,
        resource_id: &str,
        action: Option<ActionType>,
    ) -> RemoteDataHandle<PaginatedList<ResourcePolicy>> {
        let options = scoped_options(resource_id, action.map(|a| ("action", a.as_str().to_string())));
        debug!(?options, "Sending request");
        self.data_service
            .search_by(SEARCH_BY_RESOURCE_METHOD, options)
            .await
    }

    /// Stores a new policy on `resource_id`, granted to a person or else a group.
    ///
    /// When both are given only the person is sent.
    #[instrument(skip(self, policy))]
    pub async fn create(
        &self,
        policy: ResourcePolicy,
        resource_id: &str,
        eperson_id: Option<&str>,
        group_id: Option<&str>,
    ) -> RemoteDataHandle<ResourcePolicy> {
        let mut params = vec![SearchParam::new("resource", resource_id)];
        if let Some(eperson_id) = non_empty(eperson_id) {
            params.push(SearchParam::new("eperson", eperson_id));
        } else if let Some(group_id) = non_empty(group_id) {
            params.push(SearchParam::new("group", group_id));
        }
        debug!(?policy, ?params, "Sending request");
        self.data_service.create(policy, params).await
    }
}

#[async_trait]
impl<D: DataService<ResourcePolicy>> DataClient<ResourcePolicy> for ResourcePolicyService<D> {
    type Service = D;

    fn data_service(&self) -> &D {
        &self.data_service
    }
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|id| !id.is_empty())
}

/// `[uuid=primary]`, then the optional filter.
fn scoped_options(primary: &str, filter: Option<(&str, String)>) -> FindListOptions {
    let mut search_params = vec![SearchParam::new("uuid", primary)];
    if let Some((field, value)) = filter {
        search_params.push(SearchParam::new(field, value));
    }
    FindListOptions::with_search_params(search_params)
}
