use policy_access::clients::{
    DataClient, ResourcePolicyService, SEARCH_BY_EPERSON_METHOD, SEARCH_BY_GROUP_METHOD,
    SEARCH_BY_RESOURCE_METHOD,
};
use policy_access::framework::mock::{DataServiceCall, MockDataService};
use policy_access::framework::{FindListOptions, PageInfo, PaginatedList, RemoteData, SearchParam};
use policy_access::model::{ActionType, HalLink, PolicyType, ResourcePolicy, ResourcePolicyLinks};

const REQUEST_URL: &str = "https://rest.api/rest/api/resourcepolicies/1";
const RESOURCE_POLICY_ID: &str = "1";
const EPERSON_UUID: &str = "8b39g7ya-5a4b-438b-9686-be1d5b4a1c5a";
const GROUP_UUID: &str = "8b39g7ya-5a4b-36987-9686-be1d5b4a1c5a";
const RESOURCE_UUID: &str = "8b39g7ya-5a4b-438b-851f-be1d5b4a1c5a";

fn policy(id: &str, action: ActionType) -> ResourcePolicy {
    let mut policy = ResourcePolicy::new(id, action).with_policy_type(PolicyType::Submission);
    policy.uuid = Some(format!("resource-policy-{id}"));
    policy.links = ResourcePolicyLinks {
        eperson: Some(HalLink { href: "https://rest.api/rest/api/eperson".into() }),
        group: Some(HalLink { href: "https://rest.api/rest/api/group".into() }),
        self_link: Some(HalLink { href: REQUEST_URL.into() }),
    };
    policy
}

fn paginated_list() -> PaginatedList<ResourcePolicy> {
    PaginatedList::new(
        PageInfo::default(),
        vec![policy("1", ActionType::Read), policy("2", ActionType::Write)],
    )
}

fn search_call(method: &str, params: Vec<SearchParam>) -> DataServiceCall {
    DataServiceCall::SearchBy {
        method: method.to_string(),
        options: FindListOptions::with_search_params(params),
    }
}

#[tokio::test]
async fn test_find_by_id_proxies_to_data_service() {
    let mock = MockDataService::new();
    let expected = RemoteData::success(policy("1", ActionType::Read), 200);
    mock.expect_find_by_id(RESOURCE_POLICY_ID).return_remote_data(expected.clone());
    let service = ResourcePolicyService::new(mock.clone());

    let result = service.find_by_id(RESOURCE_POLICY_ID).await;

    assert_eq!(mock.calls(), vec![DataServiceCall::FindById(RESOURCE_POLICY_ID.to_string())]);
    assert_eq!(result.current(), expected);
    mock.verify();
}

#[tokio::test]
async fn test_find_by_href_proxies_to_data_service() {
    let mock = MockDataService::new();
    let expected = RemoteData::success(policy("1", ActionType::Read), 200);
    mock.expect_find_by_href(REQUEST_URL).return_remote_data(expected.clone());
    let service = ResourcePolicyService::new(mock.clone());

    let mut result = service.find_by_href(REQUEST_URL).await;

    assert_eq!(mock.calls(), vec![DataServiceCall::FindByHref(REQUEST_URL.to_string())]);
    // the payload comes back field for field
    assert_eq!(result.completed().await.payload, Some(policy("1", ActionType::Read)));
    mock.verify();
}

#[tokio::test]
async fn test_search_by_eperson() {
    let mock = MockDataService::new();
    mock.expect_search_by(SEARCH_BY_EPERSON_METHOD).return_ok(paginated_list());
    mock.expect_search_by(SEARCH_BY_EPERSON_METHOD).return_ok(paginated_list());
    let service = ResourcePolicyService::new(mock.clone());

    service.search_by_eperson(EPERSON_UUID, None).await;
    let result = service.search_by_eperson(EPERSON_UUID, Some(RESOURCE_UUID)).await;

    assert_eq!(
        mock.calls(),
        vec![
            search_call(SEARCH_BY_EPERSON_METHOD, vec![SearchParam::new("uuid", EPERSON_UUID)]),
            search_call(
                SEARCH_BY_EPERSON_METHOD,
                vec![
                    SearchParam::new("uuid", EPERSON_UUID),
                    SearchParam::new("resource", RESOURCE_UUID),
                ]
            ),
        ]
    );
    assert_eq!(result.current().payload, Some(paginated_list()));
    mock.verify();
}

#[tokio::test]
async fn test_search_by_group() {
    let mock = MockDataService::new();
    mock.expect_search_by(SEARCH_BY_GROUP_METHOD).return_ok(paginated_list());
    mock.expect_search_by(SEARCH_BY_GROUP_METHOD).return_ok(paginated_list());
    let service = ResourcePolicyService::new(mock.clone());

    let result = service.search_by_group(GROUP_UUID, None).await;
    service.search_by_group(GROUP_UUID, Some(RESOURCE_UUID)).await;

    assert_eq!(
        mock.calls(),
        vec![
            search_call(SEARCH_BY_GROUP_METHOD, vec![SearchParam::new("uuid", GROUP_UUID)]),
            search_call(
                SEARCH_BY_GROUP_METHOD,
                vec![
                    SearchParam::new("uuid", GROUP_UUID),
                    SearchParam::new("resource", RESOURCE_UUID),
                ]
            ),
        ]
    );
    assert!(result.current().has_succeeded());
    mock.verify();
}

#[tokio::test]
async fn test_search_by_resource() {
    let mock = MockDataService::new();
    mock.expect_search_by(SEARCH_BY_RESOURCE_METHOD).return_ok(paginated_list());
    mock.expect_search_by(SEARCH_BY_RESOURCE_METHOD).return_ok(paginated_list());
    let service = ResourcePolicyService::new(mock.clone());

    let result = service.search_by_resource(RESOURCE_UUID, None).await;
    service.search_by_resource(RESOURCE_UUID, Some(ActionType::Read)).await;

    assert_eq!(
        mock.calls(),
        vec![
            search_call(SEARCH_BY_RESOURCE_METHOD, vec![SearchParam::new("uuid", RESOURCE_UUID)]),
            search_call(
                SEARCH_BY_RESOURCE_METHOD,
                vec![
                    SearchParam::new("uuid", RESOURCE_UUID),
                    SearchParam::new("action", "READ"),
                ]
            ),
        ]
    );
    assert_eq!(result.current().payload.map(|list| list.len()), Some(2));
    mock.verify();
}

#[tokio::test]
async fn test_identical_searches_build_equal_options() {
    let mock = MockDataService::new();
    mock.expect_search_by(SEARCH_BY_RESOURCE_METHOD).return_ok(paginated_list());
    mock.expect_search_by(SEARCH_BY_RESOURCE_METHOD).return_ok(paginated_list());
    let service = ResourcePolicyService::new(mock.clone());

    service.search_by_resource("res-1", Some(ActionType::Read)).await;
    service.search_by_resource("res-1", Some(ActionType::Read)).await;

    let calls = mock.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
    assert_eq!(
        calls[0],
        search_call(
            SEARCH_BY_RESOURCE_METHOD,
            vec![SearchParam::new("uuid", "res-1"), SearchParam::new("action", "READ")]
        )
    );
}

#[tokio::test]
async fn test_failed_envelope_is_passed_through() {
    let mock = MockDataService::<ResourcePolicy>::new();
    mock.expect_find_by_id("missing").return_err(404, "Not Found");
    let service = ResourcePolicyService::new(mock.clone());

    let data = service.find_by_id("missing").await.current();

    assert!(data.has_failed());
    assert_eq!(data.status_code, Some(404));
    assert_eq!(data.error_message.as_deref(), Some("Not Found"));
    mock.verify();
}

#[tokio::test]
async fn test_create_and_delete() {
    let mock = MockDataService::new();
    mock.expect_create().return_ok(policy("3", ActionType::Admin));
    mock.expect_delete("3").return_ok(());
    let service = ResourcePolicyService::new(mock.clone());

    let draft = ResourcePolicy::new("", ActionType::Admin);
    let created = service
        .create(draft.clone(), RESOURCE_UUID, None, Some(GROUP_UUID))
        .await
        .current();
    assert_eq!(created.payload.map(|p| p.id), Some("3".to_string()));

    let deleted = service.delete("3").await.current();
    assert!(deleted.has_succeeded());

    assert_eq!(
        mock.calls(),
        vec![
            DataServiceCall::Create {
                object: serde_json::to_value(&draft).unwrap(),
                params: vec![
                    SearchParam::new("resource", RESOURCE_UUID),
                    SearchParam::new("group", GROUP_UUID),
                ],
            },
            DataServiceCall::Delete("3".to_string()),
        ]
    );
    mock.verify();
}

#[tokio::test]
async fn test_create_prefers_eperson_over_group() {
    let mock = MockDataService::new();
    mock.expect_create().return_ok(policy("4", ActionType::Read));
    let service = ResourcePolicyService::new(mock.clone());

    let draft = ResourcePolicy::new("", ActionType::Read);
    service
        .create(draft.clone(), RESOURCE_UUID, Some(EPERSON_UUID), Some(GROUP_UUID))
        .await;

    assert_eq!(
        mock.calls(),
        vec![DataServiceCall::Create {
            object: serde_json::to_value(&draft).unwrap(),
            params: vec![
                SearchParam::new("resource", RESOURCE_UUID),
                SearchParam::new("eperson", EPERSON_UUID),
            ],
        }]
    );
    mock.verify();
}

#[tokio::test]
async fn test_empty_optional_ids_are_ignored() {
    let mock = MockDataService::new();
    mock.expect_search_by(SEARCH_BY_EPERSON_METHOD).return_ok(paginated_list());
    mock.expect_create().return_ok(policy("5", ActionType::Read));
    let service = ResourcePolicyService::new(mock.clone());

    service.search_by_eperson(EPERSON_UUID, Some("")).await;
    let draft = ResourcePolicy::new("", ActionType::Read);
    service
        .create(draft.clone(), RESOURCE_UUID, Some(""), Some(GROUP_UUID))
        .await;

    assert_eq!(
        mock.calls(),
        vec![
            search_call(SEARCH_BY_EPERSON_METHOD, vec![SearchParam::new("uuid", EPERSON_UUID)]),
            DataServiceCall::Create {
                object: serde_json::to_value(&draft).unwrap(),
                params: vec![
                    SearchParam::new("resource", RESOURCE_UUID),
                    SearchParam::new("group", GROUP_UUID),
                ],
            },
        ]
    );
    mock.verify();
}
