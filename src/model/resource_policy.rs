use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::framework::RestResource;

/// The action a policy grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Read,
    Write,
    Remove,
    Admin,
    Delete,
    WithdrawnRead,
    DefaultBitstreamRead,
    DefaultItemRead,
}

impl ActionType {
    /// Wire name, as used in search params and JSON bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Read => "READ",
            ActionType::Write => "WRITE",
            ActionType::Remove => "REMOVE",
            ActionType::Admin => "ADMIN",
            ActionType::Delete => "DELETE",
            ActionType::WithdrawnRead => "WITHDRAWN_READ",
            ActionType::DefaultBitstreamRead => "DEFAULT_BITSTREAM_READ",
            ActionType::DefaultItemRead => "DEFAULT_ITEM_READ",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a policy exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyType {
    #[serde(rename = "TYPE_SUBMISSION")]
    Submission,
    #[serde(rename = "TYPE_WORKFLOW")]
    Workflow,
    #[serde(rename = "TYPE_INHERITED")]
    Inherited,
    #[serde(rename = "TYPE_CUSTOM")]
    Custom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalLink {
    pub href: String,
}

/// Related-resource links of a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePolicyLinks {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eperson: Option<HalLink>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<HalLink>,
    #[serde(rename = "self", default, skip_serializing_if = "Option::is_none")]
    pub self_link: Option<HalLink>,
}

/// An access-control rule binding a person or group to an action on a
/// protected resource, optionally limited to a validity window.
///
/// # Data Framework
/// This struct implements [`RestResource`], so it can be served by a
/// [`RestDataService`](crate::framework::RestDataService) and decoded straight
/// from the REST representation (`camelCase` fields, HAL `_links`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourcePolicy {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub policy_type: Option<PolicyType>,
    pub action: ActionType,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(rename = "type", default = "resource_policy_type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    #[serde(rename = "_links", default)]
    pub links: ResourcePolicyLinks,
}

fn resource_policy_type() -> String {
    ResourcePolicy::RESOURCE_TYPE.to_string()
}

impl RestResource for ResourcePolicy {
    const RESOURCE_TYPE: &'static str = "resourcepolicy";
    const LINK_PATH: &'static str = "resourcepolicies";
}

impl ResourcePolicy {
    /// Creates a bare policy granting `action`.
    ///
    /// # Arguments
    /// * `id` - Identifier; empty for a policy not yet stored
    /// * `action` - The action granted
    pub fn new(id: impl Into<String>, action: ActionType) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            policy_type: None,
            action,
            start_date: None,
            end_date: None,
            resource_type: resource_policy_type(),
            uuid: None,
            links: ResourcePolicyLinks::default(),
        }
    }

    pub fn with_policy_type(mut self, policy_type: PolicyType) -> Self {
        self.policy_type = Some(policy_type);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_validity(mut self, start_date: Option<NaiveDate>, end_date: Option<NaiveDate>) -> Self {
        self.start_date = start_date;
        self.end_date = end_date;
        self
    }

    /// Whether `date` falls inside the validity window. Open ends are unbounded;
    /// both ends are inclusive.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.start_date.map_or(true, |start| start <= date) && self.end_date.map_or(true, |end| date <= end)
    }

    pub fn self_href(&self) -> Option<&str> {
        self.links.self_link.as_ref().map(|link| link.href.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rest_policy() -> serde_json::Value {
        json!({
            "id": "1",
            "name": null,
            "description": null,
            "policyType": "TYPE_SUBMISSION",
            "action": "READ",
            "startDate": null,
            "endDate": null,
            "type": "resourcepolicy",
            "uuid": "resource-policy-1",
            "_links": {
                "eperson": { "href": "https://rest.api/rest/api/eperson" },
                "group": { "href": "https://rest.api/rest/api/group" },
                "self": { "href": "https://rest.api/rest/api/resourcepolicies/1" }
            }
        })
    }

    #[test]
    fn test_decode_rest_representation() {
        let policy: ResourcePolicy = serde_json::from_value(rest_policy()).unwrap();
        assert_eq!(policy.id, "1");
        assert_eq!(policy.policy_type, Some(PolicyType::Submission));
        assert_eq!(policy.action, ActionType::Read);
        assert_eq!(policy.resource_type, "resourcepolicy");
        assert_eq!(policy.uuid.as_deref(), Some("resource-policy-1"));
        assert_eq!(policy.self_href(), Some("https://rest.api/rest/api/resourcepolicies/1"));
        assert_eq!(
            policy.links.eperson.as_ref().map(|l| l.href.as_str()),
            Some("https://rest.api/rest/api/eperson")
        );
    }

    #[test]
    fn test_reencode_keeps_fields() {
        let policy: ResourcePolicy = serde_json::from_value(rest_policy()).unwrap();
        let value = serde_json::to_value(&policy).unwrap();
        assert_eq!(value["policyType"], "TYPE_SUBMISSION");
        assert_eq!(value["type"], "resourcepolicy");
        assert_eq!(value["_links"]["group"]["href"], "https://rest.api/rest/api/group");
    }

    #[test]
    fn test_action_type_wire_names() {
        assert_eq!(ActionType::Read.as_str(), "READ");
        assert_eq!(ActionType::DefaultBitstreamRead.to_string(), "DEFAULT_BITSTREAM_READ");
        let parsed: ActionType = serde_json::from_str("\"WITHDRAWN_READ\"").unwrap();
        assert_eq!(parsed, ActionType::WithdrawnRead);
        assert_eq!(serde_json::to_string(&ActionType::DefaultItemRead).unwrap(), "\"DEFAULT_ITEM_READ\"");
    }

    #[test]
    fn test_validity_window() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let open = ResourcePolicy::new("1", ActionType::Read);
        assert!(open.is_active_on(day(1)));

        let windowed = ResourcePolicy::new("2", ActionType::Write).with_validity(Some(day(10)), Some(day(20)));
        assert!(!windowed.is_active_on(day(9)));
        assert!(windowed.is_active_on(day(10)));
        assert!(windowed.is_active_on(day(20)));
        assert!(!windowed.is_active_on(day(21)));
    }

    #[test]
    fn test_dates_use_iso_format() {
        let mut value = rest_policy();
        value["startDate"] = json!("2019-06-20");
        let policy: ResourcePolicy = serde_json::from_value(value).unwrap();
        assert_eq!(policy.start_date, NaiveDate::from_ymd_opt(2019, 6, 20));
    }
}
