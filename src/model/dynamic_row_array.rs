use serde::{Deserialize, Serialize};

/// Configuration for a [`DynamicRowArrayModel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRowArrayModelConfig {
    pub id: String,
    #[serde(default)]
    pub initial_count: u32,
    #[serde(default)]
    pub not_repeatable: bool,
    #[serde(default)]
    pub required: bool,
    pub submission_id: String,
    #[serde(default)]
    pub has_relationship: bool,
}

/// A repeatable row group of a submission form.
///
/// Every field persists when serialized except `is_row_array`, which is
/// derived: it is always `true` and restored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRowArrayModel {
    pub id: String,
    #[serde(default)]
    pub initial_count: u32,
    #[serde(default)]
    pub not_repeatable: bool,
    #[serde(default)]
    pub required: bool,
    pub submission_id: String,
    #[serde(default)]
    pub has_relationship: bool,
    #[serde(skip, default = "row_array")]
    pub is_row_array: bool,
}

fn row_array() -> bool {
    true
}

impl From<DynamicRowArrayModelConfig> for DynamicRowArrayModel {
    fn from(config: DynamicRowArrayModelConfig) -> Self {
        Self {
            id: config.id,
            initial_count: config.initial_count,
            not_repeatable: config.not_repeatable,
            required: config.required,
            submission_id: config.submission_id,
            has_relationship: config.has_relationship,
            is_row_array: true,
        }
    }
}
