//! Query options and paginated results.

use serde::{Deserialize, Serialize};

/// A single `field=value` constraint of a search. Params combine conjunctively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchParam {
    pub field_name: String,
    pub field_value: String,
}

impl SearchParam {
    pub fn new(field_name: impl Into<String>, field_value: impl Into<String>) -> Self {
        Self {
            field_name: field_name.into(),
            field_value: field_value.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    #[serde(rename = "ASC")]
    Ascending,
    #[serde(rename = "DESC")]
    Descending,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortOptions {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOptions {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Pagination, sorting and search params for a list or search request.
///
/// Built fresh for every call. The order of `search_params` is part of the
/// request's identity: it is reproduced verbatim in the generated href, which
/// is the request cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FindListOptions {
    /// 1-based page number.
    pub current_page: Option<u32>,
    pub elements_per_page: Option<u32>,
    pub sort: Option<SortOptions>,
    pub search_params: Vec<SearchParam>,
}

impl FindListOptions {
    pub fn with_search_params(search_params: Vec<SearchParam>) -> Self {
        Self {
            search_params,
            ..Self::default()
        }
    }

    pub fn page(mut self, current_page: u32, elements_per_page: u32) -> Self {
        self.current_page = Some(current_page);
        self.elements_per_page = Some(elements_per_page);
        self
    }

    pub fn sorted_by(mut self, sort: SortOptions) -> Self {
        self.sort = Some(sort);
        self
    }
}

/// Page metadata of a [`PaginatedList`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub elements_per_page: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    /// 1-based page number.
    pub current_page: u32,
}

/// Wire shape of a HAL `page` object. `number` is 0-based.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct HalPage {
    #[serde(default)]
    pub size: u32,
    #[serde(default)]
    pub total_elements: u64,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub number: u32,
}

impl From<HalPage> for PageInfo {
    fn from(page: HalPage) -> Self {
        Self {
            elements_per_page: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
            current_page: page.number.saturating_add(1),
        }
    }
}

/// One page of a larger result set.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedList<T> {
    pub page_info: PageInfo,
    pub page: Vec<T>,
}

impl<T> PaginatedList<T> {
    pub fn new(page_info: PageInfo, page: Vec<T>) -> Self {
        Self { page_info, page }
    }

    pub fn total_elements(&self) -> u64 {
        self.page_info.total_elements
    }

    pub fn len(&self) -> usize {
        self.page.len()
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.page.iter()
    }
}
