//! # HAL Endpoint Resolution
//!
//! Turns a resource link path (e.g. `resourcepolicies`) plus [`FindListOptions`]
//! into concrete hrefs. The generated href doubles as the request cache key, so
//! query arguments are always emitted in the same order:
//! `page`, `size`, `sort`, then every search param as given.

use std::collections::HashMap;

use reqwest::Url;

use crate::framework::{FindListOptions, FrameworkError};

/// Resolves endpoints below a REST API root.
#[derive(Debug, Clone)]
pub struct HalEndpoint {
    root: String,
    links: HashMap<String, String>,
}

impl HalEndpoint {
    pub fn new(root: impl Into<String>) -> Self {
        let root = root.into().trim_end_matches('/').to_string();
        Self {
            root,
            links: HashMap::new(),
        }
    }

    /// Maps a link path to an explicit href, for resources that do not live
    /// directly below the root (e.g. `resourcepolicies` under `/authz`).
    pub fn with_link(mut self, link_path: impl Into<String>, href: impl Into<String>) -> Self {
        let href = href.into().trim_end_matches('/').to_string();
        self.links.insert(link_path.into(), href);
        self
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// The collection endpoint of `link_path`.
    pub fn endpoint(&self, link_path: &str) -> String {
        match self.links.get(link_path) {
            Some(href) => href.clone(),
            None => format!("{}/{}", self.root, link_path),
        }
    }

    pub fn id_href(&self, link_path: &str, id: &str) -> String {
        format!("{}/{}", self.endpoint(link_path), id)
    }

    /// `{endpoint}/search/{method}` plus the options' query arguments.
    pub fn search_href(
        &self,
        link_path: &str,
        method: &str,
        options: &FindListOptions,
    ) -> Result<String, FrameworkError> {
        let href = format!("{}/search/{}", self.endpoint(link_path), method);
        Self::list_href(&href, options)
    }

    /// Appends the options' query arguments to `href`.
    ///
    /// Returns `href` untouched when there is nothing to append.
    pub fn list_href(href: &str, options: &FindListOptions) -> Result<String, FrameworkError> {
        let mut args: Vec<(&str, String)> = Vec::new();
        if let Some(page) = options.current_page {
            args.push(("page", page.saturating_sub(1).to_string()));
        }
        if let Some(size) = options.elements_per_page {
            args.push(("size", size.to_string()));
        }
        if let Some(sort) = &options.sort {
            args.push(("sort", format!("{},{}", sort.field, sort.direction.as_str())));
        }
        for param in &options.search_params {
            args.push((param.field_name.as_str(), param.field_value.clone()));
        }

        if args.is_empty() {
            return Ok(href.to_string());
        }

        let mut url = Url::parse(href).map_err(|e| FrameworkError::InvalidHref(format!("{href}: {e}")))?;
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in &args {
                query.append_pair(key, value);
            }
        }
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{SearchParam, SortDirection, SortOptions};

    const ROOT: &str = "https://rest.api/server/api";

    #[test]
    fn test_endpoint_resolution() {
        let endpoint = HalEndpoint::new(format!("{ROOT}/"));
        assert_eq!(endpoint.endpoint("items"), "https://rest.api/server/api/items");

        let endpoint = endpoint.with_link("resourcepolicies", format!("{ROOT}/authz/resourcepolicies"));
        assert_eq!(
            endpoint.id_href("resourcepolicies", "1"),
            "https://rest.api/server/api/authz/resourcepolicies/1"
        );
    }

    #[test]
    fn test_search_href_preserves_param_order() {
        let endpoint = HalEndpoint::new(ROOT);
        let options = FindListOptions::with_search_params(vec![
            SearchParam::new("uuid", "group-1"),
            SearchParam::new("resource", "res-1"),
        ]);
        let href = endpoint.search_href("resourcepolicies", "group", &options).unwrap();
        assert_eq!(
            href,
            "https://rest.api/server/api/resourcepolicies/search/group?uuid=group-1&resource=res-1"
        );
    }

    #[test]
    fn test_search_href_without_args() {
        let endpoint = HalEndpoint::new(ROOT);
        let href = endpoint
            .search_href("resourcepolicies", "resource", &FindListOptions::default())
            .unwrap();
        assert_eq!(href, "https://rest.api/server/api/resourcepolicies/search/resource");
    }

    #[test]
    fn test_pagination_and_sort_come_first() {
        let options = FindListOptions::with_search_params(vec![SearchParam::new("uuid", "abc")])
            .page(2, 10)
            .sorted_by(SortOptions::new("name", SortDirection::Ascending));
        let href = HalEndpoint::list_href("https://rest.api/server/api/items", &options).unwrap();
        assert_eq!(
            href,
            "https://rest.api/server/api/items?page=1&size=10&sort=name%2CASC&uuid=abc"
        );
    }

    #[test]
    fn test_invalid_href() {
        let options = FindListOptions::with_search_params(vec![SearchParam::new("uuid", "abc")]);
        let result = HalEndpoint::list_href("not a url", &options);
        assert!(matches!(result, Err(FrameworkError::InvalidHref(_))));
    }
}
