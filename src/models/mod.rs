pub mod categories;
pub mod client_bookmarks;
pub mod client_profiles;
pub mod contact_requests;
pub mod freelancer_profiles;
pub mod messages;
pub mod portfolio_categories;
pub mod portfolio_items;
pub mod portfolio_skills;
pub mod portfolios;
pub mod profile_views;
pub mod quotes;
pub mod reviews;
pub mod search_queries;
pub mod skills;
pub mod users;
pub mod works;

use sea_orm::prelude::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}

/// One page of an already-ranked list.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub results: Vec<T>,
    pub count: usize,
    pub page: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn slice(items: Vec<T>, page: u64, per_page: u64) -> Self {
        let count = items.len();
        let per_page = per_page.max(1);
        let total_pages = (count as u64).div_ceil(per_page);
        let start = (page.max(1) - 1).saturating_mul(per_page);
        let start = usize::try_from(start).unwrap_or(usize::MAX);
        let results = items
            .into_iter()
            .skip(start)
            .take(usize::try_from(per_page).unwrap_or(usize::MAX))
            .collect();
        Self {
            results,
            count,
            page,
            total_pages,
        }
    }
}

/// Read a JSON column holding a list of strings. Non-string entries are stringified.
pub fn string_list(value: &Json) -> Vec<String> {
    match value {
        Json::Array(items) => items
            .iter()
            .map(|item| match item {
                Json::String(s) => s.clone(),
                other => other.to_string(),
            })
            .filter(|s| !s.trim().is_empty())
            .collect(),
        Json::String(s) => s.split_whitespace().map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

pub fn json_list(items: &[String]) -> Json {
    Json::Array(items.iter().cloned().map(Json::String).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pagination_defaults_and_bounds() {
        let q = PaginationQuery { page: Some(0), limit: Some(500) };
        assert_eq!(q.page(), 1);
        assert_eq!(q.limit(), 100);
        let q = PaginationQuery { page: None, limit: None };
        assert_eq!(q.limit(), 20);
    }

    #[test]
    fn page_slices_and_counts() {
        let page = Page::slice((1..=25).collect::<Vec<_>>(), 3, 12);
        assert_eq!(page.results, vec![25]);
        assert_eq!(page.count, 25);
        assert_eq!(page.total_pages, 3);

        let empty = Page::slice(Vec::<i32>::new(), 1, 12);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.results.is_empty());
    }

    #[test]
    fn huge_page_numbers_are_empty() {
        let page = Page::slice(vec![1, 2, 3], u64::MAX, 20);
        assert!(page.results.is_empty());
        assert_eq!(page.count, 3);

        let page = Page::slice(vec![1, 2, 3], (1 << 62) + 1, 4);
        assert!(page.results.is_empty());
    }

    #[test]
    fn string_list_tolerates_mixed_json() {
        assert_eq!(string_list(&json!(["a", 2, ""])), vec!["a", "2"]);
        assert_eq!(string_list(&json!("wedding portrait")), vec!["wedding", "portrait"]);
        assert!(string_list(&json!(null)).is_empty());
    }
}
