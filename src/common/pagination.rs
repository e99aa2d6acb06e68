// src/common/pagination.rs

use serde::Serialize;
use utoipa::ToSchema;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 20;
pub const MAX_LIMIT: u32 = 100;

pub fn default_page() -> u32 {
    DEFAULT_PAGE
}

pub fn default_limit() -> u32 {
    DEFAULT_LIMIT
}

/// Resposta padrão das listagens: `{ items, total, page, limit }`.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: u32,
    pub limit: u32,
}

impl<T> Page<T> {
    /// Recorta uma lista já filtrada e ordenada. `page` começa em 1.
    pub fn slice(items: Vec<T>, page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let total = items.len();
        let skip = (page as usize - 1).saturating_mul(limit as usize);

        let items = items
            .into_iter()
            .skip(skip)
            .take(limit as usize)
            .collect();

        Self { items, total, page, limit }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_len(n: usize, page: u32, limit: u32) -> usize {
        let before = (page as usize - 1) * limit as usize;
        (limit as usize).min(n.saturating_sub(before))
    }

    #[test]
    fn page_sizes_follow_min_formula() {
        for n in [0usize, 1, 7, 20, 21, 45] {
            for limit in [1u32, 3, 20, 100] {
                for page in 1u32..=6 {
                    let data: Vec<usize> = (0..n).collect();
                    let result = Page::slice(data, page, limit);
                    assert_eq!(result.items.len(), expected_len(n, page, limit));
                    assert_eq!(result.total, n);
                }
            }
        }
    }

    #[test]
    fn concatenated_pages_rebuild_the_list() {
        let data: Vec<u32> = (0..23).collect();
        let limit = 5;
        let mut rebuilt = Vec::new();

        for page in 1..=5 {
            rebuilt.extend(Page::slice(data.clone(), page, limit).items);
        }

        assert_eq!(rebuilt, data);
    }

    #[test]
    fn page_zero_is_treated_as_first_page() {
        let result = Page::slice(vec![1, 2, 3], 0, 2);
        assert_eq!(result.page, 1);
        assert_eq!(result.items, vec![1, 2]);
    }
}
