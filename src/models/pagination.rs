//! 分页相关的数据结构

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(20),
        }
    }
}

impl PaginationParams {
    pub fn get_page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_limit(&self) -> i64 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }

    pub fn get_offset(&self) -> i64 {
        (self.get_page() - 1) * self.get_limit()
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl<T> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, page: i64, page_size: i64, total: i64) -> Self {
        let total_pages = if total == 0 {
            1
        } else {
            (total + page_size - 1) / page_size
        };
        Self {
            data,
            page,
            page_size,
            total,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_clamped() {
        let params = PaginationParams {
            page: Some(0),
            page_size: Some(1000),
        };
        assert_eq!(params.get_page(), 1);
        assert_eq!(params.get_limit(), 100);
        assert_eq!(params.get_offset(), 0);

        let params = PaginationParams {
            page: Some(3),
            page_size: Some(10),
        };
        assert_eq!(params.get_offset(), 20);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(
            PaginatedResponse::new(Vec::<i64>::new(), 1, 20, 0).total_pages,
            1
        );
        assert_eq!(PaginatedResponse::new(vec![1], 1, 20, 41).total_pages, 3);
    }
}
