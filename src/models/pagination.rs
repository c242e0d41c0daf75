//! Pagination parameters and the uniform response envelope
//!
//! Every list endpoint shares the canonical pagination object
//! `{page, limit, total, totalPages}`.

use serde::Serialize;

/// Validated page/limit pair. Construct with [`PageParams::clamped`] so the
/// limit is bounded before it reaches a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: i64,
    pub limit: i64,
}

impl PageParams {
    /// Clamp raw query values: page >= 1, 1 <= limit <= max
    pub fn clamped(page: i64, limit: i64, max_limit: i64) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, max_limit),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

/// Canonical pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
}

impl Pagination {
    pub fn new(params: PageParams, total: i64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            (total + params.limit - 1) / params.limit
        };

        Self {
            page: params.page,
            limit: params.limit,
            total,
            total_pages,
        }
    }
}

/// Uniform response envelope `{success, data, pagination?}`
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data,
            pagination: Some(pagination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limit_clamped_to_max() {
        let p = PageParams::clamped(1, 500, 100);
        assert_eq!(p.limit, 100);

        let p = PageParams::clamped(1, 0, 100);
        assert_eq!(p.limit, 1);
    }

    #[test]
    fn test_page_defaults_to_first() {
        let p = PageParams::clamped(0, 50, 100);
        assert_eq!(p.page, 1);
        assert_eq!(p.offset(), 0);

        let p = PageParams::clamped(-3, 50, 100);
        assert_eq!(p.page, 1);
    }

    #[test]
    fn test_offset() {
        let p = PageParams::clamped(3, 20, 100);
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn test_total_pages_ceiling() {
        let params = PageParams::clamped(1, 2, 100);
        assert_eq!(Pagination::new(params, 5).total_pages, 3);
        assert_eq!(Pagination::new(params, 4).total_pages, 2);
        assert_eq!(Pagination::new(params, 1).total_pages, 1);
    }

    #[test]
    fn test_total_pages_zero_when_empty() {
        let params = PageParams::clamped(1, 10, 100);
        assert_eq!(Pagination::new(params, 0).total_pages, 0);
    }

    #[test]
    fn test_envelope_shape() {
        let params = PageParams::clamped(1, 2, 100);
        let resp = ApiResponse::paginated(vec![1, 2], Pagination::new(params, 5));
        let json = serde_json::to_value(&resp).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["pagination"]["totalPages"], 3);
        assert_eq!(json["pagination"]["total"], 5);

        let plain = serde_json::to_value(ApiResponse::ok(1)).unwrap();
        assert!(plain.get("pagination").is_none());
    }
}
