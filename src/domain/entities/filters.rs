//! Listing filters, sorting and pagination metadata for links.

use serde::Serialize;
use serde_json::json;

use crate::error::AppError;

pub const MAX_PAGE: u32 = 10_000_000;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Columns a listing may be ordered by.
///
/// The ORDER BY clause is assembled only from the `&'static str` values below,
/// never from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Identifier,
    OriginalUrl,
    Visits,
    CreatedAt,
}

impl SortField {
    pub fn column(&self) -> &'static str {
        match self {
            SortField::Identifier => "identifier",
            SortField::OriginalUrl => "original_url",
            SortField::Visits => "visits",
            SortField::CreatedAt => "created_at",
        }
    }
}

/// A safelisted sort key. `-` prefix means descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub descending: bool,
}

impl Default for Sort {
    fn default() -> Self {
        Self {
            field: SortField::Identifier,
            descending: false,
        }
    }
}

impl Sort {
    /// Accepted values, ascending and descending.
    pub const SAFELIST: [&'static str; 8] = [
        "identifier",
        "original_url",
        "visits",
        "created_at",
        "-identifier",
        "-original_url",
        "-visits",
        "-created_at",
    ];

    /// Parses a sort key such as `-visits`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for anything outside [`Self::SAFELIST`].
    pub fn parse(value: &str) -> Result<Self, AppError> {
        let (descending, name) = match value.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, value),
        };

        let field = match name {
            "identifier" => SortField::Identifier,
            "original_url" => SortField::OriginalUrl,
            "visits" => SortField::Visits,
            "created_at" => SortField::CreatedAt,
            _ => {
                return Err(AppError::validation(
                    "invalid sort value",
                    json!({ "sort": value, "allowed": Self::SAFELIST }),
                ));
            }
        };

        Ok(Self { field, descending })
    }

    pub fn column(&self) -> &'static str {
        self.field.column()
    }

    pub fn direction(&self) -> &'static str {
        if self.descending { "DESC" } else { "ASC" }
    }
}

/// Filter and page window for [`LinkRepository::list`](crate::domain::repositories::LinkRepository::list).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkFilter {
    /// Case-insensitive exact match on `original_url`. `None` matches everything.
    pub original_url: Option<String>,
    pub sort: Sort,
    pub page: u32,
    pub page_size: u32,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            original_url: None,
            sort: Sort::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl LinkFilter {
    /// Checks page bounds.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] when `page` is outside `1..=10_000_000`
    /// or `page_size` outside `1..=100`.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.page == 0 || self.page > MAX_PAGE {
            return Err(AppError::validation(
                "page must be between 1 and 10000000",
                json!({ "page": self.page }),
            ));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(AppError::validation(
                "page_size must be between 1 and 100",
                json!({ "page_size": self.page_size }),
            ));
        }
        Ok(())
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.page_size)
    }
}

/// Pagination summary returned alongside a page of links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero")]
    pub current_page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub page_size: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub first_page: u32,
    #[serde(skip_serializing_if = "is_zero")]
    pub last_page: u32,
    #[serde(skip_serializing_if = "is_zero_i64")]
    pub total_records: i64,
}

fn is_zero(v: &u32) -> bool {
    *v == 0
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

impl Metadata {
    /// Empty metadata when nothing matched.
    pub fn calculate(total_records: i64, page: u32, page_size: u32) -> Self {
        if total_records <= 0 || page_size == 0 {
            return Self::default();
        }

        let last_page = (total_records as u64).div_ceil(u64::from(page_size));

        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
            total_records,
        }
    }
}
