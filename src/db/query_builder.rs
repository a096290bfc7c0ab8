use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{ColumnTrait, Condition};

use crate::entities::property::{self, Location, PropertyStatus, PropertyType};

/// Optional criteria for narrowing a property listing query.
///
/// Exact-match fields combine with AND; the free-text `search` term matches
/// title or description case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub location: Option<Location>,
    pub status: Option<PropertyStatus>,
    pub property_type: Option<PropertyType>,
    pub search: Option<String>,
}

impl PropertyFilter {
    /// Build the SQL condition for this filter.
    ///
    /// An empty filter yields an empty conjunction, which renders as no
    /// WHERE clause at all.
    pub fn condition(&self) -> Condition {
        let mut cond = Condition::all();

        if let Some(location) = self.location {
            cond = cond.add(property::Column::Location.eq(location));
        }
        if let Some(status) = self.status {
            cond = cond.add(property::Column::Status.eq(status));
        }
        if let Some(property_type) = self.property_type {
            cond = cond.add(property::Column::PropertyType.eq(property_type));
        }
        if let Some(term) = self.search_term() {
            let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
            cond = cond.add(
                Condition::any()
                    .add(
                        lowered(property::Column::Title)
                            .like(LikeExpr::new(pattern.clone()).escape('\\')),
                    )
                    .add(
                        lowered(property::Column::Description)
                            .like(LikeExpr::new(pattern).escape('\\')),
                    ),
            );
        }

        cond
    }

    /// The search term with surrounding whitespace removed, if any remains.
    fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// Lowercase a column for case-insensitive comparison.
fn lowered(column: property::Column) -> Expr {
    Expr::expr(Func::lower(Expr::col(column)))
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Resolved page/limit pair for a listing query.
///
/// Construction clamps out-of-range requests instead of rejecting them:
/// page is at least 1 and limit stays within `[1, max_limit]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u64,
    limit: u64,
}

impl Pagination {
    /// Resolve requested paging values against the configured bounds.
    pub fn resolve(
        page: Option<u64>,
        limit: Option<u64>,
        default_limit: u64,
        max_limit: u64,
    ) -> Self {
        let page = page.unwrap_or(1).max(1);
        let limit = limit
            .unwrap_or(default_limit)
            .clamp(1, max_limit.max(1));

        Self { page, limit }
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of rows to skip for the current page.
    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }

    /// Total page count for `total_items` rows; zero when there are none.
    pub fn total_pages(&self, total_items: u64) -> u64 {
        total_items.div_ceil(self.limit)
    }
}
