//! Expense filter builder for constructing dynamic SQL queries

use chrono::NaiveDate;

use crate::models::{SortField, SortOrder};

/// Builder for expense listing filters
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub sort: SortField,
    pub order: SortOrder,
    pub limit: Option<usize>,
}

/// Result of building a filter - contains SQL components and parameters
pub struct FilterResult {
    /// WHERE clause including "WHERE" keyword (empty if no conditions)
    pub where_clause: String,
    /// ORDER BY clause including "ORDER BY" keyword
    pub order_clause: String,
    /// LIMIT clause (empty if unlimited)
    pub limit_clause: String,
    /// Parameters for the query (boxed for rusqlite compatibility)
    pub params: Vec<Box<dyn rusqlite::ToSql>>,
}

impl ExpenseFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(mut self, id: Option<i64>) -> Self {
        self.user_id = id;
        self
    }

    pub fn category_id(mut self, id: Option<i64>) -> Self {
        self.category_id = id;
        self
    }

    /// Inclusive date bounds; either side may be open
    pub fn date_range(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort = field;
        self.order = order;
        self
    }

    pub fn limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    /// Build the filter components
    pub fn build(&self) -> FilterResult {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(uid) = self.user_id {
            conditions.push("e.user_id = ?");
            params.push(Box::new(uid));
        }

        if let Some(cid) = self.category_id {
            conditions.push("e.category_id = ?");
            params.push(Box::new(cid));
        }

        if let Some(from) = self.from {
            conditions.push("e.date >= ?");
            params.push(Box::new(from.to_string()));
        }

        if let Some(to) = self.to {
            conditions.push("e.date <= ?");
            params.push(Box::new(to.to_string()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let order_column = match self.sort {
            SortField::Date => "e.date",
            SortField::Amount => "e.amount",
        };
        let order_clause = format!(
            "ORDER BY {} {}, e.id {}",
            order_column,
            self.order.as_sql(),
            self.order.as_sql()
        );

        let limit_clause = match self.limit {
            Some(n) => format!("LIMIT {}", n),
            None => String::new(),
        };

        FilterResult {
            where_clause,
            order_clause,
            limit_clause,
            params,
        }
    }
}

impl FilterResult {
    /// Get parameter references for query execution
    pub fn params_refs(&self) -> Vec<&dyn rusqlite::ToSql> {
        self.params.iter().map(|p| p.as_ref()).collect()
    }
}
