//! Builder: assemble a `SELECT` statement step by step.
//!
//! The builder separates how a query is put together from how it is
//! rendered. It is consumed by value so calls chain naturally.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CreationalError, Result};

/// A finished `SELECT` query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlQuery {
    table: String,
    fields: Vec<String>,
    conditions: Vec<String>,
    order_by: Option<String>,
}

impl SqlQuery {
    /// Start building a query.
    pub fn builder() -> SqlQueryBuilder {
        SqlQueryBuilder::new()
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn conditions(&self) -> &[String] {
        &self.conditions
    }

    /// Render the statement. No fields means `*`; conditions are joined by
    /// `AND`.
    pub fn to_sql(&self) -> String {
        let projection = if self.fields.is_empty() {
            "*".to_string()
        } else {
            self.fields.join(",")
        };
        let mut sql = format!("SELECT {projection} FROM {}", self.table);
        if !self.conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&self.conditions.join(" AND "));
        }
        if let Some(order_by) = &self.order_by {
            sql.push_str(" ORDER BY ");
            sql.push_str(order_by);
        }
        sql
    }
}

impl fmt::Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

/// Step-by-step construction of an [`SqlQuery`].
#[derive(Clone, Debug, Default)]
pub struct SqlQueryBuilder {
    query: SqlQuery,
}

impl SqlQueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table; a later call replaces an earlier one.
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.query.table = table.into();
        self
    }

    /// Append a projected field.
    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.query.fields.push(field.into());
        self
    }

    /// Append a condition; all conditions must hold.
    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.query.conditions.push(condition.into());
        self
    }

    /// Set the ordering clause; a later call replaces an earlier one.
    pub fn order_by(mut self, order_by: impl Into<String>) -> Self {
        let order_by = order_by.into();
        self.query.order_by = (!order_by.is_empty()).then_some(order_by);
        self
    }

    /// Finish the query. Fails if no table was given.
    pub fn build(self) -> Result<SqlQuery> {
        if self.query.table.trim().is_empty() {
            return Err(CreationalError::MissingTable);
        }
        Ok(self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_query() {
        let query = SqlQuery::builder()
            .table("product")
            .field("id")
            .field("name")
            .field("price")
            .condition("id > 100")
            .condition("price < 50")
            .order_by("price desc")
            .build()
            .unwrap();
        assert_eq!(
            query.to_sql(),
            "SELECT id,name,price FROM product WHERE id > 100 AND price < 50 ORDER BY price desc"
        );
    }

    #[test]
    fn minimal_query_selects_everything() {
        let query = SqlQueryBuilder::new().table("t").build().unwrap();
        assert_eq!(query.to_string(), "SELECT * FROM t");
    }

    #[test]
    fn empty_order_by_is_dropped() {
        let query = SqlQueryBuilder::new()
            .table("t")
            .field("a")
            .order_by("")
            .build()
            .unwrap();
        assert_eq!(query.to_sql(), "SELECT a FROM t");
    }

    #[test]
    fn table_is_required() {
        let err = SqlQueryBuilder::new().field("a").build().unwrap_err();
        assert!(matches!(err, CreationalError::MissingTable));
    }
}
