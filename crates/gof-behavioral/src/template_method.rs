//! Template method: [`BaseDao`] fixes the query skeleton (hook, query,
//! scan) and each DAO supplies only the row mapping.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{BehavioralError, Result};

/// A column value or query argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int(i64),
    Text(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

/// One result row, columns in select order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row(pub Vec<Value>);

impl Row {
    pub fn int(&self, column: usize) -> Result<i64> {
        match self.0.get(column) {
            Some(Value::Int(v)) => Ok(*v),
            other => Err(BehavioralError::Scan(format!(
                "column {column}: expected int, found {other:?}"
            ))),
        }
    }

    pub fn text(&self, column: usize) -> Result<&str> {
        match self.0.get(column) {
            Some(Value::Text(v)) => Ok(v),
            other => Err(BehavioralError::Scan(format!(
                "column {column}: expected text, found {other:?}"
            ))),
        }
    }
}

/// Anything that can answer a parameterised query.
pub trait RowSource {
    fn query(&self, sql: &str, args: &[Value]) -> Result<Vec<Row>>;
}

/// The steps a DAO customises.
pub trait RowMapper {
    type Item;

    /// Runs before every query. An error aborts the query.
    fn before_query(&self) -> Result<()> {
        Ok(())
    }

    fn scan_row(&self, row: &Row) -> Result<Self::Item>;
}

/// The query skeleton, parameterised by a row mapper.
#[derive(Clone, Debug, Default)]
pub struct BaseDao<M> {
    mapper: M,
}

impl<M: RowMapper> BaseDao<M> {
    pub fn new(mapper: M) -> Self {
        Self { mapper }
    }

    /// First row of the result; [`BehavioralError::NoRows`] when empty.
    pub fn query_one(&self, source: &dyn RowSource, sql: &str, args: &[Value]) -> Result<M::Item> {
        self.mapper.before_query()?;
        let rows = source.query(sql, args)?;
        debug!(sql, rows = rows.len(), "query one");
        let first = rows.first().ok_or(BehavioralError::NoRows)?;
        self.mapper.scan_row(first)
    }

    /// Every row of the result, stopping at the first scan error.
    pub fn query_multi(
        &self,
        source: &dyn RowSource,
        sql: &str,
        args: &[Value],
    ) -> Result<Vec<M::Item>> {
        self.mapper.before_query()?;
        let rows = source.query(sql, args)?;
        debug!(sql, rows = rows.len(), "query multi");
        rows.iter().map(|row| self.mapper.scan_row(row)).collect()
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

const USER_COLUMNS: [&str; 5] = ["id", "name", "pwd", "org_id", "role_id"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub pwd: String,
    pub org_id: i64,
    pub role_id: String,
}

impl UserInfo {
    pub fn new(id: i64, name: &str, pwd: &str, org_id: i64, role_id: &str) -> Self {
        Self {
            id,
            name: name.into(),
            pwd: pwd.into(),
            org_id,
            role_id: role_id.into(),
        }
    }

    fn column(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(Value::Int(self.id)),
            "name" => Some(Value::from(self.name.as_str())),
            "pwd" => Some(Value::from(self.pwd.as_str())),
            "org_id" => Some(Value::Int(self.org_id)),
            "role_id" => Some(Value::from(self.role_id.as_str())),
            _ => None,
        }
    }

    fn to_row(&self) -> Row {
        Row(USER_COLUMNS.iter().filter_map(|c| self.column(c)).collect())
    }
}

/// An in-memory `user_info` table answering `... where <column>=?`.
#[derive(Clone, Debug, Default)]
pub struct MockUserTable {
    users: Vec<UserInfo>,
}

impl MockUserTable {
    pub fn new(users: Vec<UserInfo>) -> Self {
        Self { users }
    }
}

impl RowSource for MockUserTable {
    fn query(&self, sql: &str, args: &[Value]) -> Result<Vec<Row>> {
        let unsupported = || BehavioralError::Scan(format!("unsupported query: {sql}"));
        let column = sql
            .rsplit_once("where ")
            .and_then(|(_, cond)| cond.trim().strip_suffix("=?"))
            .map(str::trim)
            .ok_or_else(unsupported)?;
        let wanted = args.first().ok_or_else(unsupported)?;
        let mut rows = Vec::new();
        for user in &self.users {
            let value = user.column(column).ok_or_else(unsupported)?;
            if &value == wanted {
                rows.push(user.to_row());
            }
        }
        Ok(rows)
    }
}

/// Maps `id,name,pwd,org_id,role_id` rows to [`UserInfo`].
#[derive(Clone, Copy, Debug, Default)]
pub struct UserMapper;

impl RowMapper for UserMapper {
    type Item = UserInfo;

    fn before_query(&self) -> Result<()> {
        debug!("user query");
        Ok(())
    }

    fn scan_row(&self, row: &Row) -> Result<UserInfo> {
        Ok(UserInfo {
            id: row.int(0)?,
            name: row.text(1)?.to_string(),
            pwd: row.text(2)?.to_string(),
            org_id: row.int(3)?,
            role_id: row.text(4)?.to_string(),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct UserDao {
    base: BaseDao<UserMapper>,
}

impl UserDao {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_by_id(&self, source: &dyn RowSource, id: i64) -> Result<UserInfo> {
        self.base.query_one(
            source,
            "select id,name,pwd,org_id,role_id from user_info where id=?",
            &[Value::Int(id)],
        )
    }

    pub fn users_by_org(&self, source: &dyn RowSource, org_id: i64) -> Result<Vec<UserInfo>> {
        self.base.query_multi(
            source,
            "select id,name,pwd,org_id,role_id from user_info where org_id=?",
            &[Value::Int(org_id)],
        )
    }
}
