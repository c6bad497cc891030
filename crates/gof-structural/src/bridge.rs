//! Bridge: how rows are fetched (MySQL, Oracle) and how they are exported
//! (CSV, JSON) vary independently. An exporter holds a fetcher and any
//! exporter works with any fetcher.

use std::fmt;
use std::io::Write;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;

/// Connection settings for a data source.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbConfig {
    pub db_type: String,
    pub url: String,
    pub uid: String,
    pub pwd: String,
}

impl DbConfig {
    pub fn new(
        db_type: impl Into<String>,
        url: impl Into<String>,
        uid: impl Into<String>,
        pwd: impl Into<String>,
    ) -> Self {
        Self {
            db_type: db_type.into(),
            url: url.into(),
            uid: uid.into(),
            pwd: pwd.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A typed column value.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Int(i64),
    Float(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl FieldValue {
    fn to_json(&self) -> Value {
        match self {
            Self::Int(v) => Value::from(*v),
            Self::Float(v) => Value::from(*v),
            Self::Text(v) => Value::from(v.as_str()),
            Self::Bool(v) => Value::from(*v),
            Self::DateTime(v) => Value::from(v.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

impl fmt::Display for FieldValue {
    /// Text and timestamps are quoted; numbers and booleans are bare.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Text(v) => write!(f, "\"{v}\""),
            Self::Bool(v) => write!(f, "{v}"),
            Self::DateTime(v) => write!(f, "\"{}\"", v.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DataField {
    pub name: String,
    pub value: FieldValue,
}

impl DataField {
    pub fn new(name: impl Into<String>, value: FieldValue) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// One fetched row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataRow {
    pub fields: Vec<DataField>,
}

impl DataRow {
    /// The fixed row every mock fetcher returns.
    pub fn mock() -> Self {
        Self {
            fields: vec![
                DataField::new("int-1", FieldValue::Int(1)),
                DataField::new("float-1", FieldValue::Float(1.1)),
                DataField::new("string-1", FieldValue::Text("hello".into())),
            ],
        }
    }

    /// `name=value` pairs joined by commas.
    pub fn fields_string(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}={}", f.name, f.value))
            .collect::<Vec<_>>()
            .join(",")
    }
}

// ---------------------------------------------------------------------------
// Implementor side: fetchers
// ---------------------------------------------------------------------------

/// Runs a query and returns the rows.
pub trait DataFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    fn fetch(&self, sql: &str) -> Result<Vec<DataRow>>;
}

#[derive(Clone, Debug)]
pub struct MysqlFetcher {
    config: DbConfig,
}

impl MysqlFetcher {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }
}

impl DataFetcher for MysqlFetcher {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn fetch(&self, sql: &str) -> Result<Vec<DataRow>> {
        debug!(url = %self.config.url, sql, "mysql fetch");
        Ok(vec![DataRow::mock()])
    }
}

#[derive(Clone, Debug)]
pub struct OracleFetcher {
    config: DbConfig,
}

impl OracleFetcher {
    pub fn new(config: DbConfig) -> Self {
        Self { config }
    }
}

impl DataFetcher for OracleFetcher {
    fn name(&self) -> &'static str {
        "oracle"
    }

    fn fetch(&self, sql: &str) -> Result<Vec<DataRow>> {
        debug!(url = %self.config.url, sql, "oracle fetch");
        Ok(vec![DataRow::mock()])
    }
}

// ---------------------------------------------------------------------------
// Abstraction side: exporters
// ---------------------------------------------------------------------------

/// Writes the result of a query in some format.
pub trait DataExporter {
    /// Swap the data source.
    fn set_fetcher(&mut self, fetcher: Box<dyn DataFetcher>);

    /// Fetch `sql` and write the rows to `writer`. Returns the row count.
    fn export(&self, sql: &str, writer: &mut dyn Write) -> Result<usize>;
}

/// Header line of field names, then one line of values per row.
pub struct CsvExporter {
    fetcher: Box<dyn DataFetcher>,
}

impl CsvExporter {
    pub fn new(fetcher: Box<dyn DataFetcher>) -> Self {
        Self { fetcher }
    }
}

impl DataExporter for CsvExporter {
    fn set_fetcher(&mut self, fetcher: Box<dyn DataFetcher>) {
        self.fetcher = fetcher;
    }

    fn export(&self, sql: &str, writer: &mut dyn Write) -> Result<usize> {
        let rows = self.fetcher.fetch(sql)?;
        debug!(fetcher = self.fetcher.name(), rows = rows.len(), "csv export");
        if let Some(first) = rows.first() {
            let header: Vec<&str> = first.fields.iter().map(|f| f.name.as_str()).collect();
            writeln!(writer, "{}", header.join(","))?;
        }
        for row in &rows {
            let values: Vec<String> = row.fields.iter().map(|f| f.value.to_string()).collect();
            writeln!(writer, "{}", values.join(","))?;
        }
        Ok(rows.len())
    }
}

/// One JSON object per line.
pub struct JsonExporter {
    fetcher: Box<dyn DataFetcher>,
}

impl JsonExporter {
    pub fn new(fetcher: Box<dyn DataFetcher>) -> Self {
        Self { fetcher }
    }
}

impl DataExporter for JsonExporter {
    fn set_fetcher(&mut self, fetcher: Box<dyn DataFetcher>) {
        self.fetcher = fetcher;
    }

    fn export(&self, sql: &str, writer: &mut dyn Write) -> Result<usize> {
        let rows = self.fetcher.fetch(sql)?;
        debug!(fetcher = self.fetcher.name(), rows = rows.len(), "json export");
        for row in &rows {
            let object: Map<String, Value> = row
                .fields
                .iter()
                .map(|f| (f.name.clone(), f.value.to_json()))
                .collect();
            serde_json::to_writer(&mut *writer, &object)?;
            writeln!(writer)?;
        }
        Ok(rows.len())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn mysql() -> Box<dyn DataFetcher> {
        Box::new(MysqlFetcher::new(DbConfig::new("mysql", "mysql://localhost/db", "root", "")))
    }

    fn oracle() -> Box<dyn DataFetcher> {
        Box::new(OracleFetcher::new(DbConfig::new("oracle", "oracle://localhost/db", "sys", "")))
    }

    #[test]
    fn csv_export() {
        let exporter = CsvExporter::new(mysql());
        let mut out = Vec::new();
        let rows = exporter.export("select * from t", &mut out).unwrap();
        assert_eq!(rows, 1);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "int-1,float-1,string-1\n1,1.1,\"hello\"\n"
        );
    }

    #[test]
    fn json_export() {
        let exporter = JsonExporter::new(oracle());
        let mut out = Vec::new();
        exporter.export("select * from t", &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let value: Value = serde_json::from_str(text.trim_end()).unwrap();
        assert_eq!(value["int-1"], 1);
        assert_eq!(value["float-1"], 1.1);
        assert_eq!(value["string-1"], "hello");
    }

    #[test]
    fn fetcher_can_be_swapped() {
        let mut exporter = JsonExporter::new(mysql());
        exporter.set_fetcher(oracle());
        let mut sink = Vec::new();
        assert_eq!(exporter.export("select 1", &mut sink).unwrap(), 1);
    }

    #[test]
    fn field_rendering() {
        assert_eq!(DataRow::mock().fields_string(), "int-1=1,float-1=1.1,string-1=\"hello\"");
        let at = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap();
        assert_eq!(FieldValue::DateTime(at).to_string(), "\"2024-05-01T08:30:00\"");
        assert_eq!(FieldValue::Bool(false).to_string(), "false");
    }
}
