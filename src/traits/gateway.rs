//! Row store trait abstraction.
//!
//! The gateway speaks untyped JSON rows so it stays object-safe; the typed
//! helpers below decode rows into model structs at the call site.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::QueryError;
use crate::models::{Filter, SelectQuery, Table};

/// One JSON object as returned by the row store.
pub type Row = serde_json::Value;

/// Trait for the hosted relational store.
#[async_trait]
pub trait DataGateway: Send + Sync {
    /// Read rows. With `query.single` set the result holds exactly one row
    /// or the call fails with [`QueryError::NotFound`].
    async fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>, QueryError>;

    /// Insert rows.
    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<(), QueryError>;

    /// Delete every row matching all of `filters`.
    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<(), QueryError>;
}

/// Select and decode rows.
pub async fn fetch_rows<T: DeserializeOwned>(
    gateway: &dyn DataGateway,
    table: Table,
    query: &SelectQuery,
) -> Result<Vec<T>, QueryError> {
    let rows = gateway.select(table, query).await?;
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(QueryError::from))
        .collect()
}

/// Select and decode exactly one row.
pub async fn fetch_one<T: DeserializeOwned>(
    gateway: &dyn DataGateway,
    table: Table,
    query: SelectQuery,
) -> Result<T, QueryError> {
    let query = query.single();
    let mut rows: Vec<T> = fetch_rows(gateway, table, &query).await?;
    match rows.len() {
        1 => Ok(rows.remove(0)),
        0 => Err(QueryError::NotFound {
            table: table.as_str().to_string(),
        }),
        n => Err(QueryError::Decode {
            message: format!("expected one row from '{}', got {}", table, n),
        }),
    }
}

/// Encode and insert a single row.
pub async fn insert_row<T: Serialize + Sync>(
    gateway: &dyn DataGateway,
    table: Table,
    row: &T,
) -> Result<(), QueryError> {
    let value = serde_json::to_value(row)?;
    gateway.insert(table, vec![value]).await
}
