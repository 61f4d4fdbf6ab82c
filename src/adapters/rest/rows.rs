//! Row store over the backend's REST interface (`/rest/v1`).

use async_trait::async_trait;
use serde_json::Value;

use super::client::{read_error, ApiErrorBody, BackendClient};
use crate::error::QueryError;
use crate::models::{Filter, SelectQuery, Table};
use crate::traits::{DataGateway, Row};

/// Asks the row store for a bare object instead of an array.
const SINGLE_OBJECT: &str = "application/vnd.pgrst.object+json";

/// Unique-violation code reported by the database.
const UNIQUE_VIOLATION: &str = "23505";

fn filter_pairs(filters: &[Filter]) -> Vec<String> {
    filters
        .iter()
        .map(|f| {
            format!(
                "{}=eq.{}",
                urlencoding::encode(&f.column),
                urlencoding::encode(&f.value)
            )
        })
        .collect()
}

/// Encode a read as the row store's query string.
pub(crate) fn query_string(query: &SelectQuery) -> String {
    let mut parts = vec![format!("select={}", urlencoding::encode(&query.columns))];
    parts.extend(filter_pairs(&query.filters));
    if let Some(order) = &query.order {
        parts.push(format!(
            "order={}.{}",
            urlencoding::encode(&order.column),
            if order.ascending { "asc" } else { "desc" }
        ));
    }
    parts.join("&")
}

fn status_error(table: Table, status: u16, body: ApiErrorBody, single: bool) -> QueryError {
    let table_name = table.as_str().to_string();
    if status == 409 || body.code_str().as_deref() == Some(UNIQUE_VIOLATION) {
        return QueryError::Conflict {
            table: table_name,
            message: body.text(),
        };
    }
    // 406 on a single-row read: zero or several rows matched.
    if single && status == 406 {
        let zero_rows = body
            .details
            .as_deref()
            .map(|d| d.contains("0 rows"))
            .unwrap_or(true);
        if zero_rows {
            return QueryError::NotFound { table: table_name };
        }
    }
    QueryError::Status {
        table: table_name,
        status,
        message: body.text(),
    }
}

impl BackendClient {
    fn rows_url(&self, table: Table) -> String {
        self.url(&format!("/rest/v1/{}", table.as_str()))
    }
}

#[async_trait]
impl DataGateway for BackendClient {
    async fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>, QueryError> {
        let url = format!("{}?{}", self.rows_url(table), query_string(query));
        tracing::debug!("GET {}", url);

        let mut request = self.http().get(&url);
        if query.single {
            request = request.header("Accept", SINGLE_OBJECT);
        }
        let response = self.authorize(request).await.send().await?;

        if !response.status().is_success() {
            let (status, body) = read_error(response).await;
            return Err(status_error(table, status, body, query.single));
        }

        let body: Value = response.json().await?;
        match body {
            Value::Array(rows) => Ok(rows),
            row @ Value::Object(_) if query.single => Ok(vec![row]),
            other => Err(QueryError::Decode {
                message: format!("expected rows from '{}', got {}", table, other),
            }),
        }
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<(), QueryError> {
        tracing::debug!("POST {} ({} rows)", table, rows.len());
        let request = self
            .http()
            .post(self.rows_url(table))
            .header("Prefer", "return=minimal")
            .json(&rows);
        let response = self.authorize(request).await.send().await?;

        if !response.status().is_success() {
            let (status, body) = read_error(response).await;
            return Err(status_error(table, status, body, false));
        }
        Ok(())
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<(), QueryError> {
        let url = format!("{}?{}", self.rows_url(table), filter_pairs(filters).join("&"));
        tracing::debug!("DELETE {}", url);
        let response = self.authorize(self.http().delete(&url)).await.send().await?;

        if !response.status().is_success() {
            let (status, body) = read_error(response).await;
            return Err(status_error(table, status, body, false));
        }
        Ok(())
    }
}
