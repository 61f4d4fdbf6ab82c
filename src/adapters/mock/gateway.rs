//! In-memory row store.
//!
//! Supports the subset of the backend's behaviour the client relies on:
//! equality filters, ordering, single-row reads, embedded relations,
//! uniqueness constraints and generated `id`/`created_at` columns. Every call
//! is recorded, and any (operation, table) pair can be told to fail.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::QueryError;
use crate::models::{Filter, SelectQuery, Table};
use crate::traits::{DataGateway, Row};

/// Generated timestamps start here and advance one second per insert, so
/// later inserts always sort as newer.
const CLOCK_EPOCH_SECS: i64 = 1_700_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    Select,
    Insert,
    Delete,
}

/// A request the gateway received, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
    Select { table: Table, query: SelectQuery },
    Insert { table: Table, rows: Vec<Row> },
    Delete { table: Table, filters: Vec<Filter> },
}

impl GatewayCall {
    pub fn op(&self) -> Op {
        match self {
            GatewayCall::Select { .. } => Op::Select,
            GatewayCall::Insert { .. } => Op::Insert,
            GatewayCall::Delete { .. } => Op::Delete,
        }
    }

    pub fn table(&self) -> Table {
        match self {
            GatewayCall::Select { table, .. }
            | GatewayCall::Insert { table, .. }
            | GatewayCall::Delete { table, .. } => *table,
        }
    }
}

#[derive(Debug, Clone)]
enum Embed {
    /// Child rows whose `foreign_key` equals the parent's `id`.
    Many { child: Table, foreign_key: String },
    /// The child row whose `id` equals the parent's `local_key`.
    One { child: Table, local_key: String },
}

impl Embed {
    fn child(&self) -> Table {
        match self {
            Embed::Many { child, .. } | Embed::One { child, .. } => *child,
        }
    }
}

#[derive(Default)]
struct State {
    tables: HashMap<Table, Vec<Row>>,
    embeds: HashMap<Table, Vec<Embed>>,
    unique: HashMap<Table, Vec<String>>,
    failures: HashMap<(Op, Table), QueryError>,
    calls: Vec<GatewayCall>,
    sequence: i64,
}

/// In-memory [`DataGateway`].
#[derive(Default)]
pub struct InMemoryGateway {
    state: Mutex<State>,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway configured with the application's relations and
    /// constraints: posts embed their author, likes and comments; comments
    /// embed their author; a like is unique per (post, user).
    pub fn social() -> Self {
        Self::new()
            .with_embed_one(Table::Posts, Table::Profiles, "user_id")
            .with_embed_many(Table::Posts, Table::Likes, "post_id")
            .with_embed_many(Table::Posts, Table::Comments, "post_id")
            .with_embed_one(Table::Comments, Table::Profiles, "user_id")
            .with_unique(Table::Likes, &["post_id", "user_id"])
            .with_unique(Table::Profiles, &["id"])
            .with_unique(Table::Pokemon, &["id"])
    }

    pub fn with_rows(self, table: Table, rows: Vec<Row>) -> Self {
        self.lock().tables.entry(table).or_default().extend(rows);
        self
    }

    pub fn with_embed_many(self, parent: Table, child: Table, foreign_key: &str) -> Self {
        self.lock().embeds.entry(parent).or_default().push(Embed::Many {
            child,
            foreign_key: foreign_key.to_string(),
        });
        self
    }

    pub fn with_embed_one(self, parent: Table, child: Table, local_key: &str) -> Self {
        self.lock().embeds.entry(parent).or_default().push(Embed::One {
            child,
            local_key: local_key.to_string(),
        });
        self
    }

    pub fn with_unique(self, table: Table, columns: &[&str]) -> Self {
        self.lock()
            .unique
            .insert(table, columns.iter().map(|c| c.to_string()).collect());
        self
    }

    /// Make every `op` on `table` fail with `error` until [`recover`](Self::recover).
    pub fn fail(&self, op: Op, table: Table, error: QueryError) {
        self.lock().failures.insert((op, table), error);
    }

    pub fn recover(&self, op: Op, table: Table) {
        self.lock().failures.remove(&(op, table));
    }

    /// Snapshot of a table's stored rows, without embeds.
    pub fn rows(&self, table: Table) -> Vec<Row> {
        self.lock().tables.get(&table).cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<GatewayCall> {
        self.lock().calls.clone()
    }

    pub fn count(&self, op: Op, table: Table) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.op() == op && call.table() == table)
            .count()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl State {
    fn check_failure(&self, op: Op, table: Table) -> Result<(), QueryError> {
        match self.failures.get(&(op, table)) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>, QueryError> {
        let mut rows: Vec<Row> = self
            .tables
            .get(&table)
            .into_iter()
            .flatten()
            .filter(|row| matches_all(row, &query.filters))
            .cloned()
            .collect();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let ord = compare_values(
                    a.get(&order.column).unwrap_or(&Value::Null),
                    b.get(&order.column).unwrap_or(&Value::Null),
                );
                if order.ascending {
                    ord
                } else {
                    ord.reverse()
                }
            });
        }

        if query.single && rows.len() != 1 {
            return Err(if rows.is_empty() {
                QueryError::NotFound {
                    table: table.as_str().to_string(),
                }
            } else {
                QueryError::Status {
                    table: table.as_str().to_string(),
                    status: 406,
                    message: format!("JSON object requested, multiple ({}) rows returned", rows.len()),
                }
            });
        }

        Ok(rows
            .into_iter()
            .map(|row| self.embed(table, row, &query.columns))
            .collect())
    }

    /// Attach the relations named in `columns` (as `child(...)`) to `row`.
    fn embed(&self, table: Table, mut row: Row, columns: &str) -> Row {
        let Some(embeds) = self.embeds.get(&table) else {
            return row;
        };

        for embed in embeds {
            let child = embed.child();
            if !columns.contains(&format!("{}(", child.as_str())) {
                continue;
            }

            let value = match embed {
                Embed::Many { foreign_key, .. } => {
                    let parent_id = value_key(row.get("id").unwrap_or(&Value::Null));
                    Value::Array(
                        self.tables
                            .get(&child)
                            .into_iter()
                            .flatten()
                            .filter(|c| {
                                value_key(c.get(foreign_key).unwrap_or(&Value::Null)) == parent_id
                            })
                            .map(|c| self.embed(child, c.clone(), columns))
                            .collect(),
                    )
                }
                Embed::One { local_key, .. } => {
                    let key = value_key(row.get(local_key).unwrap_or(&Value::Null));
                    self.tables
                        .get(&child)
                        .into_iter()
                        .flatten()
                        .find(|c| value_key(c.get("id").unwrap_or(&Value::Null)) == key)
                        .map(|c| self.embed(child, c.clone(), columns))
                        .unwrap_or(Value::Null)
                }
            };

            if let Value::Object(map) = &mut row {
                map.insert(child.as_str().to_string(), value);
            }
        }
        row
    }

    fn insert(&mut self, table: Table, rows: Vec<Row>) -> Result<(), QueryError> {
        let mut prepared = Vec::with_capacity(rows.len());
        for row in rows {
            let Value::Object(mut map) = row else {
                return Err(QueryError::Status {
                    table: table.as_str().to_string(),
                    status: 400,
                    message: "row must be a JSON object".to_string(),
                });
            };
            self.sequence += 1;
            let seq = self.sequence;
            map.entry("id")
                .or_insert_with(|| Value::String(format!("{}-{}", table, seq)));
            map.entry("created_at")
                .or_insert_with(|| Value::String(clock(seq)));
            prepared.push(Value::Object(map));
        }

        if let Some(columns) = self.unique.get(&table) {
            let existing = self.tables.get(&table);
            for (i, row) in prepared.iter().enumerate() {
                let clash = existing
                    .into_iter()
                    .flatten()
                    .chain(prepared[..i].iter())
                    .any(|other| same_key(other, row, columns));
                if clash {
                    return Err(QueryError::Conflict {
                        table: table.as_str().to_string(),
                        message: format!(
                            "duplicate key value violates unique constraint on ({})",
                            columns.join(", ")
                        ),
                    });
                }
            }
        }

        self.tables.entry(table).or_default().extend(prepared);
        Ok(())
    }

    fn delete(&mut self, table: Table, filters: &[Filter]) {
        if let Some(rows) = self.tables.get_mut(&table) {
            rows.retain(|row| !matches_all(row, filters));
        }
    }
}

#[async_trait]
impl DataGateway for InMemoryGateway {
    async fn select(&self, table: Table, query: &SelectQuery) -> Result<Vec<Row>, QueryError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::Select {
            table,
            query: query.clone(),
        });
        state.check_failure(Op::Select, table)?;
        state.select(table, query)
    }

    async fn insert(&self, table: Table, rows: Vec<Row>) -> Result<(), QueryError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::Insert {
            table,
            rows: rows.clone(),
        });
        state.check_failure(Op::Insert, table)?;
        state.insert(table, rows)
    }

    async fn delete(&self, table: Table, filters: &[Filter]) -> Result<(), QueryError> {
        let mut state = self.lock();
        state.calls.push(GatewayCall::Delete {
            table,
            filters: filters.to_vec(),
        });
        state.check_failure(Op::Delete, table)?;
        state.delete(table, filters);
        Ok(())
    }
}

/// The text a value is compared as in filters and keys.
fn value_key(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches_all(row: &Row, filters: &[Filter]) -> bool {
    filters.iter().all(|filter| {
        row.get(&filter.column)
            .map(|v| value_key(v) == filter.value)
            .unwrap_or(false)
    })
}

fn same_key(a: &Row, b: &Row, columns: &[String]) -> bool {
    columns.iter().all(|c| {
        value_key(a.get(c).unwrap_or(&Value::Null)) == value_key(b.get(c).unwrap_or(&Value::Null))
    })
}

fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => value_key(a).cmp(&value_key(b)),
    }
}

fn clock(seq: i64) -> String {
    DateTime::<Utc>::from_timestamp(CLOCK_EPOCH_SECS + seq, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_select_orders_and_filters() {
        let gateway = InMemoryGateway::new().with_rows(
            Table::Pokemon,
            vec![
                json!({"id": 25, "name": "Pikachu"}),
                json!({"id": 1, "name": "Bulbasaur"}),
                json!({"id": 4, "name": "Charmander"}),
            ],
        );

        let rows = gateway
            .select(Table::Pokemon, &SelectQuery::all().order_by("id", true))
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 4, 25]);

        let rows = gateway
            .select(Table::Pokemon, &SelectQuery::all().eq("id", "4"))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], "Charmander");
    }

    #[tokio::test]
    async fn test_single_with_no_rows_is_not_found() {
        let gateway = InMemoryGateway::new();
        let err = gateway
            .select(Table::Profiles, &SelectQuery::all().eq("id", "nope").single())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::NotFound {
                table: "profiles".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_embeds_only_when_requested() {
        let gateway = InMemoryGateway::social()
            .with_rows(
                Table::Profiles,
                vec![json!({"id": "u-1", "first_name": "Ash", "last_name": "Ketchum"})],
            )
            .with_rows(
                Table::Posts,
                vec![json!({"id": "p-1", "user_id": "u-1", "content": "hi"})],
            )
            .with_rows(Table::Likes, vec![json!({"post_id": "p-1", "user_id": "u-1"})]);

        let plain = gateway
            .select(Table::Posts, &SelectQuery::all())
            .await
            .unwrap();
        assert!(plain[0].get("likes").is_none());

        let embedded = gateway
            .select(
                Table::Posts,
                &SelectQuery::all().columns("*,profiles(first_name),likes(user_id)"),
            )
            .await
            .unwrap();
        assert_eq!(embedded[0]["profiles"]["first_name"], "Ash");
        assert_eq!(embedded[0]["likes"].as_array().unwrap().len(), 1);
        assert!(embedded[0].get("comments").is_none());
    }

    #[tokio::test]
    async fn test_unique_constraint_rejects_duplicate_like() {
        let gateway = InMemoryGateway::social();
        let like = json!({"post_id": "p-1", "user_id": "u-1"});
        gateway.insert(Table::Likes, vec![like.clone()]).await.unwrap();
        let err = gateway.insert(Table::Likes, vec![like]).await.unwrap_err();
        assert!(matches!(err, QueryError::Conflict { .. }));
        assert_eq!(gateway.rows(Table::Likes).len(), 1);
    }

    #[tokio::test]
    async fn test_insert_generates_increasing_timestamps() {
        let gateway = InMemoryGateway::new();
        gateway.insert(Table::Posts, vec![json!({"content": "a"})]).await.unwrap();
        gateway.insert(Table::Posts, vec![json!({"content": "b"})]).await.unwrap();

        let rows = gateway
            .select(Table::Posts, &SelectQuery::all().order_by("created_at", false))
            .await
            .unwrap();
        assert_eq!(rows[0]["content"], "b");
        assert_ne!(rows[0]["id"], rows[1]["id"]);
    }

    #[tokio::test]
    async fn test_delete_matches_all_filters() {
        let gateway = InMemoryGateway::new().with_rows(
            Table::Likes,
            vec![
                json!({"post_id": "p-1", "user_id": "u-1"}),
                json!({"post_id": "p-1", "user_id": "u-2"}),
            ],
        );
        gateway
            .delete(
                Table::Likes,
                &[Filter::eq("post_id", "p-1"), Filter::eq("user_id", "u-1")],
            )
            .await
            .unwrap();
        let rows = gateway.rows(Table::Likes);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["user_id"], "u-2");
    }

    #[tokio::test]
    async fn test_failure_injection_and_call_log() {
        let gateway = InMemoryGateway::new();
        gateway.fail(
            Op::Select,
            Table::Posts,
            QueryError::Connection {
                message: "offline".to_string(),
            },
        );
        assert!(gateway.select(Table::Posts, &SelectQuery::all()).await.is_err());

        gateway.recover(Op::Select, Table::Posts);
        assert!(gateway.select(Table::Posts, &SelectQuery::all()).await.is_ok());
        assert_eq!(gateway.count(Op::Select, Table::Posts), 2);
        assert_eq!(gateway.calls()[0].op(), Op::Select);
    }
}
