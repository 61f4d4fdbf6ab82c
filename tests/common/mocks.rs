//! Mock implementations for test fixtures.
//!
//! Re-exports the in-memory collaborators from `pokesocial::adapters::mock`
//! and adds a gateway whose responses the test releases by hand, for
//! exercising out-of-order and late responses.

#![allow(dead_code)]

pub use pokesocial::adapters::mock::{
    AuthOp, GatewayCall, InMemoryAuth, InMemoryGateway, InMemoryStorage, Op,
};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use pokesocial::error::QueryError;
use pokesocial::models::{Filter, SelectQuery, Table};
use pokesocial::traits::{DataGateway, Row};
use tokio::sync::oneshot;

pub type SelectReply = Result<Vec<Row>, QueryError>;

/// A gateway whose selects block until the test sends their reply.
///
/// Each [`expect_select`](Self::expect_select) queues one slot; selects take
/// slots in call order. A select with no queued slot answers with no rows.
#[derive(Default)]
pub struct ScriptedGateway {
    slots: Mutex<VecDeque<oneshot::Receiver<SelectReply>>>,
    selects: AtomicUsize,
}

impl ScriptedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a slot for the next select and return its release handle.
    pub fn expect_select(&self) -> oneshot::Sender<SelectReply> {
        let (tx, rx) = oneshot::channel();
        self.slots.lock().unwrap().push_back(rx);
        tx
    }

    /// Number of selects that have started.
    pub fn selects(&self) -> usize {
        self.selects.load(Ordering::SeqCst)
    }

    /// Yield until `n` selects have started.
    pub async fn wait_for_selects(&self, n: usize) {
        while self.selects() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl DataGateway for ScriptedGateway {
    async fn select(&self, _table: Table, _query: &SelectQuery) -> Result<Vec<Row>, QueryError> {
        let slot = self.slots.lock().unwrap().pop_front();
        self.selects.fetch_add(1, Ordering::SeqCst);
        match slot {
            Some(rx) => rx.await.unwrap_or_else(|_| {
                Err(QueryError::Connection {
                    message: "reply dropped".to_string(),
                })
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn insert(&self, _table: Table, _rows: Vec<Row>) -> Result<(), QueryError> {
        Ok(())
    }

    async fn delete(&self, _table: Table, _filters: &[Filter]) -> Result<(), QueryError> {
        Ok(())
    }
}
