//! Generic fetch-on-load list.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::generation::LoadGuard;
use super::load_state::LoadState;
use crate::models::{SelectQuery, Table};
use crate::traits::{fetch_rows, DataGateway};

/// Posts with their author, likes and comments (comments with their author).
pub const POSTS_SELECT: &str = "*,profiles(first_name,last_name,avatar_url),likes(user_id),comments(id,content,user_id,created_at,profiles(first_name,last_name,avatar_url))";

/// What a list shows, and so where and in which order it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    /// Newest first.
    Posts,
    /// Ascending by number.
    Pokedex,
    /// Newest first.
    Users,
}

impl CollectionKind {
    pub fn table(&self) -> Table {
        match self {
            CollectionKind::Posts => Table::Posts,
            CollectionKind::Pokedex => Table::Pokemon,
            CollectionKind::Users => Table::Profiles,
        }
    }

    pub fn query(&self) -> SelectQuery {
        match self {
            CollectionKind::Posts => SelectQuery::all()
                .columns(POSTS_SELECT)
                .order_by("created_at", false),
            CollectionKind::Pokedex => SelectQuery::all().order_by("id", true),
            CollectionKind::Users => SelectQuery::all().order_by("created_at", false),
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CollectionKind::Posts => "feed",
            CollectionKind::Pokedex => "pokedex",
            CollectionKind::Users => "users",
        })
    }
}

/// Snapshot of a list view.
#[derive(Debug, Clone, PartialEq)]
pub struct ListState<T> {
    /// The canonical list, replaced wholesale by each applied load.
    pub items: Vec<T>,
    pub load: LoadState,
    /// Outcome of the last mutation, if it failed.
    pub notice: Option<String>,
    applied: u64,
}

impl<T> Default for ListState<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            load: LoadState::Loading,
            notice: None,
            applied: 0,
        }
    }
}

pub struct ListViewModel<T> {
    gateway: Arc<dyn DataGateway>,
    kind: CollectionKind,
    state: RwLock<ListState<T>>,
    guard: LoadGuard,
}

impl<T> ListViewModel<T>
where
    T: DeserializeOwned + Clone + Send + Sync,
{
    pub fn new(gateway: Arc<dyn DataGateway>, kind: CollectionKind) -> Self {
        Self {
            gateway,
            kind,
            state: RwLock::new(ListState::default()),
            guard: LoadGuard::new(),
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// Fetch the collection and replace the canonical list.
    ///
    /// On failure the previous list is kept and the error is shown instead.
    /// Returns whether this response was applied; a response is dropped when
    /// a newer load has already landed or the view was detached.
    pub async fn load(&self) -> bool {
        if self.guard.is_detached() {
            return false;
        }
        let ticket = self.guard.issue();
        debug!("Loading {} (generation {})", self.kind, ticket.generation());

        let result: Result<Vec<T>, _> =
            fetch_rows(self.gateway.as_ref(), self.kind.table(), &self.kind.query()).await;

        let mut state = self.state.write().await;
        if !self.guard.admits(ticket, state.applied) {
            debug!(
                "Dropping {} response (generation {}, applied {})",
                self.kind,
                ticket.generation(),
                state.applied
            );
            return false;
        }
        state.applied = ticket.generation();
        match result {
            Ok(items) => {
                debug!("Loaded {} {} rows", items.len(), self.kind);
                state.items = items;
                state.load = LoadState::Ready;
            }
            Err(e) => {
                warn!("Loading {} failed [{}]: {}", self.kind, e.error_code(), e);
                state.load = LoadState::Failed(e.user_message());
            }
        }
        true
    }

    pub async fn snapshot(&self) -> ListState<T> {
        self.state.read().await.clone()
    }

    pub async fn items(&self) -> Vec<T> {
        self.state.read().await.items.clone()
    }

    pub async fn load_state(&self) -> LoadState {
        self.state.read().await.load.clone()
    }

    pub async fn notice(&self) -> Option<String> {
        self.state.read().await.notice.clone()
    }

    pub(crate) async fn set_notice(&self, notice: Option<String>) {
        if !self.guard.is_detached() {
            self.state.write().await.notice = notice;
        }
    }

    /// Run `f` against the canonical list without cloning it.
    pub(crate) async fn with_items<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        let state = self.state.read().await;
        f(&state.items)
    }

    /// Stop applying responses; the view is gone.
    pub fn detach(&self) {
        self.guard.detach();
    }

    pub fn is_detached(&self) -> bool {
        self.guard.is_detached()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{InMemoryGateway, Op};
    use crate::error::QueryError;
    use crate::models::{PokedexEntry, Profile};
    use serde_json::json;

    fn pokemon_gateway() -> Arc<InMemoryGateway> {
        Arc::new(InMemoryGateway::social().with_rows(
            Table::Pokemon,
            vec![
                json!({"id": 25, "name": "Pikachu", "types": ["electric"], "description": ""}),
                json!({"id": 1, "name": "Bulbasaur", "types": ["grass", "poison"], "description": ""}),
            ],
        ))
    }

    #[test]
    fn test_collection_queries() {
        let posts = CollectionKind::Posts.query();
        assert_eq!(posts.columns, POSTS_SELECT);
        assert!(!posts.order.unwrap().ascending);

        let pokedex = CollectionKind::Pokedex.query();
        let order = pokedex.order.unwrap();
        assert_eq!(order.column, "id");
        assert!(order.ascending);

        assert_eq!(CollectionKind::Users.table(), Table::Profiles);
    }

    #[tokio::test]
    async fn test_load_replaces_list_in_order() {
        let gateway = pokemon_gateway();
        let vm: ListViewModel<PokedexEntry> =
            ListViewModel::new(gateway.clone(), CollectionKind::Pokedex);
        assert!(vm.load_state().await.is_loading());

        assert!(vm.load().await);
        let ids: Vec<u32> = vm.items().await.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 25]);
        assert_eq!(vm.load_state().await, LoadState::Ready);
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_list() {
        let gateway = pokemon_gateway();
        let vm: ListViewModel<PokedexEntry> =
            ListViewModel::new(gateway.clone(), CollectionKind::Pokedex);
        vm.load().await;

        gateway.fail(
            Op::Select,
            Table::Pokemon,
            QueryError::Connection {
                message: "offline".to_string(),
            },
        );
        vm.load().await;

        let snapshot = vm.snapshot().await;
        assert_eq!(snapshot.items.len(), 2);
        assert!(snapshot.load.error().is_some());
    }

    #[tokio::test]
    async fn test_first_load_failure_is_empty() {
        let gateway = Arc::new(InMemoryGateway::new());
        gateway.fail(
            Op::Select,
            Table::Profiles,
            QueryError::Status {
                table: "profiles".to_string(),
                status: 500,
                message: "boom".to_string(),
            },
        );
        let vm: ListViewModel<Profile> = ListViewModel::new(gateway, CollectionKind::Users);
        vm.load().await;
        let snapshot = vm.snapshot().await;
        assert!(snapshot.items.is_empty());
        assert_eq!(
            snapshot.load.error(),
            Some("The server is experiencing issues. Please try again later.")
        );
    }

    #[tokio::test]
    async fn test_detached_view_ignores_loads() {
        let gateway = pokemon_gateway();
        let vm: ListViewModel<PokedexEntry> =
            ListViewModel::new(gateway.clone(), CollectionKind::Pokedex);
        vm.detach();
        assert!(!vm.load().await);
        assert!(vm.items().await.is_empty());
        assert_eq!(gateway.count(Op::Select, Table::Pokemon), 0);
    }
}
