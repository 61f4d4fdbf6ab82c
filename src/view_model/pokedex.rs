//! The Pokédex: canonical list, search, favorites and region label.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::list::{CollectionKind, ListState, ListViewModel};
use super::load_state::LoadState;
use crate::models::{PokedexEntry, Region};
use crate::traits::DataGateway;

/// Entries matching `term`, in their original order.
///
/// Case-insensitive substring match against the name, any type tag, or the
/// decimal number. An empty term matches everything.
pub fn filter_by_search_term(entries: &[PokedexEntry], term: &str) -> Vec<PokedexEntry> {
    if term.is_empty() {
        return entries.to_vec();
    }
    let needle = term.to_lowercase();
    entries
        .iter()
        .filter(|entry| entry.matches_lowercase(&needle))
        .cloned()
        .collect()
}

#[derive(Debug, Default)]
struct Preferences {
    search_term: String,
    favorites: BTreeSet<u32>,
}

pub struct PokedexViewModel {
    list: ListViewModel<PokedexEntry>,
    region: Region,
    prefs: RwLock<Preferences>,
}

impl PokedexViewModel {
    pub fn new(gateway: Arc<dyn DataGateway>, region: Region) -> Self {
        Self {
            list: ListViewModel::new(gateway, CollectionKind::Pokedex),
            region,
            prefs: RwLock::new(Preferences::default()),
        }
    }

    /// Fetch all entries, ascending by number. The region is not a filter.
    pub async fn load(&self) -> bool {
        self.list.load().await
    }

    pub fn region(&self) -> &Region {
        &self.region
    }

    pub async fn entries(&self) -> Vec<PokedexEntry> {
        self.list.items().await
    }

    pub async fn snapshot(&self) -> ListState<PokedexEntry> {
        self.list.snapshot().await
    }

    pub async fn load_state(&self) -> LoadState {
        self.list.load_state().await
    }

    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.prefs.write().await.search_term = term.into();
    }

    pub async fn search_term(&self) -> String {
        self.prefs.read().await.search_term.clone()
    }

    /// The visible entries, derived from the current list and term on every
    /// call.
    pub async fn filtered(&self) -> Vec<PokedexEntry> {
        let term = self.search_term().await;
        self.list
            .with_items(|entries| filter_by_search_term(entries, &term))
            .await
    }

    /// Add or remove `id` from the favorites. Returns whether it is now a
    /// favorite.
    pub async fn toggle_favorite(&self, id: u32) -> bool {
        let mut prefs = self.prefs.write().await;
        if prefs.favorites.remove(&id) {
            false
        } else {
            prefs.favorites.insert(id);
            true
        }
    }

    pub async fn is_favorite(&self, id: u32) -> bool {
        self.prefs.read().await.favorites.contains(&id)
    }

    pub async fn favorites(&self) -> BTreeSet<u32> {
        self.prefs.read().await.favorites.clone()
    }

    pub fn detach(&self) {
        self.list.detach();
    }
}
