//! The user listing, visible only with elevated access.

use std::sync::Arc;

use super::list::{CollectionKind, ListViewModel};
use super::load_state::LoadState;
use crate::access_gate::{AccessGate, AccessState};
use crate::models::{Profile, UserIdentity};
use crate::traits::DataGateway;

/// What the page may render.
#[derive(Debug, Clone, PartialEq)]
pub enum UsersView {
    /// Access not decided yet.
    Checking,
    Denied,
    Loading,
    Failed(String),
    Ready(Vec<Profile>),
}

pub struct UsersPage {
    gate: AccessGate,
    list: ListViewModel<Profile>,
}

impl UsersPage {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gate: AccessGate::new(gateway.clone()),
            list: ListViewModel::new(gateway, CollectionKind::Users),
        }
    }

    /// Check access and fetch profiles concurrently. Signed out, the gate
    /// denies at once and the profiles are never fetched.
    pub async fn load(&self, user: Option<&UserIdentity>) {
        match user {
            None => {
                self.gate.resolve(None).await;
            }
            Some(_) => {
                tokio::join!(self.gate.resolve(user), self.list.load());
            }
        }
    }

    pub async fn access(&self) -> AccessState {
        self.gate.state().await
    }

    /// The listing is shown only once access is granted.
    pub async fn view(&self) -> UsersView {
        match self.gate.state().await {
            AccessState::Unresolved => UsersView::Checking,
            AccessState::Denied(_) => UsersView::Denied,
            AccessState::Granted => {
                let snapshot = self.list.snapshot().await;
                match snapshot.load {
                    LoadState::Loading => UsersView::Loading,
                    LoadState::Failed(message) => UsersView::Failed(message),
                    LoadState::Ready => UsersView::Ready(snapshot.items),
                }
            }
        }
    }

    /// Drop late responses for both the gate and the listing.
    pub fn detach(&self) {
        self.gate.detach();
        self.list.detach();
    }
}
