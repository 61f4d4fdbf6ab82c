//! Role gate for the elevated-access views.
//!
//! ```text
//! Unresolved ──► Granted   (profile fetched, flag true)
//!     │
//!     └────────► Denied    (no user, fetch failed, or flag false)
//! ```
//!
//! The gate resolves once. A new visit builds a new gate. A detached gate
//! stays where it was.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::models::{SelectQuery, Table, UserIdentity};
use crate::traits::{fetch_one, DataGateway};
use crate::view_model::LoadGuard;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    SignedOut,
    NotElevated,
    /// The profile could not be read; carries the display message.
    LookupFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AccessState {
    /// Still checking. Treated as denied by every consumer.
    #[default]
    Unresolved,
    Denied(DenyReason),
    Granted,
}

impl AccessState {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessState::Granted)
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, AccessState::Unresolved)
    }
}

/// The single column the gate reads.
#[derive(Debug, Deserialize)]
struct ElevationFlag {
    #[serde(default)]
    is_special: bool,
}

pub struct AccessGate {
    gateway: Arc<dyn DataGateway>,
    state: RwLock<AccessState>,
    guard: LoadGuard,
}

impl AccessGate {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(AccessState::Unresolved),
            guard: LoadGuard::new(),
        }
    }

    /// Stop applying decisions, including one whose lookup is in flight.
    pub fn detach(&self) {
        self.guard.detach();
    }

    pub fn is_detached(&self) -> bool {
        self.guard.is_detached()
    }

    pub async fn state(&self) -> AccessState {
        self.state.read().await.clone()
    }

    /// Decide access for `user`. Once resolved, later calls return the
    /// existing decision without another fetch.
    pub async fn resolve(&self, user: Option<&UserIdentity>) -> AccessState {
        {
            let current = self.state.read().await;
            if current.is_resolved() || self.guard.is_detached() {
                return current.clone();
            }
        }

        let decision = match user {
            None => AccessState::Denied(DenyReason::SignedOut),
            Some(user) => {
                let query = SelectQuery::all().columns("is_special").eq("id", &user.id);
                match fetch_one::<ElevationFlag>(self.gateway.as_ref(), Table::Profiles, query)
                    .await
                {
                    Ok(ElevationFlag { is_special: true }) => AccessState::Granted,
                    Ok(_) => AccessState::Denied(DenyReason::NotElevated),
                    Err(e) => {
                        warn!("Access check for {} failed [{}]: {}", user.id, e.error_code(), e);
                        AccessState::Denied(DenyReason::LookupFailed(e.user_message()))
                    }
                }
            }
        };

        let mut state = self.state.write().await;
        if self.guard.is_detached() {
            debug!("Access gate detached; dropping {:?}", decision);
        } else if !state.is_resolved() {
            debug!("Access gate resolved: {:?}", decision);
            *state = decision;
        }
        state.clone()
    }
}
