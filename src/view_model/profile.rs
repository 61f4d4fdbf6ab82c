//! The signed-in user's own profile.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, warn};

use super::generation::LoadGuard;
use crate::models::{Profile, SelectQuery, Table, UserIdentity};
use crate::traits::{fetch_one, DataGateway};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProfileView {
    #[default]
    Loading,
    /// No session; the caller should send the user to sign in.
    SignInRequired,
    Ready(Box<Profile>),
    Failed(String),
}

#[derive(Debug, Default)]
struct State {
    view: ProfileView,
    applied: u64,
}

pub struct ProfileViewModel {
    gateway: Arc<dyn DataGateway>,
    state: RwLock<State>,
    guard: LoadGuard,
}

impl ProfileViewModel {
    pub fn new(gateway: Arc<dyn DataGateway>) -> Self {
        Self {
            gateway,
            state: RwLock::new(State::default()),
            guard: LoadGuard::new(),
        }
    }

    pub async fn view(&self) -> ProfileView {
        self.state.read().await.view.clone()
    }

    /// Fetch the profile keyed by `user`'s id. Returns whether the result
    /// was applied.
    pub async fn load(&self, user: Option<&UserIdentity>) -> bool {
        if self.guard.is_detached() {
            return false;
        }
        let ticket = self.guard.issue();

        let view = match user {
            None => ProfileView::SignInRequired,
            Some(user) => {
                debug!("Loading profile {}", user.id);
                let query = SelectQuery::all().eq("id", &user.id);
                match fetch_one::<Profile>(self.gateway.as_ref(), Table::Profiles, query).await {
                    Ok(profile) => ProfileView::Ready(Box::new(profile)),
                    Err(e) => {
                        warn!("Loading profile {} failed [{}]: {}", user.id, e.error_code(), e);
                        ProfileView::Failed(e.user_message())
                    }
                }
            }
        };

        let mut state = self.state.write().await;
        if !self.guard.admits(ticket, state.applied) {
            return false;
        }
        state.applied = ticket.generation();
        state.view = view;
        true
    }

    pub fn detach(&self) {
        self.guard.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::InMemoryGateway;
    use serde_json::json;

    fn gateway() -> Arc<InMemoryGateway> {
        Arc::new(InMemoryGateway::social().with_rows(
            Table::Profiles,
            vec![json!({
                "id": "u-1",
                "first_name": "Misty",
                "middle_name": null,
                "last_name": "Waterflower",
                "date_of_birth": "1998-03-15",
                "country": "Japan",
                "city": "Cerulean",
                "avatar_url": null,
                "is_special": false
            })],
        ))
    }

    #[tokio::test]
    async fn test_loads_own_profile() {
        let vm = ProfileViewModel::new(gateway());
        assert_eq!(vm.view().await, ProfileView::Loading);

        vm.load(Some(&UserIdentity::new("u-1", "misty@example.com"))).await;
        match vm.view().await {
            ProfileView::Ready(profile) => assert_eq!(profile.city, "Cerulean"),
            other => panic!("expected profile, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_signed_out_requires_sign_in() {
        let vm = ProfileViewModel::new(gateway());
        vm.load(None).await;
        assert_eq!(vm.view().await, ProfileView::SignInRequired);
    }

    #[tokio::test]
    async fn test_missing_profile_fails() {
        let vm = ProfileViewModel::new(gateway());
        vm.load(Some(&UserIdentity::new("nobody", "n@example.com"))).await;
        assert_eq!(
            vm.view().await,
            ProfileView::Failed("The requested record was not found.".to_string())
        );
    }
}
