//! View models for the fetch-on-load screens.
//!
//! Each view model owns its state behind a `tokio::sync::RwLock`. Locks are
//! taken after a network call returns, never across one. Loads are numbered
//! (see [`generation`]) so that a late response never overwrites a newer one
//! and nothing is applied after [`detach`](ListViewModel::detach).

pub mod feed;
pub mod generation;
pub mod list;
pub mod load_state;
pub mod pokedex;
pub mod profile;
pub mod users;

pub use feed::{FeedViewModel, LikeAction};
pub use generation::{LoadGuard, Ticket};
pub use list::{CollectionKind, ListState, ListViewModel, POSTS_SELECT};
pub use load_state::LoadState;
pub use pokedex::{filter_by_search_term, PokedexViewModel};
pub use profile::{ProfileView, ProfileViewModel};
pub use users::{UsersPage, UsersView};
