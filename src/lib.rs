//! pokesocial - client core for a Pokémon social app.
//!
//! Feed, Pokédex, profiles and role-gated views over a hosted backend that
//! provides auth, a relational row store and object storage. The backend is
//! reached only through the traits in [`traits`]; [`adapters`] holds the HTTP
//! implementation and in-memory ones for tests.

pub mod access_gate;
pub mod adapters;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod forms;
pub mod logging;
pub mod models;
pub mod session;
pub mod traits;
pub mod view_model;
