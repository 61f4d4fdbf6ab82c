//! Trait abstractions for the hosted-backend collaborators.
//!
//! The client core never talks to the network directly. Every request goes
//! through one of these seams, so view models and forms can be exercised
//! against in-memory implementations.
//!
//! # Traits
//!
//! - [`AuthProvider`] - sign-up, sign-in, sign-out and session lookup
//! - [`DataGateway`] - generic row store: select, insert, delete
//! - [`ObjectStorage`] - asset upload and public URL resolution

pub mod auth;
pub mod gateway;
pub mod storage;

pub use auth::AuthProvider;
pub use gateway::{fetch_one, fetch_rows, insert_row, DataGateway, Row};
pub use storage::ObjectStorage;
