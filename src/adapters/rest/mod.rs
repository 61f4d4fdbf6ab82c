//! HTTP implementation of the collaborator traits for the hosted backend.
//!
//! | Service | Path | Trait |
//! |---------|------|-------|
//! | Rows | `/rest/v1/{table}` | [`DataGateway`](crate::traits::DataGateway) |
//! | Auth | `/auth/v1/...` | [`AuthProvider`](crate::traits::AuthProvider) |
//! | Storage | `/storage/v1/object/...` | [`ObjectStorage`](crate::traits::ObjectStorage) |

mod auth;
mod client;
mod rows;
mod storage;

pub use client::BackendClient;
