//! In-memory collaborators for tests.

pub mod auth;
pub mod gateway;
pub mod storage;

pub use auth::{AuthOp, InMemoryAuth};
pub use gateway::{GatewayCall, InMemoryGateway, Op};
pub use storage::{InMemoryStorage, StoredObject};
