//! Error handling for the pokesocial client.
//!
//! - **Error Categories**: high-level classification for presentation decisions
//! - **Domain-specific Errors**: query, auth, upload, validation, configuration
//! - **Unified Error Type**: `PokeError` consolidates all error types
//! - **Result Type Alias**: `PokeResult<T>`
//!
//! Nothing here retries. Every failure is turned into a display message at the
//! operation boundary (view model, form, gate) and shown in place of content.
//!
//! | Category | Description |
//! |----------|-------------|
//! | Network | Backend unreachable |
//! | Auth | Bad credentials, missing session |
//! | Server | Backend refused the request |
//! | Client | Response could not be decoded |
//! | User | Form input needs fixing |
//! | Configuration | Missing settings |

mod auth;
mod category;
mod config;
mod poke_error;
mod query;
mod result;
mod upload;
mod validation;

pub use auth::AuthError;
pub use category::ErrorCategory;
pub use config::ConfigError;
pub use poke_error::PokeError;
pub use query::QueryError;
pub use result::PokeResult;
pub use upload::UploadError;
pub use validation::ValidationError;
