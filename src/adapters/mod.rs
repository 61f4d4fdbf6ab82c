//! Implementations of the collaborator traits.
//!
//! - [`rest`] talks to the hosted backend over HTTP.
//! - [`mock`] keeps everything in memory, records calls, and can be told to
//!   fail; integration tests and offline demos use it.

pub mod mock;
pub mod rest;
