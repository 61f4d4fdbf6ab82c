//! Form submission flows.
//!
//! - [`PostComposer`] - blank-guarded post submission with optional image
//! - [`RegistrationForm`] - sign-up followed by the profile insert

pub mod post;
pub mod registration;

pub use post::{PostComposer, PostDraft, SubmitOutcome};
pub use registration::{Registered, RegistrationFields, RegistrationForm, MIN_PASSWORD_LEN};
