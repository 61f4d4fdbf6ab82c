//! Registration: create the identity, then its profile row.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::ElevatedAccessPolicy;
use crate::error::{PokeError, PokeResult, ValidationError};
use crate::models::{NewProfile, Table, UserIdentity};
use crate::traits::{insert_row, AuthProvider, DataGateway};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Raw form input. Only the middle name may be left blank.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFields {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`
    pub date_of_birth: String,
    pub country: String,
    pub city: String,
}

fn require(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::Required { field })
    } else {
        Ok(())
    }
}

impl RegistrationFields {
    /// Check required fields and the password length, and parse the date of
    /// birth.
    pub fn validate(&self) -> Result<NaiveDate, ValidationError> {
        require(&self.email, "Email")?;
        // Whitespace is a valid password character.
        if self.password.is_empty() {
            return Err(ValidationError::Required { field: "Password" });
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }
        require(&self.first_name, "First name")?;
        require(&self.last_name, "Last name")?;
        require(&self.date_of_birth, "Date of birth")?;
        let date_of_birth = NaiveDate::parse_from_str(self.date_of_birth.trim(), "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate {
                value: self.date_of_birth.clone(),
            })?;
        require(&self.country, "Country")?;
        require(&self.city, "City")?;
        Ok(date_of_birth)
    }

    fn middle_name(&self) -> Option<String> {
        if self.middle_name.trim().is_empty() {
            None
        } else {
            Some(self.middle_name.clone())
        }
    }
}

/// A completed registration.
#[derive(Debug, Clone, PartialEq)]
pub struct Registered {
    pub user: UserIdentity,
    pub profile: NewProfile,
}

pub struct RegistrationForm {
    auth: Arc<dyn AuthProvider>,
    gateway: Arc<dyn DataGateway>,
    policy: ElevatedAccessPolicy,
}

impl RegistrationForm {
    pub fn new(
        auth: Arc<dyn AuthProvider>,
        gateway: Arc<dyn DataGateway>,
        policy: ElevatedAccessPolicy,
    ) -> Self {
        Self {
            auth,
            gateway,
            policy,
        }
    }

    /// Sign up, then insert the profile keyed by the new identity.
    ///
    /// If the profile insert fails the identity stays created and the error
    /// is [`PokeError::RegistrationIncomplete`].
    pub async fn submit(&self, fields: &RegistrationFields) -> PokeResult<Registered> {
        let date_of_birth = fields.validate()?;

        let user = self.auth.sign_up(&fields.email, &fields.password).await?;
        info!("Created account {}", user.id);

        let profile = NewProfile {
            id: user.id.clone(),
            first_name: fields.first_name.clone(),
            middle_name: fields.middle_name(),
            last_name: fields.last_name.clone(),
            date_of_birth,
            country: fields.country.clone(),
            city: fields.city.clone(),
            is_special: self.policy.grants(&fields.email),
        };

        if let Err(source) = insert_row(self.gateway.as_ref(), Table::Profiles, &profile).await {
            warn!("Profile for {} not saved: {}", user.id, source);
            return Err(PokeError::RegistrationIncomplete {
                user_id: user.id,
                source,
            });
        }

        Ok(Registered { user, profile })
    }
}
