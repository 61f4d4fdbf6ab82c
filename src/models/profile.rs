use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::deserialize_id;

/// A row of the `profiles` table. Keyed by the owning identity's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub first_name: String,
    #[serde(default)]
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub country: String,
    pub city: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// Elevated-access flag; grants the user listing.
    #[serde(default)]
    pub is_special: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Insert payload for a freshly registered user's profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewProfile {
    pub id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub country: String,
    pub city: String,
    pub is_special: bool,
}
