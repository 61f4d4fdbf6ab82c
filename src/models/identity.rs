use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_nullable_string};

/// The signed-in user as reported by the auth provider.
///
/// Owned by the session for its lifetime and passed explicitly to every
/// operation that acts on behalf of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserIdentity {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(default, deserialize_with = "deserialize_nullable_string")]
    pub email: String,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_auth_user_ignores_extra_fields() {
        let json = r#"{
            "id": "8d0f6a2e-1c7b-4c1e-9f57-3a5d2b1f0e11",
            "aud": "authenticated",
            "email": "ash@example.com",
            "role": "authenticated"
        }"#;
        let user: UserIdentity = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, "8d0f6a2e-1c7b-4c1e-9f57-3a5d2b1f0e11");
        assert_eq!(user.email, "ash@example.com");
    }

    #[test]
    fn test_missing_email_is_empty() {
        let user: UserIdentity = serde_json::from_str(r#"{"id": "u-1", "email": null}"#).unwrap();
        assert_eq!(user.email, "");
    }
}
