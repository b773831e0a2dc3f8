// SPDX-License-Identifier: MIT

//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore.
///
/// The document ID in the `users` collection is `id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// UUID v4, also used as document ID
    pub id: String,
    /// Display name
    pub full_name: String,
    /// Email address, lowercased, unique across users
    pub email: String,
    /// Bcrypt hash of the password. Never serialized to API responses.
    pub password_hash: String,
    /// Short self-description, filled in during onboarding
    #[serde(default)]
    pub bio: String,
    /// Language the user speaks natively
    #[serde(default)]
    pub native_language: String,
    /// Language the user is learning
    #[serde(default)]
    pub learning_language: String,
    /// Free-form "City, Country"
    #[serde(default)]
    pub location: String,
    /// Avatar URL, assigned randomly at signup
    #[serde(default)]
    pub profile_pic: String,
    /// Whether the one-time onboarding step has been completed
    #[serde(default)]
    pub is_onboarded: bool,
    /// IDs of accepted friends (kept symmetric on both sides)
    #[serde(default)]
    pub friend_ids: Vec<String>,
    /// When the account was created (RFC 3339)
    pub created_at: String,
    /// Last profile mutation (RFC 3339)
    pub updated_at: String,
}

impl User {
    /// True when every onboarding profile field is populated.
    pub fn has_complete_profile(&self) -> bool {
        !self.full_name.is_empty()
            && !self.bio.is_empty()
            && !self.native_language.is_empty()
            && !self.learning_language.is_empty()
            && !self.location.is_empty()
    }
}

/// User payload returned by the API. Everything except the password hash.
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub bio: String,
    pub native_language: String,
    pub learning_language: String,
    pub location: String,
    pub profile_pic: String,
    pub is_onboarded: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            email: user.email,
            bio: user.bio,
            native_language: user.native_language,
            learning_language: user.learning_language,
            location: user.location,
            profile_pic: user.profile_pic,
            is_onboarded: user.is_onboarded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_user() -> User {
        User {
            id: "u1".to_string(),
            full_name: "Maria Silva".to_string(),
            email: "maria@example.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            bio: "Learning Japanese".to_string(),
            native_language: "portuguese".to_string(),
            learning_language: "japanese".to_string(),
            location: "Lisbon, Portugal".to_string(),
            profile_pic: "https://avatar.iran.liara.run/public/7.png".to_string(),
            is_onboarded: true,
            friend_ids: vec![],
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_complete_profile() {
        assert!(test_user().has_complete_profile());

        let mut user = test_user();
        user.bio.clear();
        assert!(!user.has_complete_profile());
    }

    #[test]
    fn test_response_never_contains_password_hash() {
        let json = serde_json::to_value(UserResponse::from(test_user())).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["full_name"], "Maria Silva");
    }
}
