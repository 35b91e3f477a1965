//! User model for storage and API.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Account role. Everyone who signs up is a student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum UserRole {
    #[default]
    Student,
    Admin,
}

/// User record stored in Firestore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque user ID (also used as document ID)
    pub id: String,
    /// Normalized email address (trimmed, lowercase)
    pub email: String,
    /// Username chosen at signup
    pub username: String,
    /// Argon2 PHC hash string
    pub password_hash: String,
    #[serde(default)]
    pub role: UserRole,
    /// Name shown in the UI (defaults to the username)
    pub display_name: Option<String>,
    /// Avatar URL
    pub photo_url: Option<String>,
    /// When the account was created
    pub created_at: String,
    /// Last successful login
    pub last_login: Option<String>,
    /// Last profile change
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// User fields safe to return to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub username: String,
    pub role: UserRole,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: String,
    pub last_login: Option<String>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            username: user.username.clone(),
            role: user.role,
            display_name: user.display_name.clone(),
            photo_url: user.photo_url.clone(),
            created_at: user.created_at.clone(),
            last_login: user.last_login.clone(),
        }
    }
}

/// Normalize an email address for storage and lookups.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
