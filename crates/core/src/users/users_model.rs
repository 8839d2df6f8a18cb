//! User account models.

use serde::{Deserialize, Serialize};

/// A dashboard login. The password is kept as an argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
}

/// Input model for creating or replacing a user by username.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub id: Option<String>,
    pub username: String,
    pub password_hash: String,
    pub is_active: bool,
}
