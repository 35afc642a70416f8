//! Authenticated user and role.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Role of a user; drives navigation and every action gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
    /// A role label the frontend does not know; grants nothing
    Unknown(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => "admin",
            Role::Doctor => "doctor",
            Role::Patient => "patient",
            Role::Unknown(other) => other,
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.as_str() {
            "admin" => Role::Admin,
            "doctor" => Role::Doctor,
            "patient" => Role::Patient,
            _ => Role::Unknown(value),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The current user as returned by `GET /users/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    pub role: Role,
}

impl User {
    /// Decode a `/users/me/` body, accepting it only when it identifies a user.
    pub fn identified(body: &Value) -> Option<User> {
        match body.get("id") {
            Some(id) if !id.is_null() => serde_json::from_value(body.clone()).ok(),
            _ => None,
        }
    }

    /// Minimal stand-in used right after login when `/users/me/` yields nothing.
    pub fn fallback(username: &str) -> User {
        User {
            id: 0,
            username: username.to_string(),
            email: String::new(),
            role: Role::Patient,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_identified_user() {
        let body = json!({"id": 7, "username": "dr1", "email": "d@h.com", "role": "doctor"});
        let user = User::identified(&body).unwrap();
        assert_eq!(user.id, 7);
        assert_eq!(user.role, Role::Doctor);
    }

    #[test]
    fn test_unidentified_bodies() {
        assert!(User::identified(&json!({})).is_none());
        assert!(User::identified(&json!({"id": null, "username": "x", "role": "admin"})).is_none());
        assert!(User::identified(&json!({"status": 500, "statusText": "Server Error"})).is_none());
        assert!(User::identified(&json!([])).is_none());
    }

    #[test]
    fn test_unknown_role_is_kept_verbatim() {
        let body = json!({"id": 1, "username": "n", "role": "nurse"});
        let user = User::identified(&body).unwrap();
        assert_eq!(user.role, Role::Unknown("nurse".to_string()));
        assert_eq!(user.role.to_string(), "nurse");
        assert_eq!(user.email, "");
    }

    #[test]
    fn test_fallback_user_is_patient() {
        let user = User::fallback("alice");
        assert_eq!(user.id, 0);
        assert_eq!(user.role, Role::Patient);
        assert_eq!(user.username, "alice");
    }
}
