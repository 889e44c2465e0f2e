//! The signed-in user.
//!
//! A [`Session`] is created by a successful login and handed to whatever
//! needs it. Nothing is stored between runs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Access role granted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    /// `admin`
    Admin,
    /// `user`
    User,
    /// Any other role name.
    Other(String),
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "admin" => Self::Admin,
            "user" => Self::User,
            _ => Self::Other(raw),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

/// An authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Login name.
    pub username: String,
    /// Granted role.
    pub role: Role,
}

impl Session {
    /// A session for `username` with `role`.
    #[must_use]
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(Role::from("admin".to_string()), Role::Admin);
        assert_eq!(Role::from("User".to_string()), Role::User);
        assert_eq!(
            Role::from("ops".to_string()),
            Role::Other("ops".to_string())
        );
    }

    #[test]
    fn test_role_serde() {
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert_eq!(serde_json::to_string(&Role::User).unwrap(), "\"user\"");
    }

    #[test]
    fn test_session() {
        let session = Session::new("admin", Role::Admin);
        assert_eq!(session.username, "admin");
        assert_eq!(session.role, Role::Admin);
    }
}
