//! Accounts, roles and password hashing.

mod password;

pub use password::{
    MIN_PASSWORD_LENGTH, PasswordError, hash_password, validate_password_strength,
    verify_password,
};

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tally_shared::auth::UserInfo;
use tally_shared::types::UserId;

/// Account roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Manages other accounts.
    Admin,
    /// Regular account.
    #[default]
    User,
}

impl UserRole {
    /// Returns true if this role can manage other users.
    #[must_use]
    pub const fn can_manage_users(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Role for a newly registered account.
    #[must_use]
    pub const fn for_registration(is_admin_email: bool) -> Self {
        if is_admin_email { Self::Admin } else { Self::User }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::User => write!(f, "user"),
        }
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Login email, stored lowercased.
    pub email: String,
    /// Argon2id PHC string.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Account role.
    pub role: UserRole,
    /// Disabled accounts cannot log in.
    pub is_active: bool,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Normalizes an email for storage and lookup.
    #[must_use]
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Public view of the account.
    #[must_use]
    pub fn info(&self) -> UserInfo {
        UserInfo {
            id: self.id,
            email: self.email.clone(),
            full_name: self.full_name.clone(),
            role: self.role.to_string(),
            is_active: self.is_active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_role_permissions() {
        assert!(UserRole::Admin.can_manage_users());
        assert!(!UserRole::User.can_manage_users());
        assert_eq!(UserRole::for_registration(true), UserRole::Admin);
        assert_eq!(UserRole::for_registration(false), UserRole::User);
    }

    #[rstest]
    #[case("admin", UserRole::Admin)]
    #[case(" Admin ", UserRole::Admin)]
    #[case("user", UserRole::User)]
    fn test_role_from_str(#[case] input: &str, #[case] expected: UserRole) {
        assert_eq!(input.parse::<UserRole>().unwrap(), expected);
    }

    #[test]
    fn test_role_from_str_rejects_unknown() {
        assert!("owner".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_info_hides_hash() {
        let user = User {
            id: UserId::new(),
            email: User::normalize_email("  Ana@Example.COM "),
            password_hash: "$argon2id$...".to_string(),
            full_name: "Ana".to_string(),
            role: UserRole::Admin,
            is_active: true,
            created_at: Utc::now(),
        };

        let info = user.info();
        assert_eq!(info.email, "ana@example.com");
        assert_eq!(info.role, "admin");
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("argon2"));
    }
}
