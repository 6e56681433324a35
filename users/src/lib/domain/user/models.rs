use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

/// Registered account.
///
/// `role_id` is `None` when the user holds no role. A `Some` that no longer
/// resolves to a stored role is tolerated; authorization treats it as "no role".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub role_id: Option<RoleId>,
    pub last_seen: DateTime<Utc>,
}

/// Named role a user can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: RoleName,
}

impl Role {
    /// Role that has not been stored yet; the repository assigns its id.
    pub fn new(name: RoleName) -> Self {
        Self {
            id: RoleId::default(),
            name,
        }
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Fresh random identifier (UUID v4).
            pub fn generate() -> Self {
                Self(Uuid::new_v4().to_string())
            }

            /// Whether a repository has assigned this id yet.
            pub fn is_assigned(&self) -> bool {
                !self.0.is_empty()
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }
    };
}

opaque_id!(
    /// Opaque user identifier, assigned by the repository on creation.
    /// The default (empty) value means "not stored yet".
    UserId
);

opaque_id!(
    /// Opaque role identifier, assigned by the repository on creation.
    /// The default (empty) value means "not stored yet".
    RoleId
);

/// Role names the domain gives meaning to, plus any custom name.
///
/// Names compare by their canonical string, so `Other("admin".into())`
/// equals [`RoleName::Admin`].
#[derive(Debug, Clone)]
pub enum RoleName {
    /// Granted to every account on registration.
    User,
    /// Grants administrative rights.
    Admin,
    Other(String),
}

impl RoleName {
    pub const USER: &'static str = "user";
    pub const ADMIN: &'static str = "admin";

    pub fn as_str(&self) -> &str {
        match self {
            RoleName::User => Self::USER,
            RoleName::Admin => Self::ADMIN,
            RoleName::Other(name) => name,
        }
    }

    /// Every name with built-in meaning.
    pub fn well_known() -> [RoleName; 2] {
        [RoleName::User, RoleName::Admin]
    }
}

impl PartialEq for RoleName {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for RoleName {}

impl Hash for RoleName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_str().hash(state)
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for RoleName {
    fn from(name: &str) -> Self {
        match name {
            Self::USER => RoleName::User,
            Self::ADMIN => RoleName::Admin,
            other => RoleName::Other(other.to_string()),
        }
    }
}

impl From<String> for RoleName {
    fn from(name: String) -> Self {
        match name.as_str() {
            Self::USER => RoleName::User,
            Self::ADMIN => RoleName::Admin,
            _ => RoleName::Other(name),
        }
    }
}

/// Registration request. Carried as-is; no shape validation happens here.
#[derive(Clone)]
pub struct RegisterInput {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegisterInput {
    pub fn new(
        email: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegisterInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterInput")
            .field("email", &self.email)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login request.
#[derive(Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginInput")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_name_canonical_equality() {
        assert_eq!(RoleName::from("admin"), RoleName::Admin);
        assert_eq!(RoleName::from("user".to_string()), RoleName::User);
        assert_eq!(RoleName::Other("admin".to_string()), RoleName::Admin);
        assert_ne!(RoleName::from("moderator"), RoleName::Admin);
        assert_eq!(RoleName::from("moderator").as_str(), "moderator");
    }

    #[test]
    fn test_role_name_hash_follows_equality() {
        let mut names = std::collections::HashSet::new();
        names.insert(RoleName::Admin);
        assert!(names.contains(&RoleName::Other("admin".to_string())));
    }

    #[test]
    fn test_ids() {
        assert!(!UserId::default().is_assigned());
        assert!(UserId::generate().is_assigned());
        assert_ne!(RoleId::generate(), RoleId::generate());
        assert_eq!(UserId::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_new_role_is_unassigned() {
        let role = Role::new(RoleName::Admin);
        assert!(!role.id.is_assigned());
        assert_eq!(role.name.as_str(), "admin");
    }

    #[test]
    fn test_inputs_redact_password() {
        let register = RegisterInput::new("a@example.com", "alice", "hunter22");
        let login = LoginInput::new("a@example.com", "hunter22");

        assert!(!format!("{:?}", register).contains("hunter22"));
        assert!(!format!("{:?}", login).contains("hunter22"));
    }
}
