use serde::{Deserialize, Serialize};

/// The fixed set of roles seeded at setup. The discriminants are the
/// primary keys of the `roles` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin = 1,
    Support = 2,
    User = 3,
}

impl Role {
    pub fn from_id(id: i64) -> Option<Role> {
        match id {
            1 => Some(Role::Admin),
            2 => Some(Role::Support),
            3 => Some(Role::User),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        self as i64
    }

    pub fn name(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Support => "Support",
            Role::User => "User",
        }
    }

    /// Admin and Support work tickets; only they may be assignees.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Support)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: i64,
    pub name: String,
}
