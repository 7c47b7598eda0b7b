//! Staff Role Model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ParseEnumError;

/// Staff role (角色)
///
/// Fixed per session: a role change only takes effect on the next login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
pub enum Role {
    Host,
    Waiter,
    Chef,
    Manager,
    Owner,
    Admin,
}

/// Roles allowed to change a table's status
pub const FLOOR_ROLES: &[Role] = &[
    Role::Host,
    Role::Waiter,
    Role::Manager,
    Role::Owner,
    Role::Admin,
];

/// Roles allowed to create orders, add items and capture payments
pub const ORDER_ROLES: &[Role] = &[Role::Waiter, Role::Manager, Role::Owner, Role::Admin];

/// Roles allowed to advance orders and line items (includes the kitchen)
pub const SERVICE_ROLES: &[Role] = &[
    Role::Waiter,
    Role::Chef,
    Role::Manager,
    Role::Owner,
    Role::Admin,
];

/// Roles allowed to manage the floor plan, menu, payments and reports
pub const MANAGEMENT_ROLES: &[Role] = &[Role::Manager, Role::Owner, Role::Admin];

/// Roles allowed to onboard and edit staff accounts
pub const STAFF_ADMIN_ROLES: &[Role] = &[Role::Owner, Role::Admin];

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Host,
        Role::Waiter,
        Role::Chef,
        Role::Manager,
        Role::Owner,
        Role::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Host => "host",
            Role::Waiter => "waiter",
            Role::Chef => "chef",
            Role::Manager => "manager",
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }

    /// Landing page a user of this role is sent to when a route refuses them
    pub fn default_route(&self) -> &'static str {
        match self {
            Role::Host => "/tables",
            Role::Chef => "/kitchen",
            Role::Admin => "/admin",
            Role::Waiter | Role::Manager | Role::Owner => "/dashboard",
        }
    }

    /// Whether this role appears in `allowed`; an empty list admits every role.
    pub fn is_allowed(&self, allowed: &[Role]) -> bool {
        allowed.is_empty() || allowed.contains(self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("role", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_routes() {
        assert_eq!(Role::Host.default_route(), "/tables");
        assert_eq!(Role::Chef.default_route(), "/kitchen");
        assert_eq!(Role::Admin.default_route(), "/admin");
        assert_eq!(Role::Waiter.default_route(), "/dashboard");
        assert_eq!(Role::Manager.default_route(), "/dashboard");
        assert_eq!(Role::Owner.default_route(), "/dashboard");
    }

    #[test]
    fn empty_allow_list_admits_everyone() {
        for role in Role::ALL {
            assert!(role.is_allowed(&[]));
        }
        assert!(!Role::Chef.is_allowed(&[Role::Owner]));
        assert!(Role::Chef.is_allowed(SERVICE_ROLES));
        assert!(!Role::Chef.is_allowed(FLOOR_ROLES));
    }

    #[test]
    fn parse_and_serialize() {
        assert_eq!("manager".parse::<Role>().unwrap(), Role::Manager);
        assert!("cashier".parse::<Role>().is_err());
        assert_eq!(serde_json::to_string(&Role::Chef).unwrap(), "\"chef\"");
    }
}
