// SPDX-License-Identifier: AGPL-3.0-or-later

//! User roles for authorization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// User roles for authorization.
///
/// ## Role Semantics
///
/// - `Buyer` - Default role for new registrations; read access to listings
/// - `Agent` - May create listings and manage their own
/// - `Admin` - Full access, including role changes and any listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Default role for registered users
    Buyer,
    /// Listing agent (creates and manages own listings)
    Agent,
    /// Full administrative access
    Admin,
}

impl Role {
    /// Pure authorization check against a route's allow-list.
    pub fn allowed_by(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }

    /// Parse a role from its wire representation (case-insensitive).
    pub fn parse(s: &str) -> Option<Role> {
        match s.to_lowercase().as_str() {
            "buyer" => Some(Role::Buyer),
            "agent" => Some(Role::Agent),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl Default for Role {
    /// New registrations start as buyers (least privilege).
    fn default() -> Self {
        Role::Buyer
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Buyer => write!(f, "buyer"),
            Role::Agent => write!(f, "agent"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allowed_by_checks_membership() {
        assert!(Role::Admin.allowed_by(&[Role::Admin]));
        assert!(Role::Agent.allowed_by(&[Role::Agent, Role::Admin]));
        assert!(!Role::Buyer.allowed_by(&[Role::Agent, Role::Admin]));
        assert!(!Role::Admin.allowed_by(&[]));
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("AGENT"), Some(Role::Agent));
        assert_eq!(Role::parse("Buyer"), Some(Role::Buyer));
        assert_eq!(Role::parse("landlord"), None);
    }

    #[test]
    fn default_role_is_buyer() {
        assert_eq!(Role::default(), Role::Buyer);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Agent).unwrap(), r#""agent""#);
        let parsed: Role = serde_json::from_str(r#""buyer""#).unwrap();
        assert_eq!(parsed, Role::Buyer);
    }
}
