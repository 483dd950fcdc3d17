//! User roles.

use serde::{Deserialize, Serialize};

/// Account role chosen at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Sells handmade products through the marketplace.
    Artisan,
    /// Shops the catalog.
    Buyer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Artisan => write!(f, "artisan"),
            Self::Buyer => write!(f, "buyer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "artisan" => Ok(Self::Artisan),
            "buyer" => Ok(Self::Buyer),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [UserRole::Artisan, UserRole::Buyer] {
            let parsed: UserRole = role.to_string().parse().expect("parse role");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!("admin".parse::<UserRole>().is_err());
    }
}
