//! Cart persistence scopes.
//!
//! A cart is persisted under exactly one scope key. The rule is explicit:
//! always key by identity when authenticated, and treat "no identity" as its
//! own guest scope. Scopes never merge; the scope being vacated on a
//! login/logout transition is explicitly cleared (see [`crate::session`]).

use villagecraft_core::Email;

/// The storage scope a cart is persisted under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartScope {
    /// No identity: the browser-profile-wide guest cart.
    Guest,
    /// A logged-in user's cart, keyed by email.
    User(Email),
}

impl CartScope {
    /// The scope for an optional identity.
    #[must_use]
    pub fn for_identity(email: Option<&Email>) -> Self {
        email.map_or(Self::Guest, |email| Self::User(email.clone()))
    }

    /// The storage key this scope persists under.
    #[must_use]
    pub fn storage_key(&self) -> String {
        match self {
            Self::Guest => "vc_cart:guest".to_owned(),
            Self::User(email) => format!("vc_cart:user:{email}"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_scope_key() {
        assert_eq!(CartScope::Guest.storage_key(), "vc_cart:guest");
        assert_eq!(CartScope::for_identity(None), CartScope::Guest);
    }

    #[test]
    fn test_user_scope_key_is_identity_bound() {
        let email = Email::parse("meera@example.com").unwrap();
        let scope = CartScope::for_identity(Some(&email));
        assert_eq!(scope.storage_key(), "vc_cart:user:meera@example.com");

        let other = Email::parse("rajesh@example.com").unwrap();
        assert_ne!(
            scope.storage_key(),
            CartScope::User(other).storage_key()
        );
    }
}
