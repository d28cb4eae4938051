//! Session-related types.
//!
//! Types stored in the session for authentication and cart state.

use serde::{Deserialize, Serialize};

use lojinha_core::{Email, Role, UserId};

/// Session-stored user identity.
///
/// This is the sole source of truth for the admin/customer gate: handlers
/// never re-fetch the role mid-session. `Debug` is implemented manually to
/// keep the access token out of logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User's auth/profile ID.
    pub id: UserId,
    /// Display name (profile name, or derived from the email local part).
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Authorization tier.
    pub role: Role,
    /// Access token issued by the auth provider; needed for remote sign-out.
    pub access_token: String,
}

impl CurrentUser {
    /// Whether this user may use the admin-only surfaces.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl std::fmt::Debug for CurrentUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurrentUser")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("access_token", &"[REDACTED]")
            .finish()
    }
}

/// Session keys.
pub mod session_keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the session cart.
    pub const CART: &str = "cart";

    /// Advisory flag set while a checkout attempt is in flight.
    pub const CHECKOUT_IN_FLIGHT: &str = "checkout_in_flight";
}
