//! Profile domain types.
//!
//! A profile row mirrors an identity in the external auth provider: same id,
//! plus the display name and role this application manages.

use serde::{Deserialize, Serialize};

use lojinha_core::{Email, Role, UserId};

/// A row of the `profiles` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Matches the auth provider's user id.
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}

/// Insert shape for `profiles`.
///
/// Only created lazily, on the first login of an identity that has no
/// profile yet.
#[derive(Debug, Clone, Serialize)]
pub struct NewProfile {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub role: Role,
}
