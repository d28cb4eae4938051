//! Profile repository.

use lojinha_core::UserId;

use crate::models::{NewProfile, Profile};
use crate::supabase::RestClient;
use crate::supabase::rest::eq;

use super::RepositoryError;

const TABLE: &str = "profiles";

/// Repository for the `profiles` table.
pub struct ProfileRepository<'a> {
    rest: &'a RestClient,
}

impl<'a> ProfileRepository<'a> {
    /// Create a new profile repository.
    #[must_use]
    pub const fn new(rest: &'a RestClient) -> Self {
        Self { rest }
    }

    /// Get a profile by the auth identity id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<Profile>, RepositoryError> {
        let profile = self
            .rest
            .select_one::<Profile>(TABLE, &[eq("id", id)])
            .await?;
        Ok(profile)
    }

    /// Create a profile row.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a profile already exists for
    /// the id, or `RepositoryError::Store` for other failures.
    pub async fn create(&self, profile: &NewProfile) -> Result<Profile, RepositoryError> {
        self.rest
            .insert_returning::<Profile, _>(TABLE, profile)
            .await
            .map_err(|e| RepositoryError::from_store(e, "profile already exists"))
    }
}
