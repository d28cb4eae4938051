//! Expense repository.

use lojinha_core::ExpenseId;

use crate::models::{Expense, NewExpense};
use crate::supabase::RestClient;
use crate::supabase::rest::eq;

use super::RepositoryError;

const TABLE: &str = "expenses";

/// Repository for the `expenses` table.
pub struct ExpenseRepository<'a> {
    rest: &'a RestClient,
}

impl<'a> ExpenseRepository<'a> {
    /// Create a new expense repository.
    #[must_use]
    pub const fn new(rest: &'a RestClient) -> Self {
        Self { rest }
    }

    /// List all expenses, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the query fails.
    pub async fn list(&self) -> Result<Vec<Expense>, RepositoryError> {
        let expenses = self
            .rest
            .select::<Expense>(TABLE, &[("order", "date.desc,created_at.desc".to_owned())])
            .await?;
        Ok(expenses)
    }

    /// Record a new expense.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the insert fails.
    pub async fn create(&self, expense: &NewExpense) -> Result<Expense, RepositoryError> {
        let created = self
            .rest
            .insert_returning::<Expense, _>(TABLE, expense)
            .await?;
        Ok(created)
    }

    /// Delete an expense.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Store` if the delete fails.
    pub async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        self.rest.delete(TABLE, &[eq("id", id)]).await?;
        Ok(())
    }
}
