//! Expense domain types.
//!
//! Expenses are an admin-only ledger with no relationship to orders or
//! products.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use lojinha_core::{ExpenseId, UserId};

/// A row of the `expenses` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub description: String,
    /// Strictly positive.
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub created_by: UserId,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    /// Whether this expense falls in the same month as `today`.
    #[must_use]
    pub fn in_month_of(&self, today: NaiveDate) -> bool {
        use chrono::Datelike;
        self.date.year() == today.year() && self.date.month() == today.month()
    }
}

/// Insert shape for `expenses`.
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
    pub created_by: UserId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_in_month_of() {
        let expense = Expense {
            id: ExpenseId::generate(),
            description: "Aluguel".to_owned(),
            amount: Decimal::new(120_000, 2),
            category: "Operacional".to_owned(),
            date: NaiveDate::from_ymd_opt(2026, 3, 5).unwrap(),
            created_by: UserId::generate(),
            created_at: Utc::now(),
        };

        assert!(expense.in_month_of(NaiveDate::from_ymd_opt(2026, 3, 28).unwrap()));
        assert!(!expense.in_month_of(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap()));
        assert!(!expense.in_month_of(NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()));
    }
}
