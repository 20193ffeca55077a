use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Money;

pub type AccountId = String;

/// Account id -> balance, as persisted in the accounts store.
pub type AccountBook = BTreeMap<AccountId, Money>;

/// Account id -> outstanding overdraft debt. A missing entry means nothing is owed.
pub type LoanBook = BTreeMap<AccountId, Money>;

/// An account as reported back to the caller on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub name: AccountId,
    pub balance: Money,
}

impl Account {
    pub fn new(name: impl Into<AccountId>, balance: Money) -> Self {
        Self {
            name: name.into(),
            balance,
        }
    }

    /// Look an account up in the book.
    pub fn find(book: &AccountBook, id: &str) -> Option<Self> {
        book.get(id).map(|balance| Self::new(id, *balance))
    }
}

/// Cumulative overdraft debt for one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanAccount {
    pub id: AccountId,
    pub owed: Money,
}

impl LoanAccount {
    pub fn find(book: &LoanBook, id: &str) -> Self {
        Self {
            id: id.to_string(),
            owed: book.get(id).copied().unwrap_or_default(),
        }
    }
}

/// Outcome of taking money out of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debit {
    /// Balance after the debit, never below zero.
    pub balance: Money,
    /// Total debt after the debit, including what was owed before.
    pub owed: Money,
    /// Debt created by this debit alone.
    pub borrowed: Money,
}

/// Take `amount` out of `balance`.
///
/// If the result would go negative the shortfall is added to the existing
/// loan and the balance is clamped to zero. Otherwise the existing loan is
/// carried forward unchanged. Returns `None` on decimal overflow.
pub fn settle_debit(balance: Money, amount: Money, existing_loan: Money) -> Option<Debit> {
    let remaining = balance.checked_sub(amount)?;

    if remaining < Money::ZERO {
        let borrowed = remaining.abs();
        Some(Debit {
            balance: Money::ZERO,
            owed: existing_loan.checked_add(borrowed)?,
            borrowed,
        })
    } else {
        Some(Debit {
            balance: remaining,
            owed: existing_loan,
            borrowed: Money::ZERO,
        })
    }
}
