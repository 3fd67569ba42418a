//! Ledger entities consumed by search.
//!
//! These mirror the rows the persistence layer hands over. Search only reads them; ids are
//! plain integers and relations are expressed as optional foreign keys that may dangle.

use serde::{Deserialize, Serialize};

/// Identifier shared by every ledger entity.
pub type Id = i64;

/// A single money movement on an account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transaction {
    /// Transaction id.
    pub id: Id,
    /// Booking date (ISO-8601), used for display only.
    pub date: String,
    /// Signed amount, used for display only.
    pub amount: f64,
    /// Vendor or payer name.
    pub payee: Option<String>,
    /// Counterparty name as reported by the bank.
    pub counterparty: Option<String>,
    /// Free-text note or bank description.
    pub description: Option<String>,
    /// Category the transaction is filed under.
    pub category_id: Option<Id>,
    /// Account the transaction was booked on.
    pub bank_account_id: Option<Id>,
    /// Trip the transaction belongs to.
    pub trip_id: Option<Id>,
    /// Tags attached to the transaction.
    pub tag_ids: Vec<Id>,
}

/// A bank or card issuer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    /// Bank id.
    pub id: Id,
    /// Display name.
    pub name: String,
}

/// An account held at a bank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    /// Account id.
    pub id: Id,
    /// Owning bank.
    pub bank_id: Id,
    /// Display name.
    pub name: String,
}

/// A node in the category tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Parent category, `None` for a root.
    #[serde(default)]
    pub parent_id: Option<Id>,
}

/// A trip that groups transactions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    /// Trip id.
    pub id: Id,
    /// Display name.
    pub name: String,
}

/// A user-defined label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag id.
    pub id: Id,
    /// Display name.
    pub name: String,
}
