use serde::{Deserialize, Serialize};

use super::Cents;

pub type ClientId = i64;

/// A billable customer with running financial balances.
///
/// `total_bill` is the cumulative value of every order ever placed,
/// `paid_amount` the cumulative cash received, and `owed_amount` the
/// outstanding installment balance (floored at zero). Every order and
/// payment operation adjusts these in the same transaction that touches
/// the child row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Assigned by the repository on insert.
    pub id: ClientId,
    pub name: String,
    pub paid_amount: Cents,
    pub owed_amount: Cents,
    pub total_bill: Cents,
}

impl Client {
    /// Create a client with operator-entered opening balances.
    /// The opening `total_bill` is the sum the operator entered, not a
    /// derivation from orders (there are none yet).
    pub fn new(name: String, paid_amount: Cents, owed_amount: Cents) -> Self {
        Self {
            id: 0, // Will be set by the repository
            name,
            paid_amount,
            owed_amount,
            total_bill: paid_amount + owed_amount,
        }
    }
}
