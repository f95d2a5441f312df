use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, ClientId};

pub type PaymentId = i64;

/// A recorded cash inflow reducing a client's outstanding balance.
/// Recorded standalone by the operator or implicitly when a cash order
/// is placed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Assigned by the repository on insert.
    pub id: PaymentId,
    pub client_id: ClientId,
    pub amount_paid: Cents,
    /// Captured once at creation, never recomputed.
    pub payment_date: NaiveDate,
    /// Localized weekday name captured alongside the date.
    pub payment_day: String,
}

impl Payment {
    pub fn new(
        client_id: ClientId,
        amount_paid: Cents,
        payment_date: NaiveDate,
        payment_day: String,
    ) -> Self {
        Self {
            id: 0, // Will be set by the repository
            client_id,
            amount_paid,
            payment_date,
            payment_day,
        }
    }
}
