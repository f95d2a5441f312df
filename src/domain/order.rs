use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Cents, ClientId};

pub type OrderId = i64;

/// How an order is settled at the time it is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentKind {
    /// Settled in full immediately; a companion payment is recorded.
    Cash,
    /// Deferred settlement; the amount lands on the client's outstanding balance.
    Installment,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::Cash => "cash",
            PaymentKind::Installment => "installment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cash" => Some(PaymentKind::Cash),
            "installment" => Some(PaymentKind::Installment),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A priced job billed to a client: area times unit price, rounded UP to
/// the next whole currency unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Assigned by the repository on insert.
    pub id: OrderId,
    pub client_id: ClientId,
    pub name: String,
    pub order_type: String,
    pub width: f64,
    pub length: f64,
    pub price_per_cm: Cents,
    pub total_price: Cents,
    pub payment_kind: PaymentKind,
    /// Captured once at creation, never recomputed.
    pub order_date: NaiveDate,
    /// Localized weekday name captured alongside the date.
    pub order_day: String,
}

impl Order {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        client_id: ClientId,
        name: String,
        order_type: String,
        width: f64,
        length: f64,
        price_per_cm: Cents,
        payment_kind: PaymentKind,
        order_date: NaiveDate,
        order_day: String,
    ) -> Self {
        Self {
            id: 0, // Will be set by the repository
            client_id,
            name,
            order_type,
            width,
            length,
            price_per_cm,
            total_price: order_total(width, length, price_per_cm),
            payment_kind,
            order_date,
            order_day,
        }
    }
}

/// Price an order: `width * length * price_per_cm`, with the raw product
/// rounded up to the next whole currency unit. The ceiling biases prices
/// in the seller's favor and is business policy, not an approximation.
pub fn order_total(width: f64, length: f64, price_per_cm: Cents) -> Cents {
    let raw_units = width * length * (price_per_cm as f64 / 100.0);
    (raw_units.ceil() as Cents) * 100
}
