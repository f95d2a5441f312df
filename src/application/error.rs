use thiserror::Error;

use crate::domain::{format_cents, Cents, ClientId, OrderId, PaymentId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Client not found: {0}")]
    ClientNotFound(ClientId),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Payment not found: {0}")]
    PaymentNotFound(PaymentId),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumber { field: &'static str, value: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error(
        "Payment of {} exceeds the outstanding balance of {}",
        format_cents(*requested),
        format_cents(*owed)
    )]
    PaymentExceedsOwed { requested: Cents, owed: Cents },

    #[error("Client owns {orders} order(s) and {payments} payment(s) and cannot be deleted")]
    ClientHasRecords { orders: i64, payments: i64 },

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),
}
