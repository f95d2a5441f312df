//! Raw operator input, one form per ledger operation.
//!
//! Every form carries the strings exactly as entered and exposes a single
//! `validate` that either yields typed values or a typed [`AppError`],
//! before any storage is touched. All call sites go through here; nothing
//! else in the crate parses user input.

use crate::domain::{parse_cents, Cents, ClientId, PaymentKind};

use super::AppError;

fn require(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        Err(AppError::MissingField(field))
    } else {
        Ok(())
    }
}

fn parse_money(field: &'static str, value: &str) -> Result<Cents, AppError> {
    parse_cents(value).map_err(|_| AppError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Money field that defaults to zero when left blank.
fn parse_money_or_zero(field: &'static str, value: &str) -> Result<Cents, AppError> {
    if value.trim().is_empty() {
        Ok(0)
    } else {
        parse_money(field, value)
    }
}

fn parse_dimension(field: &'static str, value: &str) -> Result<f64, AppError> {
    require(field, value)?;
    value.trim().parse().map_err(|_| AppError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

fn parse_payment_kind(value: &str) -> Result<PaymentKind, AppError> {
    require("payment kind", value)?;
    PaymentKind::from_str(value).ok_or_else(|| AppError::InvalidNumber {
        field: "payment kind",
        value: value.to_string(),
    })
}

// ========================
// Client forms
// ========================

/// Input for creating a client. Opening balances default to zero.
#[derive(Debug, Clone, Default)]
pub struct ClientForm {
    pub name: String,
    pub paid: String,
    pub owed: String,
}

#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub paid_amount: Cents,
    pub owed_amount: Cents,
}

impl ClientForm {
    pub fn validate(self) -> Result<NewClient, AppError> {
        require("client name", &self.name)?;
        let paid_amount = parse_money_or_zero("paid amount", &self.paid)?;
        let owed_amount = parse_money_or_zero("owed amount", &self.owed)?;
        if paid_amount < 0 || owed_amount < 0 {
            return Err(AppError::InvalidAmount(
                "Opening balances cannot be negative".to_string(),
            ));
        }
        Ok(NewClient {
            name: self.name.trim().to_string(),
            paid_amount,
            owed_amount,
        })
    }
}

/// Input for the operator correction flow: every field re-entered and
/// written back verbatim, balances included.
#[derive(Debug, Clone)]
pub struct ClientEditForm {
    pub name: String,
    pub paid: String,
    pub owed: String,
    pub total_bill: String,
}

#[derive(Debug, Clone)]
pub struct ClientEdit {
    pub name: String,
    pub paid_amount: Cents,
    pub owed_amount: Cents,
    pub total_bill: Cents,
}

impl ClientEditForm {
    pub fn validate(self) -> Result<ClientEdit, AppError> {
        require("client name", &self.name)?;
        Ok(ClientEdit {
            name: self.name.trim().to_string(),
            paid_amount: parse_money("paid amount", &self.paid)?,
            owed_amount: parse_money("owed amount", &self.owed)?,
            total_bill: parse_money("total bill", &self.total_bill)?,
        })
    }
}

// ========================
// Order forms
// ========================

/// Input for placing an order. The total is computed from the dimensions
/// at validation time, never entered by the operator.
#[derive(Debug, Clone)]
pub struct OrderForm {
    pub client_id: ClientId,
    pub name: String,
    pub order_type: String,
    pub width: String,
    pub length: String,
    pub price_per_cm: String,
    pub payment_kind: String,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub client_id: ClientId,
    pub name: String,
    pub order_type: String,
    pub width: f64,
    pub length: f64,
    pub price_per_cm: Cents,
    pub payment_kind: PaymentKind,
}

impl OrderForm {
    pub fn validate(self) -> Result<NewOrder, AppError> {
        require("order name", &self.name)?;
        require("order type", &self.order_type)?;
        let width = parse_dimension("width", &self.width)?;
        let length = parse_dimension("length", &self.length)?;
        require("price per cm", &self.price_per_cm)?;
        let price_per_cm = parse_money("price per cm", &self.price_per_cm)?;
        let payment_kind = parse_payment_kind(&self.payment_kind)?;

        Ok(NewOrder {
            client_id: self.client_id,
            name: self.name.trim().to_string(),
            order_type: self.order_type.trim().to_string(),
            width,
            length,
            price_per_cm,
            payment_kind,
        })
    }
}

/// Input for editing an order. The total price is taken exactly as
/// re-entered by the operator, NOT recomputed from the dimensions; the
/// balance delta is derived from it.
#[derive(Debug, Clone)]
pub struct OrderUpdateForm {
    pub name: String,
    pub order_type: String,
    pub width: String,
    pub length: String,
    pub price_per_cm: String,
    pub total_price: String,
    pub payment_kind: String,
}

#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub name: String,
    pub order_type: String,
    pub width: f64,
    pub length: f64,
    pub price_per_cm: Cents,
    pub total_price: Cents,
    pub payment_kind: PaymentKind,
}

impl OrderUpdateForm {
    pub fn validate(self) -> Result<OrderUpdate, AppError> {
        require("order name", &self.name)?;
        require("order type", &self.order_type)?;
        let width = parse_dimension("width", &self.width)?;
        let length = parse_dimension("length", &self.length)?;
        require("price per cm", &self.price_per_cm)?;
        let price_per_cm = parse_money("price per cm", &self.price_per_cm)?;
        require("total price", &self.total_price)?;
        let total_price = parse_money("total price", &self.total_price)?;
        let payment_kind = parse_payment_kind(&self.payment_kind)?;

        Ok(OrderUpdate {
            name: self.name.trim().to_string(),
            order_type: self.order_type.trim().to_string(),
            width,
            length,
            price_per_cm,
            total_price,
            payment_kind,
        })
    }
}

// ========================
// Payment forms
// ========================

/// Input for recording a standalone payment.
#[derive(Debug, Clone)]
pub struct PaymentForm {
    pub client_id: ClientId,
    pub amount: String,
}

#[derive(Debug, Clone)]
pub struct NewPayment {
    pub client_id: ClientId,
    pub amount_paid: Cents,
}

impl PaymentForm {
    pub fn validate(self) -> Result<NewPayment, AppError> {
        require("amount paid", &self.amount)?;
        let amount_paid = parse_money("amount paid", &self.amount)?;
        if amount_paid <= 0 {
            return Err(AppError::InvalidAmount(
                "Payment amount must be positive".to_string(),
            ));
        }
        Ok(NewPayment {
            client_id: self.client_id,
            amount_paid,
        })
    }
}

/// Input for editing a payment. The selected client becomes the new
/// owner; the amount is re-entered.
#[derive(Debug, Clone)]
pub struct PaymentUpdateForm {
    pub client_id: ClientId,
    pub amount: String,
}

#[derive(Debug, Clone)]
pub struct PaymentUpdate {
    pub client_id: ClientId,
    pub amount_paid: Cents,
}

impl PaymentUpdateForm {
    pub fn validate(self) -> Result<PaymentUpdate, AppError> {
        require("amount paid", &self.amount)?;
        Ok(PaymentUpdate {
            client_id: self.client_id,
            amount_paid: parse_money("amount paid", &self.amount)?,
        })
    }
}
