// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use daftar::application::{ClientForm, LedgerService, OrderForm, PaymentForm};
use daftar::domain::{Client, ClientId};
use tempfile::TempDir;

/// Helper to create a test service with a temporary database
pub async fn test_service() -> Result<(LedgerService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let service = LedgerService::init(db_path.to_str().unwrap()).await?;
    Ok((service, temp_dir))
}

/// Create a client with the given opening balances (entered as strings,
/// the way the operator would).
pub async fn create_client(
    service: &LedgerService,
    name: &str,
    paid: &str,
    owed: &str,
) -> Result<Client> {
    let client = service
        .create_client(ClientForm {
            name: name.into(),
            paid: paid.into(),
            owed: owed.into(),
        })
        .await?;
    Ok(client)
}

/// Standard order form: fill in the dimensions and payment kind.
pub fn order_form(
    client_id: ClientId,
    width: &str,
    length: &str,
    price: &str,
    payment_kind: &str,
) -> OrderForm {
    OrderForm {
        client_id,
        name: "Banner".into(),
        order_type: "print".into(),
        width: width.into(),
        length: length.into(),
        price_per_cm: price.into(),
        payment_kind: payment_kind.into(),
    }
}

pub fn payment_form(client_id: ClientId, amount: &str) -> PaymentForm {
    PaymentForm {
        client_id,
        amount: amount.into(),
    }
}
