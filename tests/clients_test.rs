mod common;

use anyhow::Result;
use common::{create_client, order_form, payment_form, test_service};
use daftar::application::{AppError, ClientEditForm, ClientForm};

#[tokio::test]
async fn test_create_client_opening_bill_is_paid_plus_owed() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let client = create_client(&service, "Omar", "25.00", "75.00").await?;

    assert_eq!(client.paid_amount, 2500);
    assert_eq!(client.owed_amount, 7500);
    assert_eq!(client.total_bill, 10000);
    Ok(())
}

#[tokio::test]
async fn test_create_client_blank_balances_default_to_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let client = create_client(&service, "Leila", "", "").await?;

    assert_eq!(client.paid_amount, 0);
    assert_eq!(client.owed_amount, 0);
    assert_eq!(client.total_bill, 0);
    Ok(())
}

#[tokio::test]
async fn test_create_client_rejects_missing_name_without_insert() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .create_client(ClientForm {
            name: "   ".into(),
            paid: "10".into(),
            owed: "0".into(),
        })
        .await;

    assert!(matches!(result, Err(AppError::MissingField(_))));
    assert!(service.list_clients().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_create_client_rejects_non_numeric_amount() -> Result<()> {
    let (service, _temp) = test_service().await?;

    let result = service
        .create_client(ClientForm {
            name: "Omar".into(),
            paid: "ten".into(),
            owed: "0".into(),
        })
        .await;

    assert!(matches!(result, Err(AppError::InvalidNumber { .. })));
    assert!(service.list_clients().await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_edit_client_overwrites_all_fields_verbatim() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "0").await?;

    let updated = service
        .update_client(
            client.id,
            ClientEditForm {
                name: "Omar K.".into(),
                paid: "12.50".into(),
                owed: "37.50".into(),
                total_bill: "99.00".into(),
            },
        )
        .await?;

    assert_eq!(updated.name, "Omar K.");
    assert_eq!(updated.paid_amount, 1250);
    assert_eq!(updated.owed_amount, 3750);
    // The correction flow takes the total as entered, it is not re-derived.
    assert_eq!(updated.total_bill, 9900);

    let stored = service.get_client(client.id).await?;
    assert_eq!(stored.total_bill, 9900);
    Ok(())
}

#[tokio::test]
async fn test_delete_client_blocked_while_orders_exist() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "0").await?;
    service
        .create_order(order_form(client.id, "2", "3", "1.00", "installment"))
        .await?;

    let result = service.delete_client(client.id).await;
    assert!(matches!(
        result,
        Err(AppError::ClientHasRecords {
            orders: 1,
            payments: 0
        })
    ));

    // Still there.
    assert_eq!(service.list_clients().await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_delete_client_blocked_while_payments_exist() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "50.00").await?;
    service
        .record_payment(payment_form(client.id, "20.00"))
        .await?;

    let result = service.delete_client(client.id).await;
    assert!(matches!(
        result,
        Err(AppError::ClientHasRecords {
            orders: 0,
            payments: 1
        })
    ));
    Ok(())
}

#[tokio::test]
async fn test_delete_client_succeeds_once_records_are_gone() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "0").await?;
    let receipt = service
        .create_order(order_form(client.id, "2", "3", "1.00", "installment"))
        .await?;

    service.delete_order(receipt.order.id).await?;
    service.delete_client(client.id).await?;

    assert!(service.list_clients().await?.is_empty());
    assert!(matches!(
        service.get_client(client.id).await,
        Err(AppError::ClientNotFound(_))
    ));
    Ok(())
}

#[tokio::test]
async fn test_delete_missing_client_is_not_found() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert!(matches!(
        service.delete_client(42).await,
        Err(AppError::ClientNotFound(42))
    ));
    Ok(())
}
