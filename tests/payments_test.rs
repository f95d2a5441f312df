mod common;

use anyhow::Result;
use common::{create_client, payment_form, test_service};
use daftar::application::{AppError, PaymentUpdateForm};

#[tokio::test]
async fn test_record_payment_moves_owed_to_paid() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "50.00").await?;

    let payment = service
        .record_payment(payment_form(client.id, "20.00"))
        .await?;
    assert_eq!(payment.amount_paid, 2000);
    assert!(!payment.payment_day.is_empty());

    let after = service.get_client(client.id).await?;
    assert_eq!(after.paid_amount, 2000);
    assert_eq!(after.owed_amount, 3000);
    assert_eq!(after.total_bill, 5000); // Untouched by standalone payments
    Ok(())
}

#[tokio::test]
async fn test_overpayment_is_rejected_without_mutation() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "50.00").await?;

    let result = service.record_payment(payment_form(client.id, "75.00")).await;
    assert!(matches!(
        result,
        Err(AppError::PaymentExceedsOwed {
            requested: 7500,
            owed: 5000
        })
    ));

    let after = service.get_client(client.id).await?;
    assert_eq!(after.paid_amount, 0);
    assert_eq!(after.owed_amount, 5000);
    assert!(service.list_payments(Some(client.id)).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_exact_payoff_leaves_owed_at_zero() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "30.00").await?;

    service
        .record_payment(payment_form(client.id, "30.00"))
        .await?;

    let after = service.get_client(client.id).await?;
    assert_eq!(after.owed_amount, 0);
    assert_eq!(after.paid_amount, 3000);
    Ok(())
}

#[tokio::test]
async fn test_owed_never_goes_negative_across_payment_sequences() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "50.00").await?;

    service
        .record_payment(payment_form(client.id, "20.00"))
        .await?;
    service
        .record_payment(payment_form(client.id, "20.00"))
        .await?;
    service
        .record_payment(payment_form(client.id, "10.00"))
        .await?;

    let after = service.get_client(client.id).await?;
    assert_eq!(after.owed_amount, 0);
    assert_eq!(after.paid_amount, 5000);

    // Nothing left to pay against.
    assert!(matches!(
        service.record_payment(payment_form(client.id, "0.01")).await,
        Err(AppError::PaymentExceedsOwed { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn test_record_payment_rejects_zero_and_negative_amounts() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "50.00").await?;

    for bad in ["0", "-5.00"] {
        let result = service.record_payment(payment_form(client.id, bad)).await;
        assert!(matches!(result, Err(AppError::InvalidAmount(_))));
    }
    assert!(service.list_payments(Some(client.id)).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_record_payment_for_missing_client_aborts() -> Result<()> {
    let (service, _temp) = test_service().await?;

    assert!(matches!(
        service.record_payment(payment_form(404, "5.00")).await,
        Err(AppError::ClientNotFound(404))
    ));
    Ok(())
}

#[tokio::test]
async fn test_delete_payment_reverses_it_on_the_owner() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "50.00").await?;
    let payment = service
        .record_payment(payment_form(client.id, "20.00"))
        .await?;

    service.delete_payment(payment.id).await?;

    let after = service.get_client(client.id).await?;
    assert_eq!(after.paid_amount, 0);
    assert_eq!(after.owed_amount, 5000);
    assert!(service.list_payments(Some(client.id)).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_update_payment_applies_the_amount_delta() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "50.00").await?;
    let payment = service
        .record_payment(payment_form(client.id, "20.00"))
        .await?;

    let updated = service
        .update_payment(
            payment.id,
            PaymentUpdateForm {
                client_id: client.id,
                amount: "35.00".into(),
            },
        )
        .await?;
    assert_eq!(updated.amount_paid, 3500);

    let after = service.get_client(client.id).await?;
    assert_eq!(after.paid_amount, 3500);
    assert_eq!(after.owed_amount, 1500);
    Ok(())
}

#[tokio::test]
async fn test_update_payment_reassignment_leaves_old_owner_untouched() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let omar = create_client(&service, "Omar", "0", "50.00").await?;
    let leila = create_client(&service, "Leila", "0", "80.00").await?;
    let payment = service.record_payment(payment_form(omar.id, "20.00")).await?;

    let moved = service
        .update_payment(
            payment.id,
            PaymentUpdateForm {
                client_id: leila.id,
                amount: "20.00".into(),
            },
        )
        .await?;
    assert_eq!(moved.client_id, leila.id);

    // Only the newly selected client absorbs the delta (zero here, since
    // the amount is unchanged). The previous owner keeps the balances the
    // original payment gave it: a correctness gap preserved on purpose,
    // pinned by this test so any change to it is a conscious one.
    let old_owner = service.get_client(omar.id).await?;
    assert_eq!(old_owner.paid_amount, 2000);
    assert_eq!(old_owner.owed_amount, 3000);

    let new_owner = service.get_client(leila.id).await?;
    assert_eq!(new_owner.paid_amount, 0);
    assert_eq!(new_owner.owed_amount, 8000);

    // The payment itself now lists under the new owner.
    assert!(service.list_payments(Some(omar.id)).await?.is_empty());
    assert_eq!(service.list_payments(Some(leila.id)).await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_update_payment_to_missing_client_aborts() -> Result<()> {
    let (service, _temp) = test_service().await?;
    let client = create_client(&service, "Omar", "0", "50.00").await?;
    let payment = service
        .record_payment(payment_form(client.id, "20.00"))
        .await?;

    let result = service
        .update_payment(
            payment.id,
            PaymentUpdateForm {
                client_id: 999,
                amount: "20.00".into(),
            },
        )
        .await;
    assert!(matches!(result, Err(AppError::ClientNotFound(999))));

    // No partial effects.
    let after = service.get_client(client.id).await?;
    assert_eq!(after.paid_amount, 2000);
    assert_eq!(service.list_payments(Some(client.id)).await?.len(), 1);
    Ok(())
}
