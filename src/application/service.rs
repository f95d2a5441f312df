use anyhow::Context;
use chrono::{Datelike, Local, NaiveDate};

use crate::domain::{
    Client, ClientId, Order, OrderId, Payment, PaymentId, PaymentKind, WeekdayNames,
};
use crate::storage::Repository;

use super::{
    AppError, ClientEditForm, ClientForm, DailyRevenue, MonthlyRevenueReport, OrderForm,
    OrderUpdateForm, PaymentForm, PaymentUpdateForm,
};

/// Application service providing the ledger operations.
/// This is the primary interface for any client (CLI, export, tests).
///
/// Each mutating operation validates its input first, then runs every
/// read and write inside a single transaction, so a client's balances
/// and its child rows change together or not at all.
pub struct LedgerService {
    repo: Repository,
    weekdays: WeekdayNames,
}

/// Result of placing an order: the stored order plus the companion
/// payment created for cash orders.
pub struct OrderReceipt {
    pub order: Order,
    pub companion_payment: Option<Payment>,
}

/// A client together with everything it owns, for the records view and
/// the workbook export.
pub struct ClientStatement {
    pub client: Client,
    pub orders: Vec<Order>,
    pub payments: Vec<Payment>,
}

impl LedgerService {
    /// Create a new ledger service with the given repository.
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            weekdays: WeekdayNames::default(),
        }
    }

    /// Replace the weekday localization table.
    pub fn with_weekday_names(mut self, weekdays: WeekdayNames) -> Self {
        self.weekdays = weekdays;
        self
    }

    /// Initialize a new database at the given path.
    pub async fn init(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let repo = Repository::init(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Connect to an existing database.
    pub async fn connect(database_path: &str) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let repo = Repository::connect(&db_url).await?;
        Ok(Self::new(repo))
    }

    /// Today's date plus its localized weekday name, stamped onto new
    /// orders and payments.
    fn today_stamp(&self) -> (NaiveDate, String) {
        let today = Local::now().date_naive();
        let day = self.weekdays.name_for(today.weekday()).to_string();
        (today, day)
    }

    // ========================
    // Client operations
    // ========================

    /// Create a new client with operator-entered opening balances.
    pub async fn create_client(&self, form: ClientForm) -> Result<Client, AppError> {
        let input = form.validate()?;
        let mut client = Client::new(input.name, input.paid_amount, input.owed_amount);

        let mut tx = self.repo.begin().await?;
        Repository::insert_client(&mut tx, &mut client).await?;
        tx.commit().await.context("Failed to commit client")?;

        Ok(client)
    }

    /// Overwrite a client's name and balances verbatim (operator
    /// correction flow; no derivation, no rebalancing).
    pub async fn update_client(
        &self,
        id: ClientId,
        form: ClientEditForm,
    ) -> Result<Client, AppError> {
        let edit = form.validate()?;

        let mut tx = self.repo.begin().await?;
        let mut client = Repository::fetch_client(&mut tx, id)
            .await?
            .ok_or(AppError::ClientNotFound(id))?;

        client.name = edit.name;
        client.paid_amount = edit.paid_amount;
        client.owed_amount = edit.owed_amount;
        client.total_bill = edit.total_bill;

        Repository::update_client(&mut tx, &client).await?;
        tx.commit().await.context("Failed to commit client update")?;

        Ok(client)
    }

    /// Delete a client. Rejected while the client still owns any order
    /// or payment.
    pub async fn delete_client(&self, id: ClientId) -> Result<Client, AppError> {
        let mut tx = self.repo.begin().await?;
        let client = Repository::fetch_client(&mut tx, id)
            .await?
            .ok_or(AppError::ClientNotFound(id))?;

        let (orders, payments) = Repository::count_client_records(&mut tx, id).await?;
        if orders > 0 || payments > 0 {
            return Err(AppError::ClientHasRecords { orders, payments });
        }

        Repository::delete_client(&mut tx, id).await?;
        tx.commit().await.context("Failed to commit client delete")?;

        Ok(client)
    }

    /// Get a client by id.
    pub async fn get_client(&self, id: ClientId) -> Result<Client, AppError> {
        self.repo
            .get_client(id)
            .await?
            .ok_or(AppError::ClientNotFound(id))
    }

    /// List all clients.
    pub async fn list_clients(&self) -> Result<Vec<Client>, AppError> {
        Ok(self.repo.list_clients().await?)
    }

    /// A client together with its orders and payments.
    pub async fn client_statement(&self, id: ClientId) -> Result<ClientStatement, AppError> {
        let client = self.get_client(id).await?;
        let orders = self.repo.list_orders(Some(id)).await?;
        let payments = self.repo.list_payments(Some(id)).await?;
        Ok(ClientStatement {
            client,
            orders,
            payments,
        })
    }

    // ========================
    // Order operations
    // ========================

    /// Place an order. The total is priced by the ceiling rule and the
    /// client's bill grows by it; cash orders settle immediately through
    /// a companion payment, installment orders land on the outstanding
    /// balance.
    pub async fn create_order(&self, form: OrderForm) -> Result<OrderReceipt, AppError> {
        let input = form.validate()?;
        let (today, day) = self.today_stamp();

        let mut tx = self.repo.begin().await?;
        let client = Repository::fetch_client(&mut tx, input.client_id)
            .await?
            .ok_or(AppError::ClientNotFound(input.client_id))?;

        let mut order = Order::new(
            client.id,
            input.name,
            input.order_type,
            input.width,
            input.length,
            input.price_per_cm,
            input.payment_kind,
            today,
            day.clone(),
        );
        Repository::insert_order(&mut tx, &mut order).await?;

        let total = order.total_price;
        let companion_payment = match input.payment_kind {
            PaymentKind::Cash => {
                let mut payment = Payment::new(client.id, total, today, day);
                Repository::insert_payment(&mut tx, &mut payment).await?;
                Repository::apply_balance_delta(&mut tx, client.id, total, 0, total).await?;
                Some(payment)
            }
            PaymentKind::Installment => {
                Repository::apply_balance_delta(&mut tx, client.id, 0, total, total).await?;
                None
            }
        };

        tx.commit().await.context("Failed to commit order")?;

        Ok(OrderReceipt {
            order,
            companion_payment,
        })
    }

    /// Edit an order. The re-entered total is taken as given and the
    /// difference to the stored total moves both the bill and the
    /// outstanding balance, whichever way the order was originally paid.
    pub async fn update_order(
        &self,
        id: OrderId,
        form: OrderUpdateForm,
    ) -> Result<Order, AppError> {
        let edit = form.validate()?;

        let mut tx = self.repo.begin().await?;
        let mut order = Repository::fetch_order(&mut tx, id)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;

        let delta = edit.total_price - order.total_price;

        order.name = edit.name;
        order.order_type = edit.order_type;
        order.width = edit.width;
        order.length = edit.length;
        order.price_per_cm = edit.price_per_cm;
        order.total_price = edit.total_price;
        order.payment_kind = edit.payment_kind;

        Repository::apply_balance_delta(&mut tx, order.client_id, 0, delta, delta).await?;
        Repository::update_order(&mut tx, &order).await?;
        tx.commit().await.context("Failed to commit order update")?;

        Ok(order)
    }

    /// Delete an order, subtracting its total from the owning client's
    /// bill and outstanding balance, whichever way it was paid.
    pub async fn delete_order(&self, id: OrderId) -> Result<Order, AppError> {
        let mut tx = self.repo.begin().await?;
        let order = Repository::fetch_order(&mut tx, id)
            .await?
            .ok_or(AppError::OrderNotFound(id))?;

        let total = order.total_price;
        Repository::apply_balance_delta(&mut tx, order.client_id, 0, -total, -total).await?;
        Repository::delete_order(&mut tx, id).await?;
        tx.commit().await.context("Failed to commit order delete")?;

        Ok(order)
    }

    /// List orders, optionally restricted to one client.
    pub async fn list_orders(&self, client_id: Option<ClientId>) -> Result<Vec<Order>, AppError> {
        Ok(self.repo.list_orders(client_id).await?)
    }

    /// Get an order by id.
    pub async fn get_order(&self, id: OrderId) -> Result<Order, AppError> {
        self.repo
            .get_order(id)
            .await?
            .ok_or(AppError::OrderNotFound(id))
    }

    // ========================
    // Payment operations
    // ========================

    /// Record a standalone payment against a client's outstanding
    /// balance. A payment can never exceed what is owed; the balance is
    /// floored at zero afterwards as a safety net.
    pub async fn record_payment(&self, form: PaymentForm) -> Result<Payment, AppError> {
        let input = form.validate()?;
        let (today, day) = self.today_stamp();

        let mut tx = self.repo.begin().await?;
        let client = Repository::fetch_client(&mut tx, input.client_id)
            .await?
            .ok_or(AppError::ClientNotFound(input.client_id))?;

        if input.amount_paid > client.owed_amount {
            return Err(AppError::PaymentExceedsOwed {
                requested: input.amount_paid,
                owed: client.owed_amount,
            });
        }

        let mut payment = Payment::new(client.id, input.amount_paid, today, day);
        Repository::insert_payment(&mut tx, &mut payment).await?;
        Repository::apply_balance_delta(
            &mut tx,
            client.id,
            input.amount_paid,
            -input.amount_paid,
            0,
        )
        .await?;
        Repository::clamp_owed_floor(&mut tx, client.id).await?;
        tx.commit().await.context("Failed to commit payment")?;

        Ok(payment)
    }

    /// Edit a payment. The amount difference is applied to the newly
    /// selected client, which also becomes the owner. When the payment
    /// is moved between clients the previous owner's balances are left
    /// as they were.
    pub async fn update_payment(
        &self,
        id: PaymentId,
        form: PaymentUpdateForm,
    ) -> Result<Payment, AppError> {
        let edit = form.validate()?;

        let mut tx = self.repo.begin().await?;
        let mut payment = Repository::fetch_payment(&mut tx, id)
            .await?
            .ok_or(AppError::PaymentNotFound(id))?;

        let client = Repository::fetch_client(&mut tx, edit.client_id)
            .await?
            .ok_or(AppError::ClientNotFound(edit.client_id))?;

        let delta = edit.amount_paid - payment.amount_paid;
        payment.client_id = client.id;
        payment.amount_paid = edit.amount_paid;

        Repository::apply_balance_delta(&mut tx, client.id, delta, -delta, 0).await?;
        Repository::update_payment(&mut tx, &payment).await?;
        tx.commit()
            .await
            .context("Failed to commit payment update")?;

        Ok(payment)
    }

    /// Delete a payment, reversing it on the owning client.
    pub async fn delete_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        let mut tx = self.repo.begin().await?;
        let payment = Repository::fetch_payment(&mut tx, id)
            .await?
            .ok_or(AppError::PaymentNotFound(id))?;

        let amount = payment.amount_paid;
        Repository::apply_balance_delta(&mut tx, payment.client_id, -amount, amount, 0).await?;
        Repository::delete_payment(&mut tx, id).await?;
        tx.commit()
            .await
            .context("Failed to commit payment delete")?;

        Ok(payment)
    }

    /// List payments, optionally restricted to one client.
    pub async fn list_payments(
        &self,
        client_id: Option<ClientId>,
    ) -> Result<Vec<Payment>, AppError> {
        Ok(self.repo.list_payments(client_id).await?)
    }

    /// Get a payment by id.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Payment, AppError> {
        self.repo
            .get_payment(id)
            .await?
            .ok_or(AppError::PaymentNotFound(id))
    }

    // ========================
    // Reporting
    // ========================

    /// Payments of one month grouped per day, in calendar order, with a
    /// grand total.
    pub async fn monthly_revenue(
        &self,
        month: u32,
        year: i32,
    ) -> Result<MonthlyRevenueReport, AppError> {
        let totals = self.repo.sum_payments_by_day(month, year).await?;
        let total = totals.iter().map(|t| t.total).sum();

        Ok(MonthlyRevenueReport {
            month,
            year,
            days: totals
                .into_iter()
                .map(|t| DailyRevenue {
                    date: t.date,
                    day_name: t.day_name,
                    total: t.total,
                })
                .collect(),
            total,
        })
    }
}
