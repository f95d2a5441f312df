use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool, Transaction};

use crate::domain::{
    format_date, parse_date, Cents, Client, ClientId, Order, OrderId, Payment, PaymentId,
    PaymentKind,
};

use super::MIGRATION_001_INITIAL;

/// Per-day payment total used by the monthly revenue report.
#[derive(Debug, Clone)]
pub struct DailyPaymentTotal {
    pub date: NaiveDate,
    pub day_name: String,
    pub total: Cents,
}

/// Repository for persisting and querying clients, orders, and payments.
///
/// Read queries run against the pool. Mutations are associated functions
/// taking `&mut SqliteConnection` so the service can compose several of
/// them inside one transaction.
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    /// Create a new repository with the given SQLite connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given path.
    /// Creates the database file if it doesn't exist.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_INITIAL)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Initialize a new database (connect + migrate).
    pub async fn init(database_url: &str) -> Result<Self> {
        let repo = Self::connect(database_url).await?;
        repo.migrate().await?;
        Ok(repo)
    }

    /// Begin a transaction covering one ledger operation.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>> {
        self.pool
            .begin()
            .await
            .context("Failed to begin transaction")
    }

    // ========================
    // Client operations
    // ========================

    /// Insert a new client and assign its row id.
    pub async fn insert_client(conn: &mut SqliteConnection, client: &mut Client) -> Result<()> {
        let row = sqlx::query(
            r#"
            INSERT INTO clients (name, paid_amount, owed_amount, total_bill)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&client.name)
        .bind(client.paid_amount)
        .bind(client.owed_amount)
        .bind(client.total_bill)
        .fetch_one(conn)
        .await
        .context("Failed to insert client")?;

        client.id = row.get("id");
        Ok(())
    }

    /// Fetch a client by id within a transaction.
    pub async fn fetch_client(
        conn: &mut SqliteConnection,
        id: ClientId,
    ) -> Result<Option<Client>> {
        let row = sqlx::query(
            "SELECT id, name, paid_amount, owed_amount, total_bill FROM clients WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch client")?;

        Ok(row.map(|row| Self::row_to_client(&row)))
    }

    /// Overwrite every client field, balances included.
    pub async fn update_client(conn: &mut SqliteConnection, client: &Client) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET name = ?, paid_amount = ?, owed_amount = ?, total_bill = ?
            WHERE id = ?
            "#,
        )
        .bind(&client.name)
        .bind(client.paid_amount)
        .bind(client.owed_amount)
        .bind(client.total_bill)
        .bind(client.id)
        .execute(conn)
        .await
        .context("Failed to update client")?;
        Ok(())
    }

    /// Apply relative balance adjustments to a client in one statement.
    pub async fn apply_balance_delta(
        conn: &mut SqliteConnection,
        id: ClientId,
        paid_delta: Cents,
        owed_delta: Cents,
        bill_delta: Cents,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE clients
            SET paid_amount = paid_amount + ?,
                owed_amount = owed_amount + ?,
                total_bill = total_bill + ?
            WHERE id = ?
            "#,
        )
        .bind(paid_delta)
        .bind(owed_delta)
        .bind(bill_delta)
        .bind(id)
        .execute(conn)
        .await
        .context("Failed to adjust client balances")?;
        Ok(())
    }

    /// Floor a client's outstanding balance at zero.
    pub async fn clamp_owed_floor(conn: &mut SqliteConnection, id: ClientId) -> Result<()> {
        sqlx::query("UPDATE clients SET owed_amount = 0 WHERE id = ? AND owed_amount < 0")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to clamp outstanding balance")?;
        Ok(())
    }

    pub async fn delete_client(conn: &mut SqliteConnection, id: ClientId) -> Result<()> {
        sqlx::query("DELETE FROM clients WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to delete client")?;
        Ok(())
    }

    /// Count the orders and payments owned by a client.
    pub async fn count_client_records(
        conn: &mut SqliteConnection,
        id: ClientId,
    ) -> Result<(i64, i64)> {
        let row = sqlx::query(
            r#"
            SELECT
                (SELECT COUNT(*) FROM orders WHERE client_id = ?) AS order_count,
                (SELECT COUNT(*) FROM payments WHERE client_id = ?) AS payment_count
            "#,
        )
        .bind(id)
        .bind(id)
        .fetch_one(conn)
        .await
        .context("Failed to count client records")?;

        Ok((row.get("order_count"), row.get("payment_count")))
    }

    /// Get a client by id.
    pub async fn get_client(&self, id: ClientId) -> Result<Option<Client>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::fetch_client(&mut conn, id).await
    }

    /// List all clients ordered by name.
    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        let rows = sqlx::query(
            "SELECT id, name, paid_amount, owed_amount, total_bill FROM clients ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to list clients")?;

        Ok(rows.iter().map(Self::row_to_client).collect())
    }

    fn row_to_client(row: &sqlx::sqlite::SqliteRow) -> Client {
        Client {
            id: row.get("id"),
            name: row.get("name"),
            paid_amount: row.get("paid_amount"),
            owed_amount: row.get("owed_amount"),
            total_bill: row.get("total_bill"),
        }
    }

    // ========================
    // Order operations
    // ========================

    /// Insert a new order and assign its row id.
    pub async fn insert_order(conn: &mut SqliteConnection, order: &mut Order) -> Result<()> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (order_name, client_id, width, length, price_per_cm, total_price, payment_type, order_type, order_date, order_day)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&order.name)
        .bind(order.client_id)
        .bind(order.width)
        .bind(order.length)
        .bind(order.price_per_cm)
        .bind(order.total_price)
        .bind(order.payment_kind.as_str())
        .bind(&order.order_type)
        .bind(format_date(order.order_date))
        .bind(&order.order_day)
        .fetch_one(conn)
        .await
        .context("Failed to insert order")?;

        order.id = row.get("id");
        Ok(())
    }

    /// Fetch an order by id within a transaction.
    pub async fn fetch_order(conn: &mut SqliteConnection, id: OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, order_name, client_id, width, length, price_per_cm, total_price, payment_type, order_type, order_date, order_day
            FROM orders
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch order")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_order(&row)?)),
            None => Ok(None),
        }
    }

    /// Update an order's editable fields. Date and day stamps are untouched.
    pub async fn update_order(conn: &mut SqliteConnection, order: &Order) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE orders
            SET order_name = ?, order_type = ?, width = ?, length = ?, price_per_cm = ?, total_price = ?, payment_type = ?
            WHERE id = ?
            "#,
        )
        .bind(&order.name)
        .bind(&order.order_type)
        .bind(order.width)
        .bind(order.length)
        .bind(order.price_per_cm)
        .bind(order.total_price)
        .bind(order.payment_kind.as_str())
        .bind(order.id)
        .execute(conn)
        .await
        .context("Failed to update order")?;
        Ok(())
    }

    pub async fn delete_order(conn: &mut SqliteConnection, id: OrderId) -> Result<()> {
        sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to delete order")?;
        Ok(())
    }

    /// Get an order by id.
    pub async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::fetch_order(&mut conn, id).await
    }

    /// List orders, optionally restricted to one client.
    pub async fn list_orders(&self, client_id: Option<ClientId>) -> Result<Vec<Order>> {
        let query = r#"
            SELECT id, order_name, client_id, width, length, price_per_cm, total_price, payment_type, order_type, order_date, order_day
            FROM orders
        "#;

        let rows = match client_id {
            Some(id) => {
                sqlx::query(&format!("{query} WHERE client_id = ? ORDER BY id"))
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query(&format!("{query} ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list orders")?;

        rows.iter().map(Self::row_to_order).collect()
    }

    fn row_to_order(row: &sqlx::sqlite::SqliteRow) -> Result<Order> {
        let payment_type: String = row.get("payment_type");
        let order_date: String = row.get("order_date");

        Ok(Order {
            id: row.get("id"),
            client_id: row.get("client_id"),
            name: row.get("order_name"),
            order_type: row.get("order_type"),
            width: row.get("width"),
            length: row.get("length"),
            price_per_cm: row.get("price_per_cm"),
            total_price: row.get("total_price"),
            payment_kind: PaymentKind::from_str(&payment_type)
                .ok_or_else(|| anyhow::anyhow!("Invalid payment type: {}", payment_type))?,
            order_date: parse_date(&order_date)
                .ok_or_else(|| anyhow::anyhow!("Invalid order date: {}", order_date))?,
            order_day: row.get("order_day"),
        })
    }

    // ========================
    // Payment operations
    // ========================

    /// Insert a new payment and assign its row id.
    pub async fn insert_payment(conn: &mut SqliteConnection, payment: &mut Payment) -> Result<()> {
        let row = sqlx::query(
            r#"
            INSERT INTO payments (client_id, payment_date, payment_day, amount_paid)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(payment.client_id)
        .bind(format_date(payment.payment_date))
        .bind(&payment.payment_day)
        .bind(payment.amount_paid)
        .fetch_one(conn)
        .await
        .context("Failed to insert payment")?;

        payment.id = row.get("id");
        Ok(())
    }

    /// Fetch a payment by id within a transaction.
    pub async fn fetch_payment(
        conn: &mut SqliteConnection,
        id: PaymentId,
    ) -> Result<Option<Payment>> {
        let row = sqlx::query(
            "SELECT id, client_id, payment_date, payment_day, amount_paid FROM payments WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch payment")?;

        match row {
            Some(row) => Ok(Some(Self::row_to_payment(&row)?)),
            None => Ok(None),
        }
    }

    /// Update a payment's owner and amount. Date and day stamps are untouched.
    pub async fn update_payment(conn: &mut SqliteConnection, payment: &Payment) -> Result<()> {
        sqlx::query("UPDATE payments SET client_id = ?, amount_paid = ? WHERE id = ?")
            .bind(payment.client_id)
            .bind(payment.amount_paid)
            .bind(payment.id)
            .execute(conn)
            .await
            .context("Failed to update payment")?;
        Ok(())
    }

    pub async fn delete_payment(conn: &mut SqliteConnection, id: PaymentId) -> Result<()> {
        sqlx::query("DELETE FROM payments WHERE id = ?")
            .bind(id)
            .execute(conn)
            .await
            .context("Failed to delete payment")?;
        Ok(())
    }

    /// Get a payment by id.
    pub async fn get_payment(&self, id: PaymentId) -> Result<Option<Payment>> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .context("Failed to acquire connection")?;
        Self::fetch_payment(&mut conn, id).await
    }

    /// List payments, optionally restricted to one client.
    pub async fn list_payments(&self, client_id: Option<ClientId>) -> Result<Vec<Payment>> {
        let query = "SELECT id, client_id, payment_date, payment_day, amount_paid FROM payments";

        let rows = match client_id {
            Some(id) => {
                sqlx::query(&format!("{query} WHERE client_id = ? ORDER BY id"))
                    .bind(id)
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                sqlx::query(&format!("{query} ORDER BY id"))
                    .fetch_all(&self.pool)
                    .await
            }
        }
        .context("Failed to list payments")?;

        rows.iter().map(Self::row_to_payment).collect()
    }

    /// Sum payments per day for one month, in calendar order.
    /// Dates are stored as dd/mm/yyyy text, so the month and year are
    /// matched positionally and ordering is done after parsing.
    pub async fn sum_payments_by_day(
        &self,
        month: u32,
        year: i32,
    ) -> Result<Vec<DailyPaymentTotal>> {
        // One row per date. Stored day names can differ for the same
        // date across localization settings, so they must not split the
        // bucket; MIN picks one representative.
        let rows = sqlx::query(
            r#"
            SELECT payment_date, MIN(payment_day) AS payment_day, SUM(amount_paid) AS total
            FROM payments
            WHERE substr(payment_date, 4, 2) = ? AND substr(payment_date, 7, 4) = ?
            GROUP BY payment_date
            "#,
        )
        .bind(format!("{month:02}"))
        .bind(format!("{year:04}"))
        .fetch_all(&self.pool)
        .await
        .context("Failed to sum payments by day")?;

        let mut totals = Vec::with_capacity(rows.len());
        for row in rows {
            let date_str: String = row.get("payment_date");
            let date = parse_date(&date_str)
                .ok_or_else(|| anyhow::anyhow!("Invalid payment date: {}", date_str))?;
            totals.push(DailyPaymentTotal {
                date,
                day_name: row.get("payment_day"),
                total: row.get("total"),
            });
        }

        totals.sort_by_key(|t| t.date);
        Ok(totals)
    }

    fn row_to_payment(row: &sqlx::sqlite::SqliteRow) -> Result<Payment> {
        let payment_date: String = row.get("payment_date");

        Ok(Payment {
            id: row.get("id"),
            client_id: row.get("client_id"),
            amount_paid: row.get("amount_paid"),
            payment_date: parse_date(&payment_date)
                .ok_or_else(|| anyhow::anyhow!("Invalid payment date: {}", payment_date))?,
            payment_day: row.get("payment_day"),
        })
    }
}
