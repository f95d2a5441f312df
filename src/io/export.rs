use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::application::{ClientStatement, LedgerService};
use crate::domain::{format_cents, format_date, Client, Order, Payment};

/// Excel-compatible sheet name limit.
const SHEET_NAME_MAX: usize = 31;

/// Database snapshot for full export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub clients: Vec<Client>,
    pub orders: Vec<Order>,
    pub payments: Vec<Payment>,
}

/// Summary of a workbook export.
pub struct WorkbookSummary {
    pub directory: PathBuf,
    pub sheets: Vec<String>,
}

/// Exporter for converting ledger data to spreadsheet and JSON formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export the whole ledger as a workbook directory: one sheet (CSV
    /// file) per client, named after the client. Each sheet holds the
    /// client summary block, the client's orders, and the client's
    /// payments at fixed row offsets.
    pub async fn export_workbook(&self, directory: &Path) -> Result<WorkbookSummary> {
        fs::create_dir_all(directory)
            .with_context(|| format!("Failed to create workbook directory: {:?}", directory))?;

        let clients = self.service.list_clients().await?;
        let mut sheets = Vec::with_capacity(clients.len());
        let mut taken = HashSet::new();

        for client in clients {
            let statement = self.service.client_statement(client.id).await?;
            // Client names are not unique; suffix the id when a name
            // (possibly after truncation) would reuse a sheet.
            let mut sheet_name = sheet_name(&statement.client.name);
            if !taken.insert(sheet_name.clone()) {
                sheet_name = format!("{sheet_name}-{}", client.id);
                taken.insert(sheet_name.clone());
            }
            let path = directory.join(format!("{sheet_name}.csv"));
            let file = File::create(&path)
                .with_context(|| format!("Failed to create sheet: {:?}", path))?;
            write_client_sheet(file, &statement)?;
            sheets.push(sheet_name);
        }

        Ok(WorkbookSummary {
            directory: directory.to_path_buf(),
            sheets,
        })
    }

    /// Export all clients with their balances to CSV format
    pub async fn export_clients_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let clients = self.service.list_clients().await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["id", "name", "paid_amount", "owed_amount", "total_bill"])?;

        let mut count = 0;
        for client in &clients {
            csv_writer.write_record([
                client.id.to_string(),
                client.name.clone(),
                format_cents(client.paid_amount),
                format_cents(client.owed_amount),
                format_cents(client.total_bill),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export all orders to CSV format
    pub async fn export_orders_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let orders = self.service.list_orders(None).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "client_id",
            "order_name",
            "order_type",
            "width",
            "length",
            "price_per_cm",
            "total_price",
            "payment_type",
            "order_date",
            "order_day",
        ])?;

        let mut count = 0;
        for order in &orders {
            csv_writer.write_record(order_record(order))?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export all payments to CSV format
    pub async fn export_payments_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let payments = self.service.list_payments(None).await?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "id",
            "client_id",
            "payment_date",
            "payment_day",
            "amount_paid",
        ])?;

        let mut count = 0;
        for payment in &payments {
            csv_writer.write_record(payment_record(payment))?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the full database as a JSON snapshot
    pub async fn export_full_json<W: Write>(&self, mut writer: W) -> Result<DatabaseSnapshot> {
        let clients = self.service.list_clients().await?;
        let orders = self.service.list_orders(None).await?;
        let payments = self.service.list_payments(None).await?;

        let snapshot = DatabaseSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            clients,
            orders,
            payments,
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

/// Write one client sheet: summary block at the top, orders starting at
/// row 3, payments starting at `orders + 6` (both offsets counted from
/// the sheet top, matching the workbook layout).
fn write_client_sheet<W: Write>(writer: W, statement: &ClientStatement) -> Result<()> {
    let mut sheet = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    let client = &statement.client;
    sheet.write_record(["client_name", "paid_amount", "owed_amount", "total_bill"])?;
    sheet.write_record([
        client.name.clone(),
        format_cents(client.paid_amount),
        format_cents(client.owed_amount),
        format_cents(client.total_bill),
    ])?;

    // One blank row puts the orders header on row 3.
    sheet.write_record([""])?;
    sheet.write_record([
        "id",
        "client_id",
        "order_name",
        "order_type",
        "width",
        "length",
        "price_per_cm",
        "total_price",
        "payment_type",
        "order_date",
        "order_day",
    ])?;
    for order in &statement.orders {
        sheet.write_record(order_record(order))?;
    }

    // Payments header lands on row orders + 6.
    sheet.write_record([""])?;
    sheet.write_record([""])?;
    sheet.write_record([
        "id",
        "client_id",
        "payment_date",
        "payment_day",
        "amount_paid",
    ])?;
    for payment in &statement.payments {
        sheet.write_record(payment_record(payment))?;
    }

    sheet.flush()?;
    Ok(())
}

fn order_record(order: &Order) -> Vec<String> {
    vec![
        order.id.to_string(),
        order.client_id.to_string(),
        order.name.clone(),
        order.order_type.clone(),
        order.width.to_string(),
        order.length.to_string(),
        format_cents(order.price_per_cm),
        format_cents(order.total_price),
        order.payment_kind.to_string(),
        format_date(order.order_date),
        order.order_day.clone(),
    ]
}

fn payment_record(payment: &Payment) -> Vec<String> {
    vec![
        payment.id.to_string(),
        payment.client_id.to_string(),
        format_date(payment.payment_date),
        payment.payment_day.clone(),
        format_cents(payment.amount_paid),
    ]
}

/// Derive a display-safe sheet name from a client name: truncated to the
/// spreadsheet limit and stripped of filesystem-hostile characters.
fn sheet_name(client_name: &str) -> String {
    let cleaned: String = client_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .take(SHEET_NAME_MAX)
        .collect();

    let cleaned = cleaned.trim().to_string();
    if cleaned.is_empty() {
        "sheet".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_name_truncates_and_sanitizes() {
        assert_eq!(sheet_name("Omar"), "Omar");
        assert_eq!(sheet_name("a/b\\c:d"), "a_b_c_d");
        let long = "x".repeat(40);
        assert_eq!(sheet_name(&long).chars().count(), SHEET_NAME_MAX);
        assert_eq!(sheet_name("  "), "sheet");
    }
}
