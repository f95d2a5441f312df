use anyhow::Result;
use chrono::{Datelike, Local};
use clap::{Parser, Subcommand};

use crate::application::{
    ClientEditForm, ClientForm, LedgerService, OrderForm, OrderUpdateForm, PaymentForm,
    PaymentUpdateForm,
};
use crate::domain::{
    format_cents, format_date, Client, ClientId, Order, OrderId, Payment, PaymentId, WeekdayNames,
};

/// Daftar - Client Billing Ledger
#[derive(Parser)]
#[command(name = "daftar")]
#[command(about = "A local-first ledger for clients, orders, and payments")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "business.db")]
    pub database: String,

    /// Use English weekday names instead of Arabic
    #[arg(long, global = true)]
    pub english_days: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Client management commands
    #[command(subcommand)]
    Client(ClientCommands),

    /// Order management commands
    #[command(subcommand)]
    Order(OrderCommands),

    /// Payment management commands
    #[command(subcommand)]
    Payment(PaymentCommands),

    /// Monthly revenue report (per-day payment totals)
    Report {
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,

        /// Year (defaults to the current year)
        #[arg(short, long)]
        year: Option<i32>,
    },

    /// Export data: workbook, clients, orders, payments, full
    Export {
        /// What to export: workbook, clients, orders, payments, full
        export_type: String,

        /// Output file, or directory for the workbook (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Subcommand)]
pub enum ClientCommands {
    /// Add a new client
    Add {
        /// Client name
        name: String,

        /// Opening paid amount (e.g. "50.00", defaults to 0)
        #[arg(long)]
        paid: Option<String>,

        /// Opening owed amount (defaults to 0)
        #[arg(long)]
        owed: Option<String>,
    },

    /// List all clients with their balances
    List,

    /// Show one client with its orders and payments
    Show {
        /// Client id
        id: ClientId,
    },

    /// Edit a client, re-entering every field verbatim
    Edit {
        /// Client id
        id: ClientId,

        #[arg(long)]
        name: String,

        #[arg(long)]
        paid: String,

        #[arg(long)]
        owed: String,

        #[arg(long)]
        total: String,
    },

    /// Delete a client (only possible when it owns no records)
    Delete {
        /// Client id
        id: ClientId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// Add a new order for a client
    Add {
        /// Owning client id
        client: ClientId,

        /// Order name
        name: String,

        /// Order type (free text)
        #[arg(short = 't', long = "type")]
        order_type: String,

        /// Width in cm
        #[arg(long)]
        width: String,

        /// Length in cm
        #[arg(long)]
        length: String,

        /// Price per cm (e.g. "1.01")
        #[arg(long)]
        price: String,

        /// Payment kind: cash or installment
        #[arg(short, long)]
        payment: String,
    },

    /// List orders
    List {
        /// Filter by client id
        #[arg(long)]
        client: Option<ClientId>,
    },

    /// Edit an order, re-entering every field including the total
    Edit {
        /// Order id
        id: OrderId,

        #[arg(long)]
        name: String,

        #[arg(short = 't', long = "type")]
        order_type: String,

        #[arg(long)]
        width: String,

        #[arg(long)]
        length: String,

        #[arg(long)]
        price: String,

        /// Total price as re-entered (not recomputed from dimensions)
        #[arg(long)]
        total: String,

        #[arg(short, long)]
        payment: String,
    },

    /// Delete an order
    Delete {
        /// Order id
        id: OrderId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum PaymentCommands {
    /// Record a payment against a client's outstanding balance
    Add {
        /// Owning client id
        client: ClientId,

        /// Amount paid (e.g. "25.00")
        amount: String,
    },

    /// List payments
    List {
        /// Filter by client id
        #[arg(long)]
        client: Option<ClientId>,
    },

    /// Edit a payment, selecting the owning client and re-entering the amount
    Edit {
        /// Payment id
        id: PaymentId,

        /// Owning client id (the payment moves here if different)
        #[arg(long)]
        client: ClientId,

        #[arg(long)]
        amount: String,
    },

    /// Delete a payment
    Delete {
        /// Payment id
        id: PaymentId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

impl Cli {
    async fn service(&self) -> Result<LedgerService> {
        if self.verbose {
            eprintln!("Using database: {}", self.database);
        }
        let service = LedgerService::connect(&self.database).await?;
        Ok(if self.english_days {
            service.with_weekday_names(WeekdayNames::english())
        } else {
            service
        })
    }

    pub async fn run(self) -> Result<()> {
        match &self.command {
            Commands::Init => {
                LedgerService::init(&self.database).await?;
                println!("Database initialized: {}", self.database);
            }

            Commands::Client(client_cmd) => {
                let service = self.service().await?;
                run_client_command(&service, client_cmd).await?;
            }

            Commands::Order(order_cmd) => {
                let service = self.service().await?;
                run_order_command(&service, order_cmd).await?;
            }

            Commands::Payment(payment_cmd) => {
                let service = self.service().await?;
                run_payment_command(&service, payment_cmd).await?;
            }

            Commands::Report { month, year } => {
                let service = self.service().await?;
                let today = Local::now().date_naive();
                let month = month.unwrap_or(today.month());
                let year = year.unwrap_or(today.year());
                run_report_command(&service, month, year).await?;
            }

            Commands::Export {
                export_type,
                output,
            } => {
                let service = self.service().await?;
                run_export_command(&service, export_type, output.as_deref()).await?;
            }
        }
        Ok(())
    }
}

async fn run_client_command(service: &LedgerService, command: &ClientCommands) -> Result<()> {
    match command {
        ClientCommands::Add { name, paid, owed } => {
            let client = service
                .create_client(ClientForm {
                    name: name.clone(),
                    paid: paid.clone().unwrap_or_default(),
                    owed: owed.clone().unwrap_or_default(),
                })
                .await?;
            println!("Created client {} ({})", client.name, client.id);
        }

        ClientCommands::List => {
            let clients = service.list_clients().await?;
            if clients.is_empty() {
                println!("No clients yet");
                return Ok(());
            }
            println!(
                "{:<6} {:<24} {:>12} {:>12} {:>12}",
                "ID", "NAME", "PAID", "OWED", "TOTAL BILL"
            );
            for client in clients {
                print_client_row(&client);
            }
        }

        ClientCommands::Show { id } => {
            let statement = service.client_statement(*id).await?;
            let client = &statement.client;
            println!("Client {} ({})", client.name, client.id);
            println!("  Paid:       {}", format_cents(client.paid_amount));
            println!("  Owed:       {}", format_cents(client.owed_amount));
            println!("  Total bill: {}", format_cents(client.total_bill));

            println!("\nOrders ({}):", statement.orders.len());
            for order in &statement.orders {
                print_order_row(order);
            }

            println!("\nPayments ({}):", statement.payments.len());
            for payment in &statement.payments {
                print_payment_row(payment);
            }
        }

        ClientCommands::Edit {
            id,
            name,
            paid,
            owed,
            total,
        } => {
            let client = service
                .update_client(
                    *id,
                    ClientEditForm {
                        name: name.clone(),
                        paid: paid.clone(),
                        owed: owed.clone(),
                        total_bill: total.clone(),
                    },
                )
                .await?;
            println!("Updated client {} ({})", client.name, client.id);
            print_client_row(&client);
        }

        ClientCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete client {}?", id))? {
                println!("Aborted");
                return Ok(());
            }
            let client = service.delete_client(*id).await?;
            println!("Deleted client {} ({})", client.name, client.id);
        }
    }
    Ok(())
}

async fn run_order_command(service: &LedgerService, command: &OrderCommands) -> Result<()> {
    match command {
        OrderCommands::Add {
            client,
            name,
            order_type,
            width,
            length,
            price,
            payment,
        } => {
            let receipt = service
                .create_order(OrderForm {
                    client_id: *client,
                    name: name.clone(),
                    order_type: order_type.clone(),
                    width: width.clone(),
                    length: length.clone(),
                    price_per_cm: price.clone(),
                    payment_kind: payment.clone(),
                })
                .await?;
            println!(
                "Created order {} ({}) for {} [{}]",
                receipt.order.name,
                receipt.order.id,
                format_cents(receipt.order.total_price),
                receipt.order.payment_kind
            );
            if let Some(payment) = receipt.companion_payment {
                println!(
                    "Recorded companion payment {} of {}",
                    payment.id,
                    format_cents(payment.amount_paid)
                );
            }
        }

        OrderCommands::List { client } => {
            let orders = service.list_orders(*client).await?;
            if orders.is_empty() {
                println!("No orders");
                return Ok(());
            }
            for order in orders {
                print_order_row(&order);
            }
        }

        OrderCommands::Edit {
            id,
            name,
            order_type,
            width,
            length,
            price,
            total,
            payment,
        } => {
            let order = service
                .update_order(
                    *id,
                    OrderUpdateForm {
                        name: name.clone(),
                        order_type: order_type.clone(),
                        width: width.clone(),
                        length: length.clone(),
                        price_per_cm: price.clone(),
                        total_price: total.clone(),
                        payment_kind: payment.clone(),
                    },
                )
                .await?;
            println!("Updated order {} ({})", order.name, order.id);
            print_order_row(&order);
        }

        OrderCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete order {}?", id))? {
                println!("Aborted");
                return Ok(());
            }
            let order = service.delete_order(*id).await?;
            println!(
                "Deleted order {} ({}), reversed {}",
                order.name,
                order.id,
                format_cents(order.total_price)
            );
        }
    }
    Ok(())
}

async fn run_payment_command(service: &LedgerService, command: &PaymentCommands) -> Result<()> {
    match command {
        PaymentCommands::Add { client, amount } => {
            let payment = service
                .record_payment(PaymentForm {
                    client_id: *client,
                    amount: amount.clone(),
                })
                .await?;
            println!(
                "Recorded payment {} of {} on {}",
                payment.id,
                format_cents(payment.amount_paid),
                format_date(payment.payment_date)
            );
        }

        PaymentCommands::List { client } => {
            let payments = service.list_payments(*client).await?;
            if payments.is_empty() {
                println!("No payments");
                return Ok(());
            }
            for payment in payments {
                print_payment_row(&payment);
            }
        }

        PaymentCommands::Edit { id, client, amount } => {
            let payment = service
                .update_payment(
                    *id,
                    PaymentUpdateForm {
                        client_id: *client,
                        amount: amount.clone(),
                    },
                )
                .await?;
            println!("Updated payment {}", payment.id);
            print_payment_row(&payment);
        }

        PaymentCommands::Delete { id, yes } => {
            if !yes && !confirm(&format!("Delete payment {}?", id))? {
                println!("Aborted");
                return Ok(());
            }
            let payment = service.delete_payment(*id).await?;
            println!(
                "Deleted payment {}, reversed {}",
                payment.id,
                format_cents(payment.amount_paid)
            );
        }
    }
    Ok(())
}

async fn run_report_command(service: &LedgerService, month: u32, year: i32) -> Result<()> {
    let report = service.monthly_revenue(month, year).await?;

    println!("Revenue for {:02}/{}", report.month, report.year);
    if report.days.is_empty() {
        println!("No payments recorded");
        return Ok(());
    }

    println!("{:<12} {:<12} {:>12}", "DATE", "DAY", "TOTAL");
    for day in &report.days {
        println!(
            "{:<12} {:<12} {:>12}",
            format_date(day.date),
            day.day_name,
            format_cents(day.total)
        );
    }
    println!("{:<25} {:>12}", "TOTAL", format_cents(report.total));
    Ok(())
}

async fn run_export_command(
    service: &LedgerService,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use anyhow::Context;
    use std::fs::File;
    use std::io::{stdout, Write};
    use std::path::Path;

    let exporter = Exporter::new(service);

    if export_type == "workbook" {
        let directory = output.unwrap_or("workbook");
        let summary = exporter.export_workbook(Path::new(directory)).await?;
        println!(
            "Exported {} client sheet(s) to {:?}",
            summary.sheets.len(),
            summary.directory
        );
        return Ok(());
    }

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "clients" => {
            let count = exporter.export_clients_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} clients", count);
            }
        }
        "orders" => {
            let count = exporter.export_orders_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} orders", count);
            }
        }
        "payments" => {
            let count = exporter.export_payments_csv(writer).await?;
            if output.is_some() {
                eprintln!("Exported {} payments", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer).await?;
            if output.is_some() {
                eprintln!(
                    "Exported full database: {} clients, {} orders, {} payments",
                    snapshot.clients.len(),
                    snapshot.orders.len(),
                    snapshot.payments.len()
                );
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: workbook, clients, orders, payments, full",
                export_type
            );
        }
    }

    Ok(())
}

fn print_client_row(client: &Client) {
    println!(
        "{:<6} {:<24} {:>12} {:>12} {:>12}",
        client.id,
        client.name,
        format_cents(client.paid_amount),
        format_cents(client.owed_amount),
        format_cents(client.total_bill)
    );
}

fn print_order_row(order: &Order) {
    println!(
        "{:<6} {:<20} {:<12} {:>6} x {:<6} @ {:>8} = {:>10} [{}] {} {}",
        order.id,
        order.name,
        order.order_type,
        order.width,
        order.length,
        format_cents(order.price_per_cm),
        format_cents(order.total_price),
        order.payment_kind,
        format_date(order.order_date),
        order.order_day
    );
}

fn print_payment_row(payment: &Payment) {
    println!(
        "{:<6} client {:<6} {:>12} {} {}",
        payment.id,
        payment.client_id,
        format_cents(payment.amount_paid),
        format_date(payment.payment_date),
        payment.payment_day
    );
}

fn confirm(prompt: &str) -> Result<bool> {
    use std::io::{stdin, stdout, Write};

    print!("{} [y/N] ", prompt);
    stdout().flush()?;
    let mut answer = String::new();
    stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}
