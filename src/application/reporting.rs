use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Cents;

/// Payments of one month grouped per day, plus the grand total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRevenueReport {
    pub month: u32,
    pub year: i32,
    pub days: Vec<DailyRevenue>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRevenue {
    pub date: NaiveDate,
    /// Localized weekday name as stamped on the payments.
    pub day_name: String,
    pub total: Cents,
}
