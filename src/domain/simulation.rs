use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Period-level scalar state: the balance the month started with.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SimulationContext {
    #[serde(with = "rust_decimal::serde::float", default)]
    pub initial_balance: Decimal,
    /// When the current period was opened by a seed or a rollover.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_started_at: Option<DateTime<Utc>>,
}

impl SimulationContext {
    pub fn new(initial_balance: Decimal) -> Self {
        Self {
            initial_balance,
            period_started_at: None,
        }
    }

    pub fn start_period(&mut self) {
        self.period_started_at = Some(Utc::now());
    }
}
