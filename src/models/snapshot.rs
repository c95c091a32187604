use serde::{Deserialize, Serialize};

/// Paired labels/values for the bar and line chart widgets.
///
/// `labels[i]` always corresponds to `values[i]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Dashboard statistics derived from the full trade list.
///
/// Monetary totals and the drawdown are pre-formatted to two decimals
/// because the summary cards render them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Count of trades with a non-null, non-zero realized PnL
    pub total_trades: u32,

    /// Closed trades dated today (local time)
    pub today_closed_trades: u32,

    /// Sum of positive realized PnL, 2-decimal string
    pub total_profit: String,

    /// Sum of absolute negative realized PnL, 2-decimal string
    pub total_loss: String,

    /// Net realized PnL across all accounts, 2-decimal string
    pub total_pnl: String,

    /// Max percentage decline from the running intraday peak, 2-decimal string
    pub drawdown: String,

    /// Cumulative realized PnL today, keyed by HH:MM labels
    pub daily_chart: ChartSeries,

    /// PnL by category, all time
    pub category_bar: ChartSeries,

    /// PnL by account, current calendar month only
    pub account_bar: ChartSeries,
}

impl Default for StatsSnapshot {
    fn default() -> Self {
        Self {
            total_trades: 0,
            today_closed_trades: 0,
            total_profit: "0.00".to_string(),
            total_loss: "0.00".to_string(),
            total_pnl: "0.00".to_string(),
            drawdown: "0.00".to_string(),
            daily_chart: ChartSeries::default(),
            category_bar: ChartSeries::default(),
            account_bar: ChartSeries::default(),
        }
    }
}
