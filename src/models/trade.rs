use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// Trade row as served by the dashboard backend (`/api/v1/trades`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trade {
    pub id: i64,

    /// Exchange order ID
    #[serde(default)]
    pub order_id: Option<String>,

    /// Symbol (e.g., "BTCUSDT")
    #[serde(default)]
    pub symbol: Option<String>,

    /// Order side: "Buy", "Sell"
    #[serde(default)]
    pub side: Option<String>,

    /// Order type: "Limit", "Market"
    #[serde(default)]
    pub order_type: Option<String>,

    #[serde(default)]
    pub price: Option<f64>,

    #[serde(default)]
    pub qty: Option<f64>,

    /// Order status as reported by the exchange
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default)]
    pub avg_price: Option<f64>,

    /// Realized PnL; null/absent or zero means the trade is not closed
    #[serde(default)]
    pub closed_pnl: Option<f64>,

    /// Trade classification label (e.g., "linear", "spot")
    #[serde(default)]
    pub category: Option<String>,

    /// Sub-account that produced the trade
    #[serde(default)]
    pub account_name: Option<String>,

    /// ISO 8601 timestamp, with or without an offset
    pub created_time: String,

    #[serde(default)]
    pub updated_time: Option<String>,
}

impl Trade {
    /// Parse `created_time` into local time.
    ///
    /// The backend serializes datetimes as ISO 8601; depending on the column
    /// it may or may not carry a UTC offset, so both forms are accepted.
    pub fn created_at_local(&self) -> Result<DateTime<Local>, String> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.created_time) {
            return Ok(dt.with_timezone(&Local));
        }

        let naive = NaiveDateTime::parse_from_str(&self.created_time, "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| format!("Invalid created_time '{}': {}", self.created_time, e))?;

        Local
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| format!("Ambiguous local time '{}'", self.created_time))
    }

    /// Realized PnL, if the trade actually closed with one.
    ///
    /// A null or exactly-zero `closed_pnl` marks an open or break-even fill
    /// and is not counted as a closed trade.
    pub fn realized_pnl(&self) -> Option<f64> {
        self.closed_pnl.filter(|pnl| *pnl != 0.0)
    }

    /// Category label with the backend's fallback applied
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or("Uncategorized")
    }

    /// Account label with the backend's fallback applied
    pub fn account_label(&self) -> &str {
        self.account_name.as_deref().unwrap_or("Unknown")
    }
}
