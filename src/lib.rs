pub mod api;
pub mod models;
pub mod stats;
pub mod sync;

pub use api::{ApiError, DashboardClient, RateLimitConfig, TradeFeed};
pub use models::{ChartSeries, StatsSnapshot, Trade};
pub use stats::compute_snapshot;
pub use sync::{StatsScheduler, DEFAULT_REFRESH_INTERVAL};
