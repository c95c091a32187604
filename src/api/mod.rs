pub mod client;
pub mod error;
pub mod rate_limiter;

pub use client::{DashboardClient, TradeFeed};
pub use error::ApiError;
pub use rate_limiter::{RateLimitConfig, RateLimiter};
