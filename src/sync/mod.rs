pub mod scheduler;

pub use scheduler::{StatsScheduler, DEFAULT_REFRESH_INTERVAL};
