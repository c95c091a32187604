pub mod aggregator;

pub use aggregator::compute_snapshot;
