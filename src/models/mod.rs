pub mod snapshot;
pub mod trade;

pub use snapshot::*;
pub use trade::*;
