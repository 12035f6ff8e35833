//! Streaming statistics

mod rolling;

pub use rolling::RollingWindowStats;
