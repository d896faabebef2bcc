pub mod dashboard;
pub mod units;
