pub mod units;
pub mod valence;
