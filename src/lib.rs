//! Load a product table (CSV or JSON), summarise it, and prepare the
//! price, rating and review figures.

pub mod analysis;
pub mod charts;
pub mod color;
pub mod config;
pub mod data;
