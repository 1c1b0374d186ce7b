//! Tag each half hour of your day with a one-letter activity code and get
//! weekly and monthly summaries back. All data lives in a single local JSON
//! file, so everything keeps working offline.
//!

pub mod cli;
pub mod engine;
pub mod model;
pub mod store;
pub mod utils;
pub mod watch;
