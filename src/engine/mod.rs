pub mod aggregate;
pub mod gate;
pub mod resolve;
pub mod sweep;
