pub mod category;
pub mod period;
pub mod settings;
pub mod slot;
