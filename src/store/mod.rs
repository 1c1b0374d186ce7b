pub mod day_store;
pub mod json_file;
