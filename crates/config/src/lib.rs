// Configuration loading

pub mod settings;

pub use settings::{is_valid_date_format, Settings};
