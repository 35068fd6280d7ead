pub mod help;
pub mod replace;
pub mod search;
pub mod show_config;
pub mod validate_config;
