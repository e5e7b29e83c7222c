//! CLI command implementations.

mod config;
mod doctor;
mod research;
mod scrape;

pub use config::run_config;
pub use doctor::run_doctor;
pub use research::run_research;
pub use scrape::run_scrape;
