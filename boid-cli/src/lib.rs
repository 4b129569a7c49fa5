pub mod runner;
pub mod settings;

pub use runner::{RunOptions, RunSummary, Runner};
pub use settings::{load_settings, to_config, write_template};
