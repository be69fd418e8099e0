pub mod layers;

mod builder;
mod config;
mod manager;
mod merge;

pub use builder::{ConfigBuilder, split_override};
pub use config::HcDriverConfig;
pub use manager::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, ConfigManager, default_user_config_path};
pub use merge::merge_toml_values;
