pub mod account_metadata;
pub mod game_config;
pub mod s2s_stats;

pub use account_metadata::update_account_metadata;
pub use game_config::{read_game_config_from_file, read_game_config_from_storage};
pub use s2s_stats::s2s_read_stats;
