pub mod config;
pub mod deactivate;
pub mod generate;
pub mod parse;
pub mod pull;
pub mod push;
pub mod status;

pub use crate::utils::tui::create_spinner;
