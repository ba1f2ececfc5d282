pub mod commands;
pub mod import;
pub mod opts;
pub mod play;
