// Declare all modules
pub mod cli;
pub mod config;
pub mod email;
pub mod fetch;
pub mod runner;
pub mod utils;
pub mod watch;

// No re-exports here as they're handled in lib.rs
