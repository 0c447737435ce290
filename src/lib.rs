pub mod cli;
pub mod config;
pub mod constants;
pub mod daemon;
pub mod input;
