pub mod cli;
pub mod cmd;
pub mod config;
pub mod logging;
pub mod output;
