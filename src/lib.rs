pub mod cmd;
pub mod common;
pub mod config;
pub mod scoring;
pub mod util;
