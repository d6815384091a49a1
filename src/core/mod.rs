pub mod chain;
pub mod config;
pub mod constants;
pub mod message;
pub mod reveal;
