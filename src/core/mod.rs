pub mod config;
pub mod scheme;
