pub mod common;
pub mod config;
pub mod dates;
pub mod errors;

pub mod database;
#[cfg(feature = "server")]
pub mod server;
pub mod services;
