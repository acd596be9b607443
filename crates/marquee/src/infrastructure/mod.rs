pub mod config;
pub mod database;
pub mod password;
pub mod repositories;
