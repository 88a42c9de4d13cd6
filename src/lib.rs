pub mod config;
pub mod engine;
pub mod input;
pub mod models;
