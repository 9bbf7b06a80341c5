pub mod catalog;
pub mod config;
pub mod errors;
pub mod extract;
pub mod models;
pub mod playlist;
pub mod scoring;
pub mod services;
pub mod utils;
