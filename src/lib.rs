// Library root for Sentinel Shield

pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod engine;
pub mod state;
pub mod utils;
