// Core domain: errors, models, tokens and encryption

pub mod crypto;
pub mod errors;
pub mod models;
pub mod plans;
pub mod token;
