// Authentication & authorization module

pub mod auth_middleware;
pub mod headers;
pub mod password;
