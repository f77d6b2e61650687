// HTTP-level tests driving the full router

#[path = "../common/mod.rs"]
mod common;

mod test_antitheft;
mod test_auth;
mod test_telemetry;
