// HTTP route handlers grouped by feature area

pub mod antitheft;
pub mod health;
pub mod scan;
pub mod subscription;
pub mod telemetry;
pub mod user;
pub mod vpn;
