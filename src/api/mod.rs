// Axum web server layer

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;

pub mod handlers;
pub mod middleware;
pub mod responses;

use crate::core::crypto::CommandCipher;
use crate::core::errors::ShieldError;
use crate::core::models::{
    AuditEntry, DeviceLocation, NewCommand, NewUser, ScanRecord, TelemetryEvent, ThreatInfo,
    UserRecord, VpnSession,
};
use crate::core::token::TokenCodec;

// Re-export Config from config module
pub use crate::config::Config;

/// Application state containing all shared dependencies
///
/// All components are wrapped in Arc for shared ownership across async tasks.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub token_codec: Arc<TokenCodec>,
    pub cipher: Arc<CommandCipher>,
    pub users: Arc<dyn UserStore + Send + Sync>,
    pub devices: Arc<dyn DeviceStore + Send + Sync>,
    pub commands: Arc<dyn CommandStore + Send + Sync>,
    pub scans: Arc<dyn ScanStore + Send + Sync>,
    pub telemetry: Arc<dyn TelemetryStore + Send + Sync>,
    pub vpn: Arc<dyn VpnStore + Send + Sync>,
    pub threat_intel: Arc<dyn ThreatIntelligence + Send + Sync>,
    pub health: Arc<dyn HealthProbe + Send + Sync>,
    pub config: Arc<Config>,
}

/// Trait for user account persistence
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ShieldError>;
    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, ShieldError>;
    /// Fails with `ShieldError::Conflict` when the email is already taken
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, ShieldError>;
}

/// Trait for device ownership and location history
#[async_trait::async_trait]
pub trait DeviceStore: Send + Sync {
    async fn device_owned_by(&self, device_id: &str, user_id: &str) -> Result<bool, ShieldError>;
    async fn record_location(&self, location: DeviceLocation) -> Result<(), ShieldError>;
    async fn latest_location(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<DeviceLocation>, ShieldError>;
}

/// Trait for anti-theft command persistence
#[async_trait::async_trait]
pub trait CommandStore: Send + Sync {
    async fn create_command(&self, command: NewCommand) -> Result<(), ShieldError>;
    /// Store a wipe command and its audit entry atomically
    async fn create_wipe_command(
        &self,
        command: NewCommand,
        audit: AuditEntry,
    ) -> Result<(), ShieldError>;
}

/// Trait for scan reporting
#[async_trait::async_trait]
pub trait ScanStore: Send + Sync {
    /// Insert the scan log and bump the user's counters in one transaction
    async fn record_scan(&self, scan: ScanRecord) -> Result<(), ShieldError>;
}

/// Trait for telemetry persistence
#[async_trait::async_trait]
pub trait TelemetryStore: Send + Sync {
    async fn store_event(&self, event: TelemetryEvent) -> Result<(), ShieldError>;
}

/// Trait for VPN session persistence
#[async_trait::async_trait]
pub trait VpnStore: Send + Sync {
    async fn create_session(&self, session: VpnSession) -> Result<VpnSession, ShieldError>;
}

/// Trait for malware hash lookups
#[async_trait::async_trait]
pub trait ThreatIntelligence: Send + Sync {
    async fn lookup_hash(&self, hash: &str) -> Result<Option<ThreatInfo>, ShieldError>;
}

/// Trait for backend liveness checks
#[async_trait::async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> Result<(), ShieldError>;
}

/// Create the Axum router with all routes and middleware
///
/// Middleware stack (outermost to innermost):
/// - Request timeout (tower::timeout) - answered with 408
/// - Tracing (tower-http::trace)
/// - Body size limit (tower-http::limit)
/// - Bearer auth (protected routes only)
pub fn create_router(app_state: &AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/antitheft/locate", post(handlers::antitheft::locate_handler))
        .route("/antitheft/lock", post(handlers::antitheft::lock_handler))
        .route("/antitheft/ring", post(handlers::antitheft::ring_handler))
        .route("/antitheft/wipe", post(handlers::antitheft::wipe_handler))
        .route("/scan/quick", post(handlers::scan::quick_scan_handler))
        .route("/scan/hash-check", post(handlers::scan::hash_check_handler))
        .route("/telemetry/log", post(handlers::telemetry::telemetry_log_handler))
        .route("/vpn/connect", post(handlers::vpn::vpn_connect_handler))
        .route_layer(axum::middleware::from_fn_with_state(
            app_state.token_codec.clone(),
            crate::auth::auth_middleware::auth_middleware,
        ));

    let public = Router::new()
        .route("/user/register", post(handlers::user::register_handler))
        .route("/user/auth", post(handlers::user::login_handler))
        .route("/subscription/plans", get(handlers::subscription::plans_handler))
        .route("/health", get(handlers::health::health_handler));

    // Layers apply in reverse order: the last one added is outermost
    let timeout = ServiceBuilder::new()
        .layer(HandleErrorLayer::new(middleware::handle_middleware_error))
        .timeout(Duration::from_secs(app_state.config.request_timeout_secs));

    public
        .merge(protected)
        .layer(middleware::body_size_limit_layer(app_state.config.body_size_limit_bytes))
        .layer(middleware::tracing_layer())
        .layer(timeout)
}
