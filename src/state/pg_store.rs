// PostgreSQL-backed persistence for every store trait

use crate::api::{
    CommandStore, DeviceStore, HealthProbe, ScanStore, TelemetryStore, UserStore, VpnStore,
};
use crate::core::errors::ShieldError;
use crate::core::models::{
    AuditEntry, DeviceLocation, NewCommand, NewUser, ScanRecord, TelemetryEvent, UserRecord,
    VpnSession,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;

/// Database row structure for users
#[derive(FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    name: String,
    is_premium: bool,
    total_scans: i64,
    total_threats_blocked: i64,
    last_scan_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(r: UserRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            password_hash: r.password_hash,
            name: r.name,
            is_premium: r.is_premium,
            total_scans: r.total_scans,
            total_threats_blocked: r.total_threats_blocked,
            last_scan_date: r.last_scan_date,
            created_at: r.created_at,
        }
    }
}

#[derive(FromRow)]
struct LocationRow {
    id: String,
    user_id: String,
    device_id: String,
    latitude: f64,
    longitude: f64,
    timestamp: DateTime<Utc>,
}

impl From<LocationRow> for DeviceLocation {
    fn from(r: LocationRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            device_id: r.device_id,
            latitude: r.latitude,
            longitude: r.longitude,
            timestamp: r.timestamp,
        }
    }
}

const USER_COLUMNS: &str = "id, email, password_hash, name, is_premium, total_scans, \
     total_threats_blocked, last_scan_date, created_at";

/// Postgres store shared by all handlers through `AppState`
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_user(&self, column: &str, value: &str) -> Result<Option<UserRecord>, ShieldError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserRecord::from))
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ShieldError> {
        self.find_user("email", email).await
    }

    async fn find_user_by_id(&self, user_id: &str) -> Result<Option<UserRecord>, ShieldError> {
        self.find_user("id", user_id).await
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, ShieldError> {
        let sql = format!(
            "INSERT INTO users (id, email, password_hash, name) VALUES ($1, $2, $3, $4) \
             RETURNING {}",
            USER_COLUMNS
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.name)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                // Concurrent registration for the same email
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    ShieldError::Conflict("User already exists".to_string())
                }
                other => ShieldError::Database(other),
            })?;

        Ok(row.into())
    }
}

#[async_trait]
impl DeviceStore for PgStore {
    async fn device_owned_by(&self, device_id: &str, user_id: &str) -> Result<bool, ShieldError> {
        let owned = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM devices WHERE id = $1 AND user_id = $2)",
        )
        .bind(device_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(owned)
    }

    async fn record_location(&self, location: DeviceLocation) -> Result<(), ShieldError> {
        sqlx::query(
            "INSERT INTO device_locations (id, user_id, device_id, latitude, longitude, timestamp)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&location.id)
        .bind(&location.user_id)
        .bind(&location.device_id)
        .bind(location.latitude)
        .bind(location.longitude)
        .bind(location.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn latest_location(
        &self,
        user_id: &str,
        device_id: &str,
    ) -> Result<Option<DeviceLocation>, ShieldError> {
        let row = sqlx::query_as::<_, LocationRow>(
            "SELECT id, user_id, device_id, latitude, longitude, timestamp
             FROM device_locations
             WHERE user_id = $1 AND device_id = $2
             ORDER BY timestamp DESC
             LIMIT 1",
        )
        .bind(user_id)
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(DeviceLocation::from))
    }
}

const INSERT_COMMAND: &str =
    "INSERT INTO anti_theft_commands (id, user_id, device_id, type, data, created_at, executed_at)
     VALUES ($1, $2, $3, $4, $5, $6, $7)";

fn bind_command<'q>(
    command: &'q NewCommand,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    sqlx::query(INSERT_COMMAND)
        .bind(&command.id)
        .bind(&command.user_id)
        .bind(&command.device_id)
        .bind(command.kind.as_str())
        .bind(&command.data)
        .bind(command.created_at)
        .bind(command.executed_at)
}

#[async_trait]
impl CommandStore for PgStore {
    async fn create_command(&self, command: NewCommand) -> Result<(), ShieldError> {
        bind_command(&command).execute(&self.pool).await?;
        debug!(command_id = %command.id, kind = command.kind.as_str(), "Command stored");
        Ok(())
    }

    async fn create_wipe_command(
        &self,
        command: NewCommand,
        audit: AuditEntry,
    ) -> Result<(), ShieldError> {
        let mut tx = self.pool.begin().await?;

        bind_command(&command).execute(&mut *tx).await?;

        sqlx::query(
            "INSERT INTO audit_logs (id, user_id, action, device_id, timestamp)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&audit.id)
        .bind(&audit.user_id)
        .bind(&audit.action)
        .bind(&audit.device_id)
        .bind(audit.timestamp)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl ScanStore for PgStore {
    async fn record_scan(&self, scan: ScanRecord) -> Result<(), ShieldError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO scan_logs
                (id, user_id, device_id, scan_type, threats_found, files_scanned, duration, timestamp)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(&scan.id)
        .bind(&scan.user_id)
        .bind(&scan.device_id)
        .bind(&scan.scan_type)
        .bind(scan.threats_found)
        .bind(scan.files_scanned)
        .bind(scan.duration)
        .bind(scan.timestamp)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE users
             SET total_scans = total_scans + 1,
                 total_threats_blocked = total_threats_blocked + $2,
                 last_scan_date = $3
             WHERE id = $1",
        )
        .bind(&scan.user_id)
        .bind(scan.threats_found)
        .bind(scan.timestamp)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl TelemetryStore for PgStore {
    async fn store_event(&self, event: TelemetryEvent) -> Result<(), ShieldError> {
        sqlx::query(
            "INSERT INTO telemetry_logs (id, user_id, event_type, event_data, timestamp)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&event.id)
        .bind(&event.user_id)
        .bind(&event.event_type)
        .bind(&event.event_data)
        .bind(event.timestamp)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl VpnStore for PgStore {
    async fn create_session(&self, session: VpnSession) -> Result<VpnSession, ShieldError> {
        sqlx::query(
            "INSERT INTO vpn_sessions (id, user_id, server_location, connected_at, is_active)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&session.id)
        .bind(&session.user_id)
        .bind(&session.server_location)
        .bind(session.connected_at)
        .bind(session.is_active)
        .execute(&self.pool)
        .await?;
        Ok(session)
    }
}

#[async_trait]
impl HealthProbe for PgStore {
    async fn ping(&self) -> Result<(), ShieldError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
