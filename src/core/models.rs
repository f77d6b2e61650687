// Domain models shared by handlers and stores

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller identity established from a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
}

/// Stored user row
#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub is_premium: bool,
    pub total_scans: i64,
    pub total_threats_blocked: i64,
    pub last_scan_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl UserRecord {
    pub fn identity(&self) -> Identity {
        Identity {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            is_premium: self.is_premium,
        }
    }
}

/// Fields needed to create a user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
}

/// Public view of a user returned by the user endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_premium: bool,
}

/// Reported device position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceLocation {
    pub id: String,
    pub user_id: String,
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}

/// Anti-theft command kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandKind {
    Lock,
    Ring,
    Wipe,
}

impl CommandKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandKind::Lock => "lock",
            CommandKind::Ring => "ring",
            CommandKind::Wipe => "wipe",
        }
    }
}

/// Anti-theft command queued for a device
#[derive(Debug, Clone, PartialEq)]
pub struct NewCommand {
    pub id: String,
    pub user_id: String,
    pub device_id: String,
    pub kind: CommandKind,
    pub data: Value,
    pub created_at: DateTime<Utc>,
    pub executed_at: Option<DateTime<Utc>>,
}

/// Audit trail entry for critical actions
#[derive(Debug, Clone, PartialEq)]
pub struct AuditEntry {
    pub id: String,
    pub user_id: String,
    pub action: String,
    pub device_id: String,
    pub timestamp: DateTime<Utc>,
}

/// One completed scan
#[derive(Debug, Clone, PartialEq)]
pub struct ScanRecord {
    pub id: String,
    pub user_id: String,
    pub device_id: String,
    pub scan_type: String,
    pub threats_found: i64,
    pub files_scanned: i64,
    pub duration: f64,
    pub timestamp: DateTime<Utc>,
}

/// Sanitized telemetry event ready for storage
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryEvent {
    pub id: String,
    pub user_id: String,
    pub event_type: String,
    pub event_data: Value,
    pub timestamp: DateTime<Utc>,
}

/// VPN session record
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VpnSession {
    pub id: String,
    pub user_id: String,
    pub server_location: String,
    pub connected_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatType {
    Malware,
    Virus,
    Trojan,
    Adware,
    Spyware,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Threat metadata for a known-bad hash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatInfo {
    #[serde(rename = "type")]
    pub threat_type: ThreatType,
    pub severity: Severity,
    pub name: String,
    pub description: String,
}

/// Subscription tier offered to users
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionPlan {
    pub id: &'static str,
    pub name: &'static str,
    pub price: u32,
    pub currency: &'static str,
    pub interval: &'static str,
    pub features: Vec<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount: Option<u32>,
}
