// Audit logging for authentication and approval events
// The source systems had no audit trail at all; every security-relevant
// transition is recorded here through the tracing pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub enum AuditAction {
    AccountRegistered,
    LoginSucceeded,
    LoginFailed,
    LoginBlockedPendingApproval,
    AccountApproved,
    AccountRejected,
}

#[derive(Debug, Serialize)]
pub struct AuditLog {
    pub id: Uuid,
    pub action: AuditAction,
    pub account_id: Option<Uuid>,
    pub email: String,
    pub details: Option<String>,
    pub timestamp: DateTime<Utc>,
}

pub struct AuditLogger;

impl AuditLogger {
    /// Record an auth event. Logs through tracing; in production this stream
    /// can be shipped to a durable sink by the subscriber.
    pub fn log(action: AuditAction, account_id: Option<Uuid>, email: &str, details: Option<String>) {
        let entry = AuditLog {
            id: Uuid::new_v4(),
            action,
            account_id,
            email: email.to_string(),
            details,
            timestamp: Utc::now(),
        };

        let json_log = serde_json::to_string(&entry).unwrap_or_else(|e| {
            warn!("Failed to serialize audit log: {}", e);
            format!("{:?}", entry)
        });

        info!(target: "audit", "{}", json_log);
    }
}
