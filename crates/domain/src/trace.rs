use serde::Serialize;

/// Structured trace events emitted across all TenantCore crates.
///
/// Session tokens are credentials and never appear in trace output; events
/// carry principal and tenant ids instead.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event")]
pub enum TraceEvent {
    StoreOpened {
        path: String,
    },
    SessionIssued {
        user_id: String,
        tenant_id: String,
        expires_at: String,
    },
    SessionsTransitioned {
        affected: usize,
        status: String,
    },
    SettingWritten {
        key: String,
        value_type: String,
        locked: bool,
    },
}

impl TraceEvent {
    pub fn emit(&self) {
        let json = serde_json::to_string(self).unwrap_or_default();
        tracing::info!(trace_event = %json, "tc_event");
    }
}
