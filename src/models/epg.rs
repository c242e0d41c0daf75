use chrono::{DateTime, Utc};
use serde::Serialize;

/// EPG program entry as served to clients.
///
/// Channel name is joined in for display. Overlapping programs for the same
/// channel are possible; consumers must treat listings as sets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EpgProgram {
    pub id: i32,
    pub channel_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_name: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classification: Option<String>,
}
