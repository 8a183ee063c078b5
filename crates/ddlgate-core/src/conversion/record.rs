//! Conversion records and queue messages

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::optimization::OptimizationType;

/// Lifecycle of a conversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConversionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl ConversionStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversionStatus::Completed | ConversionStatus::Failed)
    }
}

impl std::fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConversionStatus::Pending => "PENDING",
            ConversionStatus::Processing => "PROCESSING",
            ConversionStatus::Completed => "COMPLETED",
            ConversionStatus::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// A stored conversion request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRecord {
    pub conversion_id: String,
    pub status: ConversionStatus,
    /// RFC 3339, UTC
    pub created_at: String,
    /// Unix seconds
    pub expires_at: i64,
    /// YYYY-MM-DD
    pub conversion_date: String,
    pub sql_content: String,
    pub optimization_type: OptimizationType,
    pub tables_extracted: usize,
    /// NoSQL design as JSON text, once completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl ConversionRecord {
    /// New PENDING record stamped at `now`
    pub fn pending(
        sql_content: &str,
        optimization: OptimizationType,
        tables_extracted: usize,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            conversion_id: Uuid::new_v4().to_string(),
            status: ConversionStatus::Pending,
            created_at: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            expires_at: (now + ttl).timestamp(),
            conversion_date: now.format("%Y-%m-%d").to_string(),
            sql_content: sql_content.to_string(),
            optimization_type: optimization,
            tables_extracted,
            result: None,
            error_message: None,
        }
    }

    /// Message handed to the queue for asynchronous processing
    pub fn to_message(&self) -> QueueMessage {
        QueueMessage {
            conversion_id: self.conversion_id.clone(),
            sql_content: self.sql_content.clone(),
            optimization_type: self.optimization_type,
            tables_extracted: self.tables_extracted,
        }
    }

    pub fn receipt(&self) -> Accepted {
        Accepted {
            conversion_id: self.conversion_id.clone(),
            status: self.status,
            created_at: self.created_at.clone(),
            expires_at: self.expires_at,
        }
    }
}

/// Queue payload for a pending conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueMessage {
    pub conversion_id: String,
    pub sql_content: String,
    pub optimization_type: OptimizationType,
    pub tables_extracted: usize,
}

/// Receipt returned when a conversion is accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accepted {
    pub conversion_id: String,
    pub status: ConversionStatus,
    pub created_at: String,
    pub expires_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_pending_record_timestamps() {
        let now = Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap();
        let record = ConversionRecord::pending(
            "CREATE TABLE t (id INT);",
            OptimizationType::ReadHeavy,
            1,
            now,
            Duration::hours(24),
        );

        assert_eq!(record.status, ConversionStatus::Pending);
        assert_eq!(record.created_at, "2026-03-14T09:30:00Z");
        assert_eq!(record.conversion_date, "2026-03-14");
        assert_eq!(record.expires_at, now.timestamp() + 24 * 3600);
        assert!(Uuid::parse_str(&record.conversion_id).is_ok());
    }

    #[test]
    fn test_message_wire_format() {
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let record =
            ConversionRecord::pending("sql", OptimizationType::Balanced, 2, now, Duration::hours(1));
        let json = serde_json::to_value(record.to_message()).unwrap();
        assert_eq!(json["conversionId"], record.conversion_id.as_str());
        assert_eq!(json["optimizationType"], "balanced");
        assert_eq!(json["tablesExtracted"], 2);
    }
}
