use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::workflow::WorkflowId;

/// Serde adapter for the catalog timestamp wire format (`yyyy-MM-dd HH:mm:ss`).
pub mod catalog_time {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    /// Serialize a timestamp in the catalog wire format.
    pub fn serialize<S>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    /// Deserialize a timestamp from the catalog wire format.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)?;
        Ok(naive.and_utc())
    }
}

/// Denormalized catalog row used for paginated workflow listings.
///
/// Created alongside each workflow and removed when it is deleted. Not
/// authoritative for business state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    /// Workflow id the row describes.
    pub id: WorkflowId,

    /// Workflow name at creation time.
    pub name: String,

    /// Workflow description at creation time.
    pub desc: String,

    /// Who created the workflow.
    pub creator: String,

    /// Creation timestamp.
    #[serde(with = "catalog_time")]
    pub created_time: DateTime<Utc>,
}

/// One page of catalog rows plus paging totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedData {
    /// Page number actually served (after normalization and clamping).
    pub page: i32,

    /// Page size actually used.
    pub size: i32,

    /// Total number of pages.
    pub total_page: i32,

    /// Total number of catalog rows.
    pub total: i32,

    /// The page slice, newest first.
    pub content: Vec<Content>,
}
