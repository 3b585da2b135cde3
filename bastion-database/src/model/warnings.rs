use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Warning history keyed by member id. Each list is kept in issuance order.
pub type Ledger = BTreeMap<u64, Vec<WarningRecord>>;

/// A single persisted warning.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarningRecord {
    #[serde(rename = "moderator")]
    pub moderator_id: u64,
    pub reason: String,
    #[serde(deserialize_with = "deserialize_warned_at")]
    pub time: DateTime<Utc>,
}

/// Result of issuing a warning: the stored record and the member's new total.
#[derive(Clone, Debug)]
pub struct IssuedWarning {
    pub record: WarningRecord,
    pub warn_number: usize,
}

/// Result of removing the latest warning of a member.
#[derive(Clone, Debug)]
pub struct RemovedWarning {
    pub record: WarningRecord,
    pub remaining: usize,
}

// Older ledger files carry naive ISO-8601 timestamps without an offset; those are UTC.
fn deserialize_warned_at<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_warned_at(&raw).ok_or_else(|| {
        serde::de::Error::custom(format!("invalid warning timestamp `{raw}`"))
    })
}

fn parse_warned_at(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
