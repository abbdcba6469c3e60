//! Draft records as persisted in the draft collection.
//!
//! On the wire a draft is `{ id, type, data, createdAt, updatedAt }`, where
//! `type` selects the shape of `data`. In memory the pair is a single
//! [`DraftPayload`] so the kind and the payload can never disagree.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

use crate::report::{DraftPayload, Report};

/// Label shown in draft lists when no location has been chosen yet.
pub const NO_LOCATION_LABEL: &str = "Location not selected";

/// Opaque identifier of a draft.
///
/// Generated ids are `draft_` followed by a UUID v7, so they sort by creation
/// time; ids written by other clients are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftId(pub String);

impl DraftId {
    /// Allocate a fresh draft id.
    pub fn generate() -> Self {
        Self(format!("draft_{}", Uuid::now_v7().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DraftId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DraftId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The closed set of report kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Shift,
    Inventory,
    Receiving,
    Writeoff,
    Transfer,
}

impl ReportKind {
    pub const ALL: [ReportKind; 5] = [
        ReportKind::Shift,
        ReportKind::Inventory,
        ReportKind::Receiving,
        ReportKind::Writeoff,
        ReportKind::Transfer,
    ];

    /// Human-readable report name for draft lists.
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::Shift => "Shift closing",
            ReportKind::Inventory => "Inventory count",
            ReportKind::Receiving => "Goods receiving",
            ReportKind::Writeoff => "Write-off / transfer",
            ReportKind::Transfer => "Transfer",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Shift => write!(f, "shift"),
            ReportKind::Inventory => write!(f, "inventory"),
            ReportKind::Receiving => write!(f, "receiving"),
            ReportKind::Writeoff => write!(f, "writeoff"),
            ReportKind::Transfer => write!(f, "transfer"),
        }
    }
}

impl FromStr for ReportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shift" => Ok(ReportKind::Shift),
            "inventory" => Ok(ReportKind::Inventory),
            "receiving" => Ok(ReportKind::Receiving),
            "writeoff" => Ok(ReportKind::Writeoff),
            "transfer" => Ok(ReportKind::Transfer),
            other => Err(format!("invalid report kind: '{other}'")),
        }
    }
}

/// A persisted unit of in-progress work.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "DraftRecord")]
pub struct Draft {
    pub id: DraftId,
    pub payload: DraftPayload,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Draft {
    /// Create a draft with both timestamps set to `now`.
    pub fn new(id: DraftId, payload: DraftPayload, now: DateTime<Utc>) -> Self {
        Self {
            id,
            payload,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.payload.kind()
    }

    /// Lightweight listing view of this draft.
    pub fn summary(&self) -> DraftSummary {
        let location = self.payload.location();
        DraftSummary {
            id: self.id.clone(),
            kind: self.kind(),
            title: self.kind().title().to_string(),
            location: if location.is_empty() {
                NO_LOCATION_LABEL.to_string()
            } else {
                location.to_string()
            },
            updated_at: self.updated_at,
        }
    }

    fn wire<'a, D: Serialize>(&'a self, data: &'a D) -> DraftWire<'a, D> {
        DraftWire {
            id: &self.id,
            kind: self.kind(),
            data,
            created_at: &self.created_at,
            updated_at: &self.updated_at,
        }
    }
}

impl Serialize for Draft {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.payload {
            Report::Shift(data) => self.wire(data).serialize(serializer),
            Report::Inventory(data) => self.wire(data).serialize(serializer),
            Report::Receiving(data) => self.wire(data).serialize(serializer),
            Report::Writeoff(data) => self.wire(data).serialize(serializer),
            Report::Transfer(data) => self.wire(data).serialize(serializer),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DraftWire<'a, D> {
    id: &'a DraftId,
    #[serde(rename = "type")]
    kind: ReportKind,
    data: &'a D,
    created_at: &'a DateTime<Utc>,
    updated_at: &'a DateTime<Utc>,
}

/// Draft as read from storage, before `data` is typed by `type`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftRecord {
    id: DraftId,
    #[serde(rename = "type")]
    kind: ReportKind,
    #[serde(default)]
    data: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<DraftRecord> for Draft {
    type Error = serde_json::Error;

    fn try_from(record: DraftRecord) -> Result<Self, Self::Error> {
        // Older clients may omit `data` entirely for an empty draft.
        let data = if record.data.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            record.data
        };

        let payload = match record.kind {
            ReportKind::Shift => Report::Shift(serde_json::from_value(data)?),
            ReportKind::Inventory => Report::Inventory(serde_json::from_value(data)?),
            ReportKind::Receiving => Report::Receiving(serde_json::from_value(data)?),
            ReportKind::Writeoff => Report::Writeoff(serde_json::from_value(data)?),
            ReportKind::Transfer => Report::Transfer(serde_json::from_value(data)?),
        };

        Ok(Draft {
            id: record.id,
            payload,
            created_at: record.created_at,
            updated_at: record.updated_at,
        })
    }
}

/// Listing view of a draft, as shown on a draft card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSummary {
    pub id: DraftId,
    pub kind: ReportKind,
    pub title: String,
    pub location: String,
    pub updated_at: DateTime<Utc>,
}
