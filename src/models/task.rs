use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalendarError, Result};

/// A trackable compliance obligation.
///
/// Tasks are never deleted. The only mutation after creation is flipping
/// `completed`, so `id` stays unique for the lifetime of a store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceTask {
    pub id: u32,
    pub title: String,
    pub description: String,
    /// Local wall-clock timestamp; no timezone normalization is applied.
    #[serde(with = "timestamp")]
    pub due_date: NaiveDateTime,
    pub priority: Priority,
    pub regulation: Regulation,
    /// Insertion order preserved, duplicates permitted.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed: bool,
}

/// Task urgency.
///
/// - `High`: rendered red
/// - `Medium`: rendered orange
/// - `Low`: rendered blue
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Marker order used by the month grid.
    pub const ALL: [Priority; 3] = [Self::High, Self::Medium, Self::Low];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Indicator color for calendar markers.
    pub fn color(&self) -> &'static str {
        match self {
            Self::High => "#e74c3c",
            Self::Medium => "#f39c12",
            Self::Low => "#17a2b8",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| CalendarError::UnknownPriority(s.to_string()))
    }
}

/// The compliance framework a task belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Regulation {
    Gdpr,
    Hipaa,
    Sox,
    Pci,
    Iso,
}

impl Regulation {
    /// Every known regulation. Filter surfaces enumerate this list, so a new
    /// variant only needs to be added here and in the match arms below.
    pub const ALL: [Regulation; 5] = [Self::Gdpr, Self::Hipaa, Self::Sox, Self::Pci, Self::Iso];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gdpr => "gdpr",
            Self::Hipaa => "hipaa",
            Self::Sox => "sox",
            Self::Pci => "pci",
            Self::Iso => "iso",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "gdpr" => Some(Self::Gdpr),
            "hipaa" => Some(Self::Hipaa),
            "sox" => Some(Self::Sox),
            "pci" => Some(Self::Pci),
            "iso" => Some(Self::Iso),
            _ => None,
        }
    }

    /// Upper-case tag shown next to a task.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| CalendarError::UnknownRegulation(s.to_string()))
    }
}

/// Input for creating a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskInput {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Calendar date; the task is due at local midnight of that day.
    pub due_date: NaiveDate,
    /// Defaults to `Medium`, like the new-task form.
    #[serde(default)]
    pub priority: Priority,
    pub regulation: Regulation,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateTaskInput {
    /// Build an input from raw form values: a `YYYY-MM-DD` date and a
    /// comma-separated tag string.
    pub fn from_form(
        title: &str,
        description: &str,
        due_date: &str,
        priority: &str,
        regulation: &str,
        tags: &str,
    ) -> Result<Self> {
        Ok(Self {
            title: title.to_string(),
            description: description.to_string(),
            due_date: parse_due_date(due_date)?,
            priority: Priority::parse(priority)?,
            regulation: Regulation::parse(regulation)?,
            tags: parse_tags(tags),
        })
    }
}

/// Parse a `YYYY-MM-DD` string as supplied by the date picker.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| CalendarError::InvalidDate(raw.to_string()))
}

/// Split a comma-separated tag string, trimming entries and dropping empties.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// ISO-8601 (de)serialization for local timestamps.
///
/// Writes `YYYY-MM-DDTHH:MM:SS.mmm`. Reads that form, RFC 3339 strings with an
/// offset (converted to local time) and bare dates (midnight).
pub mod timestamp {
    use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub fn format(value: &NaiveDateTime) -> String {
        value.format(FORMAT).to_string()
    }

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Local).naive_local());
        }
        if let Ok(dt) = raw.parse::<NaiveDateTime>() {
            return Some(dt);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }
}
