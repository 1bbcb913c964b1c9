use serde::{de, Deserialize, Deserializer, Serialize};

use super::task::{ComplianceTask, Priority, Regulation};
use crate::error::{CalendarError, Result};

/// Which main view the calendar shows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    #[default]
    Month,
    List,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::List => "list",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "month" => Some(Self::Month),
            "list" => Some(Self::List),
            _ => None,
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| CalendarError::UnknownView(s.to_string()))
    }
}

/// Color scheme, persisted with the task list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Regulation and priority selectors. `None` means "all".
///
/// Deserialization accepts `"all"`, `""` and `null` as a cleared selector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct TaskFilter {
    #[serde(default, deserialize_with = "regulation_selector")]
    pub regulation: Option<Regulation>,
    #[serde(default, deserialize_with = "priority_selector")]
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &ComplianceTask) -> bool {
        self.regulation.is_none_or(|r| task.regulation == r)
            && self.priority.is_none_or(|p| task.priority == p)
    }

    /// Parse filter selector strings, where `"all"` clears the selector.
    pub fn parse(regulation: &str, priority: &str) -> Result<Self> {
        Ok(Self {
            regulation: parse_selector(regulation, Regulation::parse)?,
            priority: parse_selector(priority, Priority::parse)?,
        })
    }
}

fn parse_selector<T>(raw: &str, parse: impl Fn(&str) -> Result<T>) -> Result<Option<T>> {
    match raw {
        "all" | "" => Ok(None),
        value => parse(value).map(Some),
    }
}

fn deserialize_selector<'de, D, T>(
    deserializer: D,
    parse: impl Fn(&str) -> Result<T>,
) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_selector(&raw, parse).map_err(de::Error::custom),
        None => Ok(None),
    }
}

fn regulation_selector<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Regulation>, D::Error> {
    deserialize_selector(deserializer, Regulation::parse)
}

fn priority_selector<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Priority>, D::Error> {
    deserialize_selector(deserializer, Priority::parse)
}
