use serde::{Deserialize, Serialize};

use super::task::ComplianceTask;

/// Local-storage key holding the persisted calendar document.
pub const STORAGE_KEY: &str = "complianceCalendar";

/// The JSON document persisted after every mutation.
///
/// Every field is optional on read so older or partial documents load:
/// missing `tasks` keeps the sample set, missing `theme` or `currentDate`
/// keep their defaults. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub tasks: Option<Vec<ComplianceTask>>,
    /// Kept as a string so an unrecognised theme does not discard the tasks.
    #[serde(default)]
    pub theme: Option<String>,
    /// ISO-8601 month cursor.
    #[serde(default)]
    pub current_date: Option<String>,
}
