use thiserror::Error;

/// Errors surfaced by calendar operations.
///
/// Parse failures of the persisted state are deliberately absent: loading
/// falls back to defaults instead of reporting them.
#[derive(Debug, Error)]
pub enum CalendarError {
    #[error("Invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),

    #[error("Unknown regulation: {0}")]
    UnknownRegulation(String),

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    #[error("Invalid calendar month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CalendarError {
    /// Whether the error was caused by caller input rather than the environment.
    pub fn is_validation(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Serialization(_))
    }
}

pub type Result<T> = std::result::Result<T, CalendarError>;
