//! Domain models for the compliance calendar.
//!
//! - [`ComplianceTask`]: the only persisted entity, a dated obligation owned by a
//!   [`Regulation`] with a [`Priority`].
//! - [`TaskFilter`], [`ViewMode`], [`Theme`]: the selectors a calendar session
//!   applies when projecting the task list.
//! - [`PersistedState`]: the JSON document written to local storage.

mod selectors;
mod state;
mod task;

pub use selectors::*;
pub use state::*;
pub use task::*;
