// Events that flow from background fetch tasks into the TUI loop
//
// Network work runs in spawned tasks; each completion comes back over an
// mpsc channel as one of these. Every variant carries the session
// generation it was spawned under so the controller can discard results
// that arrive after a logout (there is no request cancellation; a stale
// completion is simply ignored).

use crate::api::ApiError;
use crate::models::{DashboardAggregate, LogEntry};

/// A fetch completion delivered to the event loop.
#[derive(Debug)]
pub enum AppEvent {
    /// `authenticate` finished.
    LoginCompleted {
        generation: u64,
        result: Result<String, ApiError>,
    },

    /// The dashboard aggregate fetch finished.
    AggregateLoaded {
        generation: u64,
        result: Result<DashboardAggregate, ApiError>,
    },

    /// The activity-log fetch finished. Independent of the aggregate:
    /// neither result waits for the other.
    LogsLoaded {
        generation: u64,
        result: Result<Vec<LogEntry>, ApiError>,
    },
}

impl AppEvent {
    /// The session generation this completion belongs to.
    pub fn generation(&self) -> u64 {
        match self {
            AppEvent::LoginCompleted { generation, .. }
            | AppEvent::AggregateLoaded { generation, .. }
            | AppEvent::LogsLoaded { generation, .. } => *generation,
        }
    }
}
