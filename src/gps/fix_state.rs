use chrono::DateTime;
use chrono::Utc;

use serde::Serialize;

use std::fmt;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use tracing::debug;

/// Receiver fix mode as reported by GSA
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub enum FixStatus {
    NoFix,
    Fix2D,
    Fix3D,
    /// A GSA sentence arrived with a mode we could not read
    Unknown,
}

impl fmt::Display for FixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixStatus::NoFix => write!(f, "NO FIX"),
            FixStatus::Fix2D => write!(f, "2D FIX"),
            FixStatus::Fix3D => write!(f, "3D FIX"),
            FixStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Position {
    pub latitude: f64,
    /// Degrees east, in [0, 360)
    pub longitude: f64,
    pub elevation: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TimeFix {
    pub utc: DateTime<Utc>,
    pub offset_hours: f64,
}

/// The fields one sentence contributes to the fix.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FixUpdate {
    pub position: Option<Position>,
    pub time: Option<TimeFix>,
    pub fix_status: Option<FixStatus>,
}

/// Latest fix of each category plus the outstanding poll.
///
/// `None` fields have never been reported by the receiver.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct FixState {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub utc_timestamp: Option<DateTime<Utc>>,
    pub utc_offset_hours: Option<f64>,
    pub fix_status: Option<FixStatus>,
    pub location_pending: bool,
    pub time_pending: bool,
}

impl FixState {
    /// UTC time as `2024-01-15T12:00:00`
    pub fn utc_time_text(&self) -> Option<String> {
        self.utc_timestamp
            .map(|t| t.format("%Y-%m-%dT%H:%M:%S").to_string())
    }

    /// Local offset as `1.00`, `-5.50`
    pub fn utc_offset_text(&self) -> Option<String> {
        self.utc_offset_hours.map(|o| format!("{:4.2}", o))
    }
}

#[derive(Debug, Eq, PartialEq)]
pub enum PollResponse {
    /// The next fresh fix will clear the pending flags
    Accepted,
    /// A poll is already outstanding
    Busy,
}

/// Shared access to the [`FixState`] of one device.
///
/// The reader task writes fixes and the poller flips pending flags, each
/// under the same short-lived lock.
#[derive(Clone, Debug, Default)]
pub struct FixHandle {
    state: Arc<Mutex<FixState>>,
}

impl FixHandle {
    pub fn new() -> Self {
        FixHandle::default()
    }

    fn lock(&self) -> MutexGuard<'_, FixState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn request_poll(&self) -> PollResponse {
        let mut state = self.lock();

        if state.location_pending || state.time_pending {
            return PollResponse::Busy;
        }

        state.location_pending = true;
        state.time_pending = true;

        PollResponse::Accepted
    }

    pub fn snapshot(&self) -> FixState {
        self.lock().clone()
    }

    pub fn apply(&self, update: FixUpdate) {
        let mut state = self.lock();

        if let Some(position) = update.position {
            state.latitude = Some(position.latitude);
            state.longitude = Some(position.longitude);

            if let Some(elevation) = position.elevation {
                state.elevation = Some(elevation);
            }

            state.location_pending = false;
        }

        if let Some(time) = update.time {
            state.utc_timestamp = Some(time.utc);
            state.utc_offset_hours = Some(time.offset_hours);
            state.time_pending = false;
        }

        if let Some(fix_status) = update.fix_status {
            state.fix_status = Some(fix_status);
        }

        let (location_pending, time_pending) = (state.location_pending, state.time_pending);
        drop(state);

        debug!(location_pending, time_pending, "fix updated");
    }
}
