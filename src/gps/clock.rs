use chrono::DateTime;
use chrono::Local;
use chrono::Offset;
use chrono::TimeZone;
use chrono::Utc;

/// Host time, used to complete sentences that carry no date and to find the
/// local offset of a fix.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// Offset of local time from UTC at `instant`, in hours
    fn utc_offset_hours(&self, instant: DateTime<Utc>) -> f64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn utc_offset_hours(&self, instant: DateTime<Utc>) -> f64 {
        let local = Local.from_utc_datetime(&instant.naive_utc());

        local.offset().fix().local_minus_utc() as f64 / 3600.0
    }
}

/// A clock stopped at `now` in a zone `offset_hours` from UTC.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub offset_hours: f64,
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }

    fn utc_offset_hours(&self, _instant: DateTime<Utc>) -> f64 {
        self.offset_hours
    }
}
