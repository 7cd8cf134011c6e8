use crate::gps::Clock;
use crate::gps::FixStatus;
use crate::gps::FixUpdate;
use crate::gps::Position;
use crate::gps::TimeFix;
use crate::nmea::*;

use chrono::DateTime;
use chrono::Datelike;
use chrono::NaiveDate;
use chrono::TimeZone;
use chrono::Utc;

use thiserror::Error;

/// Why a line did not change the fix.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FixError {
    #[error(transparent)]
    Sentence(#[from] SentenceError),
    #[error("unsupported sentence {0}")]
    Unrecognized(String),
    #[error("{0} reports no fix")]
    NotValid(&'static str),
    #[error("{kind} has no {field}")]
    Missing {
        kind: &'static str,
        field: &'static str,
    },
    #[error("{kind} date {date:?} time {time:?} is not a valid instant")]
    DateTimeRange {
        kind: &'static str,
        date: Date,
        time: Time,
    },
}

/// Finds the fix fields carried by `sentence`.
///
/// An error leaves the fix untouched; no partial update is ever returned.
pub fn extract<C: Clock + ?Sized>(sentence: &Sentence, clock: &C) -> Result<FixUpdate, FixError> {
    match sentence {
        Sentence::RMC(rmc) => rmc_fix(rmc, clock),
        Sentence::GGA(gga) => gga_fix(gga, clock),
        Sentence::GSA(gsa) => Ok(gsa_fix(gsa)),
        Sentence::ZDA(zda) => zda_fix(zda, clock),
        Sentence::Unrecognized(body) => Err(FixError::Unrecognized(body.clone())),
        Sentence::Invalid(e) => Err(FixError::Sentence(e.clone())),
    }
}

/// Longitude in degrees east, [0, 360)
pub fn normalize_longitude(longitude: f64) -> f64 {
    let east = if longitude < 0.0 {
        longitude + 360.0
    } else {
        longitude
    };

    // -0.0 and tiny westerly values that round up to 360.0
    if east == 0.0 || east >= 360.0 {
        0.0
    } else {
        east
    }
}

fn rmc_fix<C: Clock + ?Sized>(rmc: &RMCData, clock: &C) -> Result<FixUpdate, FixError> {
    if !rmc.valid {
        return Err(FixError::NotValid("RMC"));
    }

    let lat_lon = required("RMC", "position", rmc.lat_lon.as_ref())?;
    let time = *required("RMC", "time", rmc.time.as_ref())?;
    let date = *required("RMC", "date", rmc.date.as_ref())?;

    let utc = instant("RMC", date, time)?;

    Ok(FixUpdate {
        position: Some(position(lat_lon, None)),
        time: Some(TimeFix {
            utc,
            offset_hours: clock.utc_offset_hours(utc),
        }),
        fix_status: None,
    })
}

// GGA carries no date, so the fix is dated with the host's current UTC day.
// A fix taken just before UTC midnight and processed after it lands a day late.
fn gga_fix<C: Clock + ?Sized>(gga: &GGAData, clock: &C) -> Result<FixUpdate, FixError> {
    if gga.fix_quality == 0 {
        return Err(FixError::NotValid("GGA"));
    }

    let lat_lon = required("GGA", "position", gga.lat_lon.as_ref())?;
    let time = *required("GGA", "time", gga.time.as_ref())?;

    let today = clock.now_utc().naive_utc().date();
    let date = Date {
        day: today.day(),
        month: today.month(),
        year: today.year(),
    };

    let utc = instant("GGA", date, time)?;

    Ok(FixUpdate {
        position: Some(position(lat_lon, gga.altitude)),
        time: Some(TimeFix {
            utc,
            offset_hours: clock.utc_offset_hours(utc),
        }),
        fix_status: None,
    })
}

fn gsa_fix(gsa: &GSAData) -> FixUpdate {
    let fix_status = match gsa.fix_type {
        Some(1) => FixStatus::NoFix,
        Some(2) => FixStatus::Fix2D,
        Some(3) => FixStatus::Fix3D,
        _ => FixStatus::Unknown,
    };

    FixUpdate {
        fix_status: Some(fix_status),
        ..FixUpdate::default()
    }
}

fn zda_fix<C: Clock + ?Sized>(zda: &ZDAData, clock: &C) -> Result<FixUpdate, FixError> {
    let time = *required("ZDA", "time", zda.time.as_ref())?;
    let date = Date {
        day: *required("ZDA", "day", zda.day.as_ref())?,
        month: *required("ZDA", "month", zda.month.as_ref())?,
        year: *required("ZDA", "year", zda.year.as_ref())?,
    };

    let utc = instant("ZDA", date, time)?;

    let offset_hours = match zda.local_zone_hours {
        Some(hours) => {
            let minutes = zda.local_zone_minutes.unwrap_or(0) as f64 / 60.0;

            if hours < 0 {
                hours as f64 - minutes
            } else {
                hours as f64 + minutes
            }
        }
        None => clock.utc_offset_hours(utc),
    };

    Ok(FixUpdate {
        time: Some(TimeFix { utc, offset_hours }),
        ..FixUpdate::default()
    })
}

fn required<'a, T>(
    kind: &'static str,
    field: &'static str,
    value: Option<&'a T>,
) -> Result<&'a T, FixError> {
    value.ok_or(FixError::Missing { kind, field })
}

fn position(lat_lon: &LatLon, elevation: Option<f64>) -> Position {
    Position {
        latitude: lat_lon.latitude,
        longitude: normalize_longitude(lat_lon.longitude),
        elevation,
    }
}

fn instant(kind: &'static str, date: Date, time: Time) -> Result<DateTime<Utc>, FixError> {
    NaiveDate::from_ymd_opt(date.year, date.month, date.day)
        .and_then(|d| d.and_hms_micro_opt(time.hours, time.minutes, time.seconds, time.microseconds))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .ok_or(FixError::DateTimeRange { kind, date, time })
}
