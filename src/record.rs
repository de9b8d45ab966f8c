// Reservation records and the two populations they can live in

use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDateTime, Timelike};

use crate::error::RowError;

pub type ReservationId = i64;

// Date and time of day; a 7-digit fraction (100ns ticks) follows
const SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const NANOS_PER_TICK: u32 = 100;

/// One flight booking. Immutable once it sits in a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub passenger_name: String,
    pub flight_number: String,
    pub seat_number: String,
    pub booking_time: NaiveDateTime,
    pub id: ReservationId,
}

impl Reservation {
    pub fn new(
        passenger_name: impl Into<String>,
        flight_number: impl Into<String>,
        seat_number: impl Into<String>,
        booking_time: NaiveDateTime,
        id: ReservationId,
    ) -> Self {
        Self {
            passenger_name: passenger_name.into(),
            flight_number: flight_number.into(),
            seat_number: seat_number.into(),
            booking_time: truncate_to_tick(booking_time),
            id,
        }
    }
}

impl fmt::Display for Reservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Passenger: {}, Flight: {}, Seat: {}, Date: {}, ID: {}",
            self.passenger_name,
            self.flight_number,
            self.seat_number,
            self.booking_time.date(),
            self.id
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Population {
    Regular,
    Urgent,
}

impl Population {
    pub fn as_tag(&self) -> &'static str {
        match self {
            Population::Regular => "regular",
            Population::Urgent => "urgent",
        }
    }
}

impl fmt::Display for Population {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

impl FromStr for Population {
    type Err = RowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Population::Regular),
            "urgent" => Ok(Population::Urgent),
            other => Err(RowError::UnknownTag(other.to_string())),
        }
    }
}

/// Drops precision below the 100ns tick the file can hold.
pub fn truncate_to_tick(ts: NaiveDateTime) -> NaiveDateTime {
    let nanos = ts.nanosecond();
    ts.with_nanosecond(nanos - nanos % NANOS_PER_TICK).unwrap_or(ts)
}

pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    format!(
        "{}.{:07}",
        ts.format(SECONDS_FORMAT),
        ts.nanosecond() / NANOS_PER_TICK
    )
}

/// Accepts the round-trip form with or without fractional seconds.
/// Values carrying an offset (`Z`, `+02:00`) are normalised to UTC.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, RowError> {
    let raw = raw.trim();

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.naive_utc()))
        .map_err(|_| RowError::InvalidTimestamp(raw.to_string()))
}
