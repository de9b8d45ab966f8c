use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

use crate::record::ReservationId;

// Outcomes reported back to the caller of the engine
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("No reservation found with ID {0}")]
    NotFound(ReservationId),

    #[error("No reservation found on flight {0}")]
    FlightNotFound(String),

    #[error(
        "Booking at {booking_time} is {hours_until:.1}h away, urgent bookings must be within {window_hours}h"
    )]
    NotUrgent {
        booking_time: NaiveDateTime,
        hours_until: f64,
        window_hours: i64,
    },

    #[error("Invalid engine configuration: {0}")]
    Config(#[from] ConfigError),
}

// Errors from the backing file
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

// A single persisted line that could not be turned back into a reservation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("Expected 6 fields, found {found}")]
    FieldCount { found: usize },

    #[error("Invalid booking timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid reservation ID: {0}")]
    InvalidId(String),

    #[error("Unknown population tag: {0}")]
    UnknownTag(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Urgent window of {0}h is out of range")]
    InvalidUrgentWindow(i64),
}
