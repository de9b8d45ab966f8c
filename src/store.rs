// Persistence Gateway
// One comma-separated line per reservation:
//   passenger,flight,seat,booking_time,id,tag
// No header, no escaping. The whole file is rewritten on every save.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::{
    error::{RowError, StoreError},
    record::{format_timestamp, parse_timestamp, Population, Reservation},
};

const FIELD_COUNT: usize = 6;

pub fn format_row(record: &Reservation, population: Population) -> String {
    format!(
        "{},{},{},{},{},{}",
        record.passenger_name,
        record.flight_number,
        record.seat_number,
        format_timestamp(&record.booking_time),
        record.id,
        population.as_tag()
    )
}

pub fn parse_row(line: &str) -> Result<(Population, Reservation), RowError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(RowError::FieldCount {
            found: fields.len(),
        });
    }

    let booking_time = parse_timestamp(fields[3])?;
    let id = fields[4]
        .trim()
        .parse()
        .map_err(|_| RowError::InvalidId(fields[4].to_string()))?;
    let population = fields[5].trim().parse::<Population>()?;

    Ok((
        population,
        Reservation::new(fields[0], fields[1], fields[2], booking_time, id),
    ))
}

fn breaks_row_format(record: &Reservation) -> bool {
    [
        &record.passenger_name,
        &record.flight_number,
        &record.seat_number,
    ]
    .iter()
    .any(|field| field.contains(',') || field.contains('\n'))
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub line_number: usize,
    pub error: RowError,
}

#[derive(Debug, Default)]
pub struct LoadedRows {
    pub rows: Vec<(Population, Reservation)>,
    pub skipped: Vec<SkippedRow>,
}

#[derive(Debug)]
pub struct ReservationStore {
    path: PathBuf,
    // serialises every read and rewrite of the file
    file_lock: Mutex<()>,
}

impl ReservationStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    /// Reads every row in file order. A missing file is an empty store.
    /// Malformed lines are skipped and reported, blank lines are ignored.
    pub fn load(&self) -> Result<LoadedRows, StoreError> {
        let _guard = self.file_lock.lock();

        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No reservation file yet, starting empty");
                return Ok(LoadedRows::default());
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let content = String::from_utf8_lossy(&bytes);
        let mut loaded = LoadedRows::default();

        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match parse_row(line) {
                Ok(row) => loaded.rows.push(row),
                Err(error) => {
                    warn!(line = idx + 1, %error, "Skipping malformed reservation row");
                    loaded.skipped.push(SkippedRow {
                        line_number: idx + 1,
                        error,
                    });
                }
            }
        }

        debug!(
            rows = loaded.rows.len(),
            skipped = loaded.skipped.len(),
            "Reservation file read"
        );
        Ok(loaded)
    }

    /// Overwrites the file: regular rows first, then urgent rows, each in
    /// the order given.
    pub fn save<'a, R, U>(&self, regular: R, urgent: U) -> Result<(), StoreError>
    where
        R: IntoIterator<Item = &'a Reservation>,
        U: IntoIterator<Item = &'a Reservation>,
    {
        let _guard = self.file_lock.lock();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let file = File::create(&self.path).map_err(|e| self.io_error(e))?;
        let mut writer = BufWriter::new(file);

        let rows = regular
            .into_iter()
            .map(|r| (Population::Regular, r))
            .chain(urgent.into_iter().map(|r| (Population::Urgent, r)));

        for (population, record) in rows {
            if breaks_row_format(record) {
                warn!(id = record.id, "Reservation contains a comma or newline and will not load back intact");
            }
            writeln!(writer, "{}", format_row(record, population)).map_err(|e| self.io_error(e))?;
        }

        writer.flush().map_err(|e| self.io_error(e))
    }
}
