// Reservation Engine
// Facade over the regular and urgent sequences, the seat index and the backing file.
// Every successful mutation rewrites the file before returning.

use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{debug, info, warn};

use crate::{
    config::EngineConfig,
    error::{EngineError, StoreError},
    record::{truncate_to_tick, Population, Reservation, ReservationId},
    search,
    seats::{SeatIndex, SeatUpdate},
    sequence::OrderedSequence,
    store::{ReservationStore, SkippedRow},
};

/// Result of the file rewrite that follows a mutation. A failed write never
/// rolls back the in-memory change.
#[must_use]
#[derive(Debug)]
pub enum SaveOutcome {
    Saved,
    Failed(StoreError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved)
    }
}

#[derive(Debug)]
pub struct Removal {
    pub record: Reservation,
    pub population: Population,
    pub save: SaveOutcome,
}

// Counts from the startup load
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub regular: usize,
    pub urgent: usize,
    pub skipped: Vec<SkippedRow>,
    /// Set when the file existed but could not be read at all.
    pub failed: Option<String>,
}

impl LoadReport {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

// How a record reaches a sequence. Replayed rows bypass the urgency window,
// the duplicate-id check and the save; the caller persists live ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Live,
    Replay,
}

#[derive(Debug)]
pub struct ReservationEngine {
    config: EngineConfig,
    regular: OrderedSequence,
    urgent: OrderedSequence,
    seats: SeatIndex,
    store: ReservationStore,
    load_report: LoadReport,
}

impl ReservationEngine {
    /// Builds the engine and replays the backing file. An unreadable file
    /// degrades to an empty engine.
    pub fn open(config: EngineConfig) -> Self {
        let store = ReservationStore::new(config.store_path.clone());
        let mut engine = Self {
            config,
            regular: OrderedSequence::new(),
            urgent: OrderedSequence::new(),
            seats: SeatIndex::new(),
            store,
            load_report: LoadReport::default(),
        };
        engine.load();
        engine
    }

    fn load(&mut self) {
        let loaded = match self.store.load() {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(error = %e, "Could not load reservations, starting with an empty store");
                self.load_report.failed = Some(e.to_string());
                return;
            }
        };

        for (population, record) in loaded.rows {
            match population {
                Population::Regular => self.load_report.regular += 1,
                Population::Urgent => self.load_report.urgent += 1,
            }
            self.place(population, record, Mode::Replay);
        }
        self.load_report.skipped = loaded.skipped;

        info!(
            regular = self.load_report.regular,
            urgent = self.load_report.urgent,
            skipped = self.load_report.skipped_count(),
            path = %self.store.path().display(),
            "Reservations loaded"
        );
    }

    fn place(&mut self, population: Population, mut record: Reservation, mode: Mode) {
        if mode == Mode::Live && self.contains_id(record.id) {
            warn!(id = record.id, "Reservation ID already in use, keeping both records");
        }

        // the file holds 100ns ticks
        record.booking_time = truncate_to_tick(record.booking_time);

        match population {
            Population::Regular => self.regular.insert(record),
            Population::Urgent => self.urgent.insert(record),
        }
    }

    /// Rewrites the backing file from the current state of both populations.
    pub fn persist(&self) -> SaveOutcome {
        match self.store.save(&self.regular, &self.urgent) {
            Ok(()) => SaveOutcome::Saved,
            Err(e) => {
                warn!(error = %e, "Error saving reservations, in-memory state is unsaved");
                SaveOutcome::Failed(e)
            }
        }
    }

    /// Adds a regular reservation in booking-time order.
    pub fn insert(&mut self, record: Reservation) -> SaveOutcome {
        info!(
            id = record.id,
            passenger = %record.passenger_name,
            flight = %record.flight_number,
            "Reservation added"
        );
        self.place(Population::Regular, record, Mode::Live);
        self.persist()
    }

    /// Adds an urgent reservation if it departs within the urgency window
    /// of `now`. The check happens once, here.
    pub fn add_urgent(&mut self, record: Reservation, now: NaiveDateTime) -> Result<SaveOutcome, EngineError> {
        let window = self.config.urgent_window()?;
        let until = record.booking_time - now;

        if until > window {
            let hours_until = until.num_seconds() as f64 / 3600.0;
            warn!(id = record.id, hours_until, "Booking does not qualify as urgent");
            return Err(EngineError::NotUrgent {
                booking_time: record.booking_time,
                hours_until,
                window_hours: self.config.urgent_window_hours,
            });
        }

        info!(
            id = record.id,
            passenger = %record.passenger_name,
            flight = %record.flight_number,
            "Urgent reservation added"
        );
        self.place(Population::Urgent, record, Mode::Live);
        Ok(self.persist())
    }

    pub fn add_urgent_now(&mut self, record: Reservation) -> Result<SaveOutcome, EngineError> {
        self.add_urgent(record, Local::now().naive_local())
    }

    /// Removes the first record carrying `id`, looking in the regular
    /// population before the urgent one.
    pub fn remove_by_id(&mut self, id: ReservationId) -> Result<Removal, EngineError> {
        let (record, population) = if let Some(record) = self.regular.remove_by_id(id) {
            (record, Population::Regular)
        } else if let Some(record) = self.urgent.remove_by_id(id) {
            (record, Population::Urgent)
        } else {
            debug!(id, "No reservation to remove");
            return Err(EngineError::NotFound(id));
        };

        info!(id, %population, "Reservation removed");
        let save = self.persist();
        Ok(Removal {
            record,
            population,
            save,
        })
    }

    pub fn traverse(&self, population: Population) -> impl Iterator<Item = &Reservation> {
        self.sequence(population).iter()
    }

    /// Urgent reservations first, then regular ones.
    pub fn list_all(&self) -> impl Iterator<Item = (Population, &Reservation)> {
        self.urgent
            .iter()
            .map(|r| (Population::Urgent, r))
            .chain(self.regular.iter().map(|r| (Population::Regular, r)))
    }

    pub fn snapshot(&self, population: Population) -> Vec<Reservation> {
        self.sequence(population).snapshot()
    }

    fn sequence(&self, population: Population) -> &OrderedSequence {
        match population {
            Population::Regular => &self.regular,
            Population::Urgent => &self.urgent,
        }
    }

    pub fn len(&self) -> usize {
        self.regular.len() + self.urgent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regular.is_empty() && self.urgent.is_empty()
    }

    pub fn contains_id(&self, id: ReservationId) -> bool {
        self.regular.contains_id(id) || self.urgent.contains_id(id)
    }

    /// Regular reservations on exactly `flight_number` whose booking falls
    /// on `date`, in list order.
    pub fn search_by_flight_and_date(&self, flight_number: &str, date: NaiveDate) -> Vec<Reservation> {
        let found: Vec<Reservation> = self
            .regular
            .iter()
            .filter(|r| r.flight_number == flight_number && r.booking_time.date() == date)
            .cloned()
            .collect();

        debug!(flight = flight_number, %date, matches = found.len(), "Searched by flight and date");
        found
    }

    /// Binary search over the regular population. Reports a single match.
    pub fn find_by_flight(&self, flight_number: &str) -> Result<Reservation, EngineError> {
        let found = search::find_by_flight(&self.regular, flight_number).cloned();
        debug!(flight = flight_number, found = found.is_some(), "Binary search by flight");
        found.ok_or_else(|| EngineError::FlightNotFound(flight_number.to_string()))
    }

    pub fn set_seat_availability(&self, flight_number: &str, seat_number: &str, available: bool) -> SeatUpdate {
        let update = self.seats.set_availability(flight_number, seat_number, available);
        debug!(flight = flight_number, seat = seat_number, ?update, "Seat availability updated");
        update
    }

    pub fn seats(&self) -> &SeatIndex {
        &self.seats
    }

    /// Re-links the regular population by booking time using merge sort.
    pub fn sort_by_date(&mut self) -> SaveOutcome {
        self.regular.sort_by_date();
        info!(count = self.regular.len(), "Regular reservations sorted by date");
        self.persist()
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
