// Seat availability index, keyed by flight.
// Independent of the reservation sequences: nothing here is reconciled against bookings.

use std::collections::HashSet;

use dashmap::DashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeatUpdate {
    Added,
    AlreadyAvailable,
    Removed,
    WasNotAvailable,
}

#[derive(Debug, Default)]
pub struct SeatIndex {
    // presence in the set means "available"
    flights: DashMap<String, HashSet<String>>,
}

impl SeatIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// The flight's seat set is created on first reference, even when the
    /// call marks a seat unavailable.
    pub fn set_availability(&self, flight_number: &str, seat_number: &str, available: bool) -> SeatUpdate {
        let mut seats = self.flights.entry(flight_number.to_string()).or_default();

        match (available, seats.contains(seat_number)) {
            (true, true) => SeatUpdate::AlreadyAvailable,
            (true, false) => {
                seats.insert(seat_number.to_string());
                SeatUpdate::Added
            }
            (false, true) => {
                seats.remove(seat_number);
                SeatUpdate::Removed
            }
            (false, false) => SeatUpdate::WasNotAvailable,
        }
    }

    pub fn is_available(&self, flight_number: &str, seat_number: &str) -> bool {
        self.flights
            .get(flight_number)
            .map(|seats| seats.contains(seat_number))
            .unwrap_or(false)
    }

    /// `None` means no seat was ever registered for the flight.
    pub fn available_seats(&self, flight_number: &str) -> Option<Vec<String>> {
        self.flights.get(flight_number).map(|seats| {
            let mut list: Vec<String> = seats.iter().cloned().collect();
            list.sort();
            list
        })
    }

    pub fn flights_count(&self) -> usize {
        self.flights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_add_and_remove_seats() {
        let index = SeatIndex::new();

        assert_eq!(index.set_availability("AA100", "12A", true), SeatUpdate::Added);
        assert_eq!(
            index.set_availability("AA100", "12A", true),
            SeatUpdate::AlreadyAvailable
        );
        assert!(index.is_available("AA100", "12A"));

        assert_eq!(index.set_availability("AA100", "12A", false), SeatUpdate::Removed);
        assert!(!index.is_available("AA100", "12A"));
        assert_eq!(
            index.set_availability("AA100", "12A", false),
            SeatUpdate::WasNotAvailable
        );
    }

    #[test]
    fn test_unknown_flight_versus_empty_flight() {
        let index = SeatIndex::new();
        assert_eq!(index.available_seats("BA200"), None);

        assert_eq!(
            index.set_availability("BA200", "1C", false),
            SeatUpdate::WasNotAvailable
        );
        assert_eq!(index.available_seats("BA200"), Some(vec![]));
        assert_eq!(index.flights_count(), 1);
    }

    #[test]
    fn test_available_seats_sorted() {
        let index = SeatIndex::new();
        for seat in ["3C", "1A", "2B"] {
            index.set_availability("DL300", seat, true);
        }
        assert_eq!(
            index.available_seats("DL300"),
            Some(vec!["1A".to_string(), "2B".to_string(), "3C".to_string()])
        );
        assert!(!index.is_available("AA100", "1A"));
    }

    #[test]
    fn test_concurrent_seat_updates() {
        let index = Arc::new(SeatIndex::new());
        let mut handles = vec![];

        for i in 0..8 {
            let index = index.clone();
            handles.push(thread::spawn(move || {
                for row in 0..50 {
                    let seat = format!("{}{}", row, (b'A' + i as u8) as char);
                    index.set_availability("UA900", &seat, true);
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(index.available_seats("UA900").map(|s| s.len()), Some(400));
    }
}
