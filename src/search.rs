// Binary search over flight numbers
// Works on a sorted copy so the link order of the source sequence is untouched.

use std::cmp::Ordering;

use crate::record::Reservation;

/// Materialises `records`, sorts the copy by flight number (case-insensitive)
/// and binary searches it. Stops at the first hit, so with several bookings on
/// the same flight only one of them is returned.
pub fn find_by_flight<'a, I>(records: I, flight_number: &str) -> Option<&'a Reservation>
where
    I: IntoIterator<Item = &'a Reservation>,
{
    let mut sorted: Vec<(String, &Reservation)> = records
        .into_iter()
        .map(|r| (r.flight_number.to_lowercase(), r))
        .collect();

    if sorted.is_empty() {
        return None;
    }

    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let target = flight_number.to_lowercase();
    let mut low = 0;
    let mut high = sorted.len();

    while low < high {
        let mid = low + (high - low) / 2;
        match sorted[mid].0.cmp(&target) {
            Ordering::Equal => return Some(sorted[mid].1),
            Ordering::Less => low = mid + 1,
            Ordering::Greater => high = mid,
        }
    }

    None
}
