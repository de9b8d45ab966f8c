// Main library file for the flight reservation engine

pub mod config;
pub mod engine;
pub mod error;
pub mod record;
pub mod search;
pub mod seats;
pub mod sequence;
pub mod store;

// Re-export key types for convenience
pub use config::EngineConfig;
pub use engine::{LoadReport, Removal, ReservationEngine, SaveOutcome};
pub use error::{ConfigError, EngineError, RowError, StoreError};
pub use record::{Population, Reservation, ReservationId};
pub use seats::{SeatIndex, SeatUpdate};
pub use sequence::OrderedSequence;
pub use store::ReservationStore;
