//! Database models

pub mod reservation;
pub mod serde_helpers;
pub mod slot;

pub use reservation::{Reservation, ReservationCreate, ReservationStatus, ReservationUpdate};
pub use slot::{
    CANONICAL_TIMES, DEFAULT_ENABLED_TIMES, DEFAULT_MAX_CAPACITY, Slot, SlotKey, SlotToggle,
};
