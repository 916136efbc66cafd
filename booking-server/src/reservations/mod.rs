//! Reservation domain core
//!
//! # Submission flow
//!
//! ```text
//! submit(request)
//!     ├─ 1. Acquire the (date, time) admission lock
//!     ├─ 2. Check slot exists and is enabled
//!     ├─ 3. Sum committed seats (pending + accepted)
//!     ├─ 4. Admit only if committed + seats <= max_capacity
//!     ├─ 5. Persist as pending
//!     └─ 6. Emit StoreEvent -> ChangeFeed -> subscribers + dispatcher
//! ```
//!
//! Staff decisions (`accept` / `reject`) go through the dispatcher, which
//! persists the status transition first and only then fires the outbound
//! email and the local alert, deduplicated per (reservation, event kind).

pub mod allocator;
pub mod dispatcher;
pub mod feed;
pub mod service;
pub mod status;

#[cfg(test)]
mod tests;

pub use allocator::CapacityAllocator;
pub use dispatcher::{EventKind, NotificationDispatcher, TransitionOutcome};
pub use feed::{ChangeFeed, FeedSnapshot, FeedSubscription};
pub use service::{ReservationService, StoreEvent};
