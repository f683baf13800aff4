//! Roster-and-draw state machine for a prize raffle.
//!
//! [`RosterStore`] owns the employee roster and persists it through a
//! [`storage::KeyValueStore`]. [`RaffleEngine`] owns the pool and the winner.
//! [`RaffleSession`] composes both with the reveal timeline and is what a
//! rendering layer talks to.

pub mod clock;
pub mod defaults;
pub mod engine;
pub mod ids;
pub mod roster;
pub mod session;
pub mod timeline;
pub mod timers;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::RaffleEngine;
pub use roster::{RemoveOutcome, RosterStore, DEFAULT_STORAGE_KEY};
pub use session::{ConfirmationAction, PendingConfirmation, Prompt, RaffleSession, WinnerCard};
pub use timeline::Timings;
