//! In-memory chat sessions
//!
//! Sessions live only as long as the process. Idle sessions are evicted by
//! an explicit [`SessionStore::tick`] call, which a background task drives
//! on a fixed period in production and tests drive with a [`ManualClock`].

mod clock;
mod store;
mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::SessionStore;
pub use types::{ChatSession, ChatTurn, TurnRole};
