//! Weekly reward scheduling core.
//!
//! One reward per user per UTC calendar day, grouped into Sunday-start weeks.
//! This crate holds the date arithmetic, the slot model and the error type.
//!
//! Zero I/O. Storage and transport live in `wr-store` and `wr-cli`.

pub mod clock;
pub mod constants;
pub mod error;
pub mod slot;
pub mod time;
pub mod wire;

pub use clock::{Clock, FixedClock, SystemClock};
pub use constants::DAYS_PER_WEEK;
pub use error::{ErrorKind, Result, RewardError};
pub use slot::{RewardSlot, SlotCell, SlotState, WeekBucket};
pub use time::{add_days, canonicalize, parse_instant, same_utc_day, week_key, week_start};
pub use wire::WireSlot;
