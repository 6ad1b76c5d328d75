//! Daily reward slots and the seven-slot week bucket that owns them.
//!
//! A slot's availability window is `[available_at, expires_at)`, always one
//! calendar day long. `redeemed_at` is write-once: the cell is a `OnceLock`,
//! so of any number of concurrent redemptions exactly one can set it.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};

use crate::constants::DAYS_PER_WEEK;
use crate::error::{Result, RewardError};
use crate::time::{add_days, same_utc_day};

/// Lifecycle position of a slot relative to some instant. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Pending,
    Available,
    Redeemed,
    Expired,
}

/// Point-in-time copy of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSlot {
    pub available_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub redeemed_at: Option<DateTime<Utc>>,
}

impl RewardSlot {
    pub fn state_at(&self, now: DateTime<Utc>) -> SlotState {
        if self.redeemed_at.is_some() {
            SlotState::Redeemed
        } else if now < self.available_at {
            SlotState::Pending
        } else if now >= self.expires_at {
            SlotState::Expired
        } else {
            SlotState::Available
        }
    }
}

/// The stored form of a slot. Lives inside a [`WeekBucket`] and is only
/// ever handed out by reference.
#[derive(Debug)]
pub struct SlotCell {
    available_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
    redeemed_at: OnceLock<DateTime<Utc>>,
}

impl SlotCell {
    fn new(available_at: DateTime<Utc>) -> Result<Self> {
        Ok(Self {
            available_at,
            expires_at: add_days(available_at, 1)?,
            redeemed_at: OnceLock::new(),
        })
    }

    pub fn available_at(&self) -> DateTime<Utc> {
        self.available_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn redeemed_at(&self) -> Option<DateTime<Utc>> {
        self.redeemed_at.get().copied()
    }

    pub fn is_redeemed(&self) -> bool {
        self.redeemed_at.get().is_some()
    }

    /// Record the redemption instant. Returns `false` if it was already set,
    /// in which case the stored value is left untouched.
    pub fn mark_redeemed(&self, at: DateTime<Utc>) -> bool {
        self.redeemed_at.set(at).is_ok()
    }

    pub fn snapshot(&self) -> RewardSlot {
        RewardSlot {
            available_at: self.available_at,
            expires_at: self.expires_at,
            redeemed_at: self.redeemed_at(),
        }
    }
}

/// Seven consecutive daily slots starting at a week start, Sunday first.
#[derive(Debug)]
pub struct WeekBucket {
    start: DateTime<Utc>,
    slots: [SlotCell; DAYS_PER_WEEK],
}

impl WeekBucket {
    /// Build fresh, unredeemed slots for `start .. start + 6 days`.
    pub fn new(start: DateTime<Utc>) -> Result<Self> {
        let cells = (0..DAYS_PER_WEEK as u64)
            .map(|day| add_days(start, day).and_then(SlotCell::new))
            .collect::<Result<Vec<_>>>()?;
        let slots = <[SlotCell; DAYS_PER_WEEK]>::try_from(cells)
            .map_err(|_| RewardError::internal("week bucket must hold exactly seven slots"))?;
        Ok(Self { start, slots })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn slots(&self) -> &[SlotCell] {
        &self.slots
    }

    /// The slot whose availability day is `instant`'s UTC calendar date.
    pub fn slot_on(&self, instant: DateTime<Utc>) -> Option<&SlotCell> {
        self.slots
            .iter()
            .find(|slot| same_utc_day(slot.available_at, instant))
    }

    pub fn snapshot(&self) -> Vec<RewardSlot> {
        self.slots.iter().map(SlotCell::snapshot).collect()
    }
}
