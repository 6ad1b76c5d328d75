use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};

use wr_core::constants::{
    MSG_ALREADY_REDEEMED, MSG_EXPIRED, MSG_NOT_AVAILABLE, MSG_NOT_YET_AVAILABLE, MSG_SLOT_MISSING,
};
use wr_core::{
    Clock, Result, RewardError, RewardSlot, SlotState, SystemClock, WeekBucket, canonicalize,
    parse_instant, week_key, week_start,
};

/// user id -> week-start epoch seconds -> bucket
type Buckets = HashMap<String, HashMap<i64, Arc<WeekBucket>>>;

/// Process-lifetime reward schedule for every user.
///
/// Generation is serialized by the map lock, so a week is built at most once
/// per user. Redemption is serialized per slot by the slot's write-once cell.
pub struct RewardStore {
    buckets: Mutex<Buckets>,
    clock: Arc<dyn Clock>,
}

impl Default for RewardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RewardStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
            clock,
        }
    }

    // The map is only ever changed by a single insert or clear, so a panic
    // elsewhere while holding the lock cannot leave it half-written.
    fn buckets(&self) -> MutexGuard<'_, Buckets> {
        self.buckets.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Generate ---

    /// Return the week containing `anchor` for `user_id`, building it on first request.
    pub fn generate_week(&self, user_id: &str, anchor: &str) -> Result<Arc<WeekBucket>> {
        let anchor = parse_instant(anchor).inspect_err(|_| {
            tracing::warn!("user {user_id} sent malformed week anchor {anchor:?}");
        })?;
        self.generate_week_at(user_id, anchor)
    }

    pub fn generate_week_at(
        &self,
        user_id: &str,
        anchor: DateTime<Utc>,
    ) -> Result<Arc<WeekBucket>> {
        let start = week_start(anchor)?;
        let key = week_key(start);

        let mut buckets = self.buckets();
        if let Some(bucket) = buckets.get(user_id).and_then(|weeks| weeks.get(&key)) {
            tracing::debug!("week {} cached for user {user_id}", canonicalize(start));
            return Ok(Arc::clone(bucket));
        }

        tracing::debug!(
            "no week {} for user {user_id}, generating",
            canonicalize(start)
        );
        let bucket = Arc::new(WeekBucket::new(start)?);
        buckets
            .entry(user_id.to_string())
            .or_default()
            .insert(key, Arc::clone(&bucket));
        Ok(bucket)
    }

    fn lookup(&self, user_id: &str, key: i64) -> Option<Arc<WeekBucket>> {
        self.buckets()
            .get(user_id)
            .and_then(|weeks| weeks.get(&key))
            .cloned()
    }

    // --- Redeem ---

    /// Redeem the slot for `target`'s UTC calendar day.
    ///
    /// Checks run in a fixed order and the first failure wins: week generated,
    /// slot present, not yet redeemed, `target` not after now, slot not expired.
    /// `redeemed_at` is written only after every check passed.
    pub fn redeem(&self, user_id: &str, target: &str) -> Result<RewardSlot> {
        let target = parse_instant(target).inspect_err(|_| {
            tracing::warn!("user {user_id} sent malformed redeem date {target:?}");
        })?;
        self.redeem_at(user_id, target)
    }

    pub fn redeem_at(&self, user_id: &str, target: DateTime<Utc>) -> Result<RewardSlot> {
        let start = week_start(target)?;
        let shown = canonicalize(target);

        let Some(bucket) = self.lookup(user_id, week_key(start)) else {
            tracing::warn!("reward for user {user_id} at {shown} was never generated");
            return Err(RewardError::invalid_argument(MSG_NOT_AVAILABLE));
        };

        let Some(slot) = bucket.slot_on(target) else {
            tracing::error!(
                "week {} for user {user_id} has no slot for {shown}",
                canonicalize(bucket.start())
            );
            return Err(RewardError::internal(MSG_SLOT_MISSING));
        };

        if slot.is_redeemed() {
            tracing::warn!("user {user_id} tried to redeem {shown} twice");
            return Err(RewardError::invalid_state(MSG_ALREADY_REDEEMED));
        }

        let now = self.clock.now();

        if target > now {
            tracing::warn!("user {user_id} tried to redeem future reward {shown}");
            return Err(RewardError::invalid_argument(MSG_NOT_YET_AVAILABLE));
        }

        // `target <= now` and `target` lies in the slot's day, so the slot
        // cannot be pending here.
        match slot.snapshot().state_at(now) {
            SlotState::Available => {}
            SlotState::Expired => {
                tracing::warn!("user {user_id} tried to redeem expired reward {shown}");
                return Err(RewardError::invalid_argument(MSG_EXPIRED));
            }
            SlotState::Redeemed => {
                tracing::warn!("user {user_id} lost a concurrent redeem of {shown}");
                return Err(RewardError::invalid_state(MSG_ALREADY_REDEEMED));
            }
            SlotState::Pending => {
                tracing::error!("slot for {shown} is pending although {shown} is not after now");
                return Err(RewardError::invalid_argument(MSG_NOT_YET_AVAILABLE));
            }
        }

        if !slot.mark_redeemed(now) {
            tracing::warn!("user {user_id} lost a concurrent redeem of {shown}");
            return Err(RewardError::invalid_state(MSG_ALREADY_REDEEMED));
        }

        tracing::info!("user {user_id} redeemed {shown}");
        Ok(slot.snapshot())
    }

    // --- Housekeeping ---

    /// Drop every generated week. Test isolation only.
    pub fn clear(&self) {
        self.buckets().clear();
    }

    /// Number of week buckets across all users.
    pub fn len(&self) -> usize {
        self.buckets().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
