/// Slots per week bucket (Sunday through Saturday).
pub const DAYS_PER_WEEK: usize = 7;

/// Returned for any timestamp text that does not describe a real instant.
pub const MSG_INVALID_DATE: &str = "Given date must have valid format.";

/// Redeem target falls in a week that was never generated for the user.
pub const MSG_NOT_AVAILABLE: &str = "This reward is not available.";

/// Redeem target is later than the current instant.
pub const MSG_NOT_YET_AVAILABLE: &str = "This reward is not yet available.";

/// Slot expiry has passed.
pub const MSG_EXPIRED: &str = "This reward is already expired";

/// Slot already carries a redemption instant.
pub const MSG_ALREADY_REDEEMED: &str = "This reward has already been redeemed.";

/// A generated bucket had no slot for the target day. Never expected.
pub const MSG_SLOT_MISSING: &str = "Unable to retrieve date entry.";
