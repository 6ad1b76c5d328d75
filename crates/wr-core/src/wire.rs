//! JSON shape of a slot as exposed to HTTP clients.

use serde::Serialize;

use crate::slot::RewardSlot;
use crate::time::canonicalize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireSlot {
    pub available_at: String,
    pub redeemed_at: Option<String>,
    pub expires_at: String,
}

impl From<&RewardSlot> for WireSlot {
    fn from(slot: &RewardSlot) -> Self {
        Self {
            available_at: canonicalize(slot.available_at),
            redeemed_at: slot.redeemed_at.map(canonicalize),
            expires_at: canonicalize(slot.expires_at),
        }
    }
}

impl From<RewardSlot> for WireSlot {
    fn from(slot: RewardSlot) -> Self {
        Self::from(&slot)
    }
}
