//! One-time code values and their expiry instants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Wire shape of one token entry in a `get_services_tokens` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawToken {
    pub token: String,
    /// Epoch seconds at which the code becomes invalid.
    pub next_step_time: u64,
}

/// The current code for one service plus the instant it goes stale.
/// Entirely backend-derived; the engine only computes its remaining
/// lifetime for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TotpToken {
    pub code: String,
    pub next_step_time: DateTime<Utc>,
}

impl TotpToken {
    /// Decode a wire entry, rejecting out-of-range timestamps.
    pub fn from_raw(raw: RawToken) -> Option<Self> {
        let next_step_time = DateTime::from_timestamp(i64::try_from(raw.next_step_time).ok()?, 0)?;
        Some(Self {
            code: raw.token,
            next_step_time,
        })
    }

    /// Seconds until expiry at `now`, rounded to the nearest whole
    /// second. Negative once the code is stale.
    pub fn remaining_seconds(&self, now: DateTime<Utc>) -> i64 {
        let millis = (self.next_step_time - now).num_milliseconds();
        (millis as f64 / 1000.0).round() as i64
    }
}

/// Ephemeral mapping id -> token, rebuilt on every refresh cycle.
pub type TokenSet = HashMap<String, TotpToken>;
