//! Position targets.

use serde::{Deserialize, Serialize};

/// Target exposure for one bar: fully invested or fully in cash.
///
/// The conditioner clamps raw input to `{-1, 0, 1}` before building this.
/// `-1` has no short meaning in a long/flat system and maps to `Flat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    Flat,
    Long,
}

impl Signal {
    /// Map a clamped signal value (`-1`, `0` or `1`) to a target.
    pub fn from_clamped(value: i8) -> Self {
        if value >= 1 {
            Signal::Long
        } else {
            Signal::Flat
        }
    }

    /// Integer form used in feature exports: 1 for long, 0 for flat.
    pub fn as_i8(self) -> i8 {
        match self {
            Signal::Flat => 0,
            Signal::Long => 1,
        }
    }

    pub fn is_long(self) -> bool {
        self == Signal::Long
    }
}
