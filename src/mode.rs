//! Staking mode selection.
//!
//! Two independent staking pools exist on the same contract: the standard pool
//! and the custom pool. The selector only scopes which half of the snapshot
//! and which ledger entry points subsequent calls address — switching it never
//! touches the chain.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// One of the two independent staking pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StakeMode {
    Standard,
    Custom,
}

impl StakeMode {
    pub fn other(self) -> Self {
        match self {
            StakeMode::Standard => StakeMode::Custom,
            StakeMode::Custom => StakeMode::Standard,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StakeMode::Standard => "standard",
            StakeMode::Custom => "custom",
        }
    }
}

impl fmt::Display for StakeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Atomic mode switch. Callers resolve the mode at call time, never cache it.
#[derive(Debug, Default)]
pub struct ModeSelector {
    custom: AtomicBool,
}

impl ModeSelector {
    /// Starts in standard mode.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> StakeMode {
        if self.custom.load(Ordering::SeqCst) {
            StakeMode::Custom
        } else {
            StakeMode::Standard
        }
    }

    /// Flip the active mode and return the new one.
    pub fn toggle(&self) -> StakeMode {
        let was_custom = self.custom.fetch_xor(true, Ordering::SeqCst);
        if was_custom {
            StakeMode::Standard
        } else {
            StakeMode::Custom
        }
    }

    pub fn set(&self, mode: StakeMode) {
        self.custom
            .store(mode == StakeMode::Custom, Ordering::SeqCst);
    }
}
