//! Score counter

use std::fmt;

use serde::{Deserialize, Serialize};

/// Running score; kills add to it, power-ups are paid from it
///
/// There is no floor: `add` takes any delta, so the value can go negative.
/// Purchases go through [`Score::spend`], which refuses when the balance is
/// short.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    value: i64,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn add(&mut self, delta: i64) {
        self.value += delta;
    }

    /// Deduct `cost` if the balance covers it
    pub fn spend(&mut self, cost: i64) -> bool {
        if self.value < cost {
            return false;
        }
        self.value -= cost;
        true
    }

    /// Overlay text
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {}", self.value)
    }
}
