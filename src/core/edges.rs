//! Per-state edge counters.

use serde::{Deserialize, Serialize};

/// Number of accepted rules entering and leaving a state.
///
/// A state gets an entry the first time it appears on either side of an
/// accepted registration. An entry with no outbound edges marks a terminal
/// state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeCount {
    /// Rules whose successor is this state
    pub inbound: u32,
    /// Rules whose predecessor is this state
    pub outbound: u32,
}

impl EdgeCount {
    /// True when nothing leaves this state.
    pub fn is_terminal(&self) -> bool {
        self.outbound == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_outbound_is_terminal_regardless_of_inbound() {
        assert!(EdgeCount::default().is_terminal());
        assert!(EdgeCount {
            inbound: 4,
            outbound: 0
        }
        .is_terminal());
        assert!(!EdgeCount {
            inbound: 0,
            outbound: 1
        }
        .is_terminal());
    }
}
