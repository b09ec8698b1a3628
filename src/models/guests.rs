use serde::{Deserialize, Serialize};

/// Guest composition for an event, split by the age brackets the
/// marketplace prices against.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GuestBreakdown {
    pub adults: u32,
    pub children_6_12: u32,
    pub children_0_5: u32,
}

impl GuestBreakdown {
    /// Widened so the sum cannot overflow even at per-bracket maximums.
    pub fn total(&self) -> u64 {
        u64::from(self.adults) + u64::from(self.children_6_12) + u64::from(self.children_0_5)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBracket {
    #[serde(rename = "adults")]
    Adults,
    #[serde(rename = "children_6_12")]
    Children6To12,
    #[serde(rename = "children_0_5")]
    Children0To5,
}

impl AgeBracket {
    /// Brackets in the order they appear on a quote line-item list.
    pub const ALL: [AgeBracket; 3] = [
        AgeBracket::Adults,
        AgeBracket::Children6To12,
        AgeBracket::Children0To5,
    ];

    /// Inclusive age range covered by this bracket. `None` = unbounded.
    pub fn age_range(&self) -> (u32, Option<u32>) {
        match self {
            AgeBracket::Adults => (13, None),
            AgeBracket::Children6To12 => (6, Some(12)),
            AgeBracket::Children0To5 => (0, Some(5)),
        }
    }

    pub fn count_in(&self, guests: &GuestBreakdown) -> u32 {
        match self {
            AgeBracket::Adults => guests.adults,
            AgeBracket::Children6To12 => guests.children_6_12,
            AgeBracket::Children0To5 => guests.children_0_5,
        }
    }
}
