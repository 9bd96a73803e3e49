//! Time-horizon list screens.
//!
//! Each horizon is one list screen with a fixed number of days ahead used to
//! scope remote queries.

use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Horizon {
    Today,
    Tomorrow,
    Week,
    Month,
}

impl Horizon {
    pub const ALL: [Horizon; 4] = [
        Horizon::Today,
        Horizon::Tomorrow,
        Horizon::Week,
        Horizon::Month,
    ];

    /// Days added to "now" to build the list window bound.
    pub fn days_ahead(self) -> u32 {
        match self {
            Self::Today => 0,
            Self::Tomorrow => 1,
            Self::Week => 7,
            Self::Month => 30,
        }
    }

    /// Stable key used across FFI and persisted navigation state.
    pub fn key(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Tomorrow => "tomorrow",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
            Self::Week => "This week",
            Self::Month => "This month",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Some(Self::Today),
            "tomorrow" => Some(Self::Tomorrow),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            _ => None,
        }
    }
}

impl Display for Horizon {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::Horizon;

    #[test]
    fn parse_accepts_every_key_case_insensitively() {
        for horizon in Horizon::ALL {
            assert_eq!(Horizon::parse(&horizon.key().to_uppercase()), Some(horizon));
        }
        assert_eq!(Horizon::parse("yesterday"), None);
    }

    #[test]
    fn days_ahead_matches_screen_layout() {
        let days: Vec<u32> = Horizon::ALL.iter().map(|h| h.days_ahead()).collect();
        assert_eq!(days, vec![0, 1, 7, 30]);
    }
}
