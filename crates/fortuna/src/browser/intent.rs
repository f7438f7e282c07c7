//! User intents carried in `data-action` attributes.
//!
//! Rendered controls carry their action as text (`spin:0`, `start-slot`, …).
//! One delegated click listener reads the attribute back and queues the
//! intent, so no listener ever borrows the app.

use std::fmt;

/// Something the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Spin a wheel
    Spin(usize),
    /// Remove a wheel's settled prize
    RemovePrize(usize),
    /// Close a wheel's prize overlay
    CloseOverlay(usize),
    /// Start the slot machine from its input fields
    StartSlot,
    /// Close the slot machine
    CloseSlot,
}

impl Intent {
    /// Parse a `data-action` value.
    #[must_use]
    pub fn parse(action: &str) -> Option<Self> {
        let (verb, arg) = match action.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (action, None),
        };
        let wheel = || arg.and_then(|a| a.parse::<usize>().ok());
        match verb {
            "spin" => wheel().map(Self::Spin),
            "remove-prize" => wheel().map(Self::RemovePrize),
            "close-overlay" => wheel().map(Self::CloseOverlay),
            "start-slot" if arg.is_none() => Some(Self::StartSlot),
            "close-slot" if arg.is_none() => Some(Self::CloseSlot),
            _ => None,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spin(id) => write!(f, "spin:{id}"),
            Self::RemovePrize(id) => write!(f, "remove-prize:{id}"),
            Self::CloseOverlay(id) => write!(f, "close-overlay:{id}"),
            Self::StartSlot => f.write_str("start-slot"),
            Self::CloseSlot => f.write_str("close-slot"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!(Intent::parse("spin:1"), Some(Intent::Spin(1)));
        assert_eq!(Intent::parse("remove-prize:0"), Some(Intent::RemovePrize(0)));
        assert_eq!(Intent::parse("close-overlay:1"), Some(Intent::CloseOverlay(1)));
        assert_eq!(Intent::parse("start-slot"), Some(Intent::StartSlot));
        assert_eq!(Intent::parse("close-slot"), Some(Intent::CloseSlot));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(Intent::parse("spin"), None);
        assert_eq!(Intent::parse("spin:x"), None);
        assert_eq!(Intent::parse("start-slot:2"), None);
        assert_eq!(Intent::parse("dance:1"), None);
        assert_eq!(Intent::parse(""), None);
    }

    #[test]
    fn test_display_matches_parse() {
        for intent in [
            Intent::Spin(0),
            Intent::RemovePrize(1),
            Intent::CloseOverlay(1),
            Intent::StartSlot,
            Intent::CloseSlot,
        ] {
            assert_eq!(Intent::parse(&intent.to_string()), Some(intent));
        }
    }
}
