use crate::error::EventBusError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Delivery order of a subscription within one event type.
///
/// Higher priorities are delivered first. Subscriptions with equal priority
/// keep the order in which they were made.
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    VeryLow = 0x1B,
    Low = 0x2B,
    #[default]
    Default = 0x3B,
    High = 0x4B,
    VeryHigh = 0x5B,
}

impl Priority {
    /// All levels, lowest first.
    pub const ALL: [Self; 5] = [Self::VeryLow, Self::Low, Self::Default, Self::High, Self::VeryHigh];

    /// Returns the raw level value.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns the snake_case name used in configuration files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VeryLow => "very_low",
            Self::Low => "low",
            Self::Default => "default",
            Self::High => "high",
            Self::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = EventBusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL.into_iter().find(|p| p.as_str() == normalized).ok_or_else(|| {
            EventBusError::InvalidPriority {
                message: format!("unknown priority '{s}'").into(),
                context: Some("expected one of very_low, low, default, high, very_high".into()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_levels_are_ordered() {
        assert!(Priority::VeryLow < Priority::Low);
        assert!(Priority::Low < Priority::Default);
        assert!(Priority::Default < Priority::High);
        assert!(Priority::High < Priority::VeryHigh);
        assert_eq!(Priority::default(), Priority::Default);
        assert_eq!(Priority::High.as_u8(), 0x4B);
    }

    #[test]
    fn test_parse_accepts_config_spellings() {
        assert_eq!("very_high".parse::<Priority>().unwrap(), Priority::VeryHigh);
        assert_eq!("Very-Low".parse::<Priority>().unwrap(), Priority::VeryLow);
        assert_eq!(" high ".parse::<Priority>().unwrap(), Priority::High);

        let err = "urgent".parse::<Priority>().unwrap_err();
        assert!(matches!(err, EventBusError::InvalidPriority { .. }));
        assert!(err.to_string().contains("urgent"));
    }

    #[test]
    fn test_serde_uses_snake_case() {
        let json = serde_json::to_string(&Priority::VeryHigh).unwrap();
        assert_eq!(json, "\"very_high\"");
        let back: Priority = serde_json::from_str("\"low\"").unwrap();
        assert_eq!(back, Priority::Low);
    }
}
