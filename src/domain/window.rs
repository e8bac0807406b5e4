// Lookback window for range queries
use std::fmt;
use thiserror::Error;

/// Lookback in minutes, always positive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window(u32);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("window must be a positive number of minutes, got {0}")]
pub struct InvalidWindow(pub i64);

impl Window {
    pub fn minutes(minutes: u32) -> Result<Self, InvalidWindow> {
        if minutes == 0 {
            Err(InvalidWindow(0))
        } else {
            Ok(Self(minutes))
        }
    }

    pub fn as_minutes(self) -> u32 {
        self.0
    }
}

impl TryFrom<i64> for Window {
    type Error = InvalidWindow;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .ok()
            .and_then(|m| Window::minutes(m).ok())
            .ok_or(InvalidWindow(value))
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}m", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_positive_minutes() {
        for choice in [30, 60, 120, 180, 360, 720] {
            assert_eq!(Window::minutes(choice).unwrap().as_minutes(), choice);
        }
        assert_eq!(Window::try_from(45_i64).unwrap().to_string(), "45m");
    }

    #[test]
    fn test_rejects_zero_and_negative() {
        assert_eq!(Window::minutes(0), Err(InvalidWindow(0)));
        assert_eq!(Window::try_from(-30_i64), Err(InvalidWindow(-30)));
        assert!(Window::try_from(i64::MAX).is_err());
    }
}
