/// Whole seconds shown as `MM:SS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime(pub u32);

impl ClockTime {
    pub fn minutes(&self) -> u32 {
        self.0 / 60
    }

    pub fn seconds(&self) -> u32 {
        self.0 % 60
    }
}

impl From<u32> for ClockTime {
    fn from(secs: u32) -> Self {
        Self(secs)
    }
}

impl std::fmt::Display for ClockTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes(), self.seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        assert_eq!(ClockTime(0).to_string(), "00:00");
        assert_eq!(ClockTime(59).to_string(), "00:59");
        assert_eq!(ClockTime(20 * 60).to_string(), "20:00");
        assert_eq!(ClockTime(25 * 60 + 7).to_string(), "25:07");
    }

    #[test]
    fn test_long_durations_keep_minutes() {
        assert_eq!(ClockTime(125 * 60).to_string(), "125:00");
    }
}
