//! Mapping from symbolic time-window labels to absolute cutoff timestamps.

/// A symbolic time window over recent chain history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    /// The last 24 hours. Also the fallback for unrecognized labels.
    #[default]
    LastDay,
    /// The last 3 days.
    LastThreeDays,
    /// The last week.
    LastWeek,
    /// The last 30 days.
    LastMonth,
}

impl TimeRange {
    /// Parses a window label. Unrecognized labels fall back to [`TimeRange::LastDay`].
    pub fn parse(label: &str) -> Self {
        match label {
            "24h" => Self::LastDay,
            "3d" => Self::LastThreeDays,
            "1w" => Self::LastWeek,
            "1m" => Self::LastMonth,
            _ => Self::LastDay,
        }
    }

    /// The window's length in seconds.
    pub fn window_secs(&self) -> u64 {
        match self {
            Self::LastDay => 86_400,
            Self::LastThreeDays => 259_200,
            Self::LastWeek => 604_800,
            Self::LastMonth => 2_592_000,
        }
    }

    /// The absolute cutoff timestamp for this window, anchored at `now`.
    /// Blocks with a chain-reported time before the cutoff fall outside the
    /// window.
    pub fn cutoff(&self, now: u64) -> u64 {
        now.saturating_sub(self.window_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recognized_labels() {
        assert_eq!(TimeRange::parse("24h"), TimeRange::LastDay);
        assert_eq!(TimeRange::parse("3d"), TimeRange::LastThreeDays);
        assert_eq!(TimeRange::parse("1w"), TimeRange::LastWeek);
        assert_eq!(TimeRange::parse("1m"), TimeRange::LastMonth);
    }

    #[test]
    fn test_unrecognized_labels_default_to_last_day() {
        assert_eq!(TimeRange::parse(""), TimeRange::LastDay);
        assert_eq!(TimeRange::parse("7d"), TimeRange::LastDay);
        assert_eq!(TimeRange::parse("all"), TimeRange::LastDay);
    }

    #[test]
    fn test_cutoff_subtracts_the_window() {
        let now = 1_700_000_000;
        assert_eq!(TimeRange::LastDay.cutoff(now), now - 86_400);
        assert_eq!(TimeRange::LastThreeDays.cutoff(now), now - 259_200);
        assert_eq!(TimeRange::LastWeek.cutoff(now), now - 604_800);
        assert_eq!(TimeRange::LastMonth.cutoff(now), now - 2_592_000);
    }

    #[test]
    fn test_cutoff_saturates_at_the_epoch() {
        assert_eq!(TimeRange::LastMonth.cutoff(100), 0);
    }
}
