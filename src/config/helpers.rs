use std::time::Duration;

use serde::{Deserialize, Deserializer};

/// Custom deserializer for Duration from milliseconds
pub fn deserialize_duration_from_ms<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let ms = u64::deserialize(deserializer)?;
    Ok(Duration::from_millis(ms))
}

/// Custom deserializer for Duration from seconds
pub fn deserialize_duration_from_seconds<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let secs = u64::deserialize(deserializer)?;
    Ok(Duration::from_secs(secs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct TestDurations {
        #[serde(deserialize_with = "deserialize_duration_from_ms")]
        millis: Duration,
        #[serde(deserialize_with = "deserialize_duration_from_seconds")]
        secs: Duration,
    }

    #[test]
    fn test_duration_deserializers() {
        let json = r#"{"millis": 1500, "secs": 5}"#;
        let actual: TestDurations = serde_json::from_str(json).unwrap();
        assert_eq!(actual.millis, Duration::from_millis(1500));
        assert_eq!(actual.secs, Duration::from_secs(5));
    }
}
