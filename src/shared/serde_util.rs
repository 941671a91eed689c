//! Custom serde helpers for CoinGecko wire formats.

/// Deserializes a Unix-seconds integer into `DateTime<Utc>`.
///
/// `/global` sends `updated_at` as epoch seconds, not ISO 8601.
pub mod timestamp_secs {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = i64::deserialize(deserializer)?;
        DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {}", secs)))
    }
}

/// Deserializes an optional Unix-seconds integer; `null` and absent map to `None`.
pub mod timestamp_secs_option {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<i64>::deserialize(deserializer)? {
            Some(secs) => DateTime::<Utc>::from_timestamp(secs, 0)
                .map(Some)
                .ok_or_else(|| serde::de::Error::custom(format!("Invalid timestamp: {}", secs))),
            None => Ok(None),
        }
    }
}

/// Treats `null` as an empty collection.
pub mod null_as_default {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Default,
    {
        Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Deserialize)]
    struct Stamped {
        #[serde(with = "super::timestamp_secs")]
        updated_at: DateTime<Utc>,
        #[serde(default, with = "super::timestamp_secs_option")]
        seen_at: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "super::null_as_default::deserialize")]
        shares: HashMap<String, f64>,
    }

    #[test]
    fn test_timestamp_secs() {
        let parsed: Stamped = serde_json::from_str(r#"{"updated_at": 1700000000}"#).unwrap();
        assert_eq!(parsed.updated_at.timestamp(), 1_700_000_000);
        assert!(parsed.seen_at.is_none());
        assert!(parsed.shares.is_empty());
    }

    #[test]
    fn test_null_as_default() {
        let parsed: Stamped =
            serde_json::from_str(r#"{"updated_at": 0, "seen_at": null, "shares": null}"#).unwrap();
        assert!(parsed.shares.is_empty());
        assert!(parsed.seen_at.is_none());
    }
}
