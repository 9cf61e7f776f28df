//! Nanosecond-precision timestamps for cache records and artifact comparison.

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// A UTC instant with nanosecond precision.
///
/// Used for the `lastModified` field of cached source records and for
/// comparing sources against their compiled artifacts. Serializes as an
/// RFC 3339 string with nine fractional digits, and deserializes from either
/// that form or an integer count of nanoseconds since the Unix epoch.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

/// Error returned when a string is not a valid RFC 3339 timestamp.
#[derive(Debug, thiserror::Error)]
#[error("invalid timestamp '{input}': {reason}")]
pub struct ParseTimestampError {
    /// The rejected input.
    pub input: String,
    /// Why it was rejected.
    pub reason: String,
}

impl Timestamp {
    /// Converts a filesystem time into a timestamp.
    pub fn from_system_time(time: SystemTime) -> Self {
        Self(DateTime::<Utc>::from(time))
    }

    /// Creates a timestamp from nanoseconds since the Unix epoch.
    pub fn from_epoch_nanos(nanos: i64) -> Self {
        Self(Utc.timestamp_nanos(nanos))
    }

    /// Returns nanoseconds since the Unix epoch, or `None` if out of `i64` range.
    pub fn epoch_nanos(&self) -> Option<i64> {
        self.0.timestamp_nanos_opt()
    }

    /// Converts back into a [`SystemTime`], e.g. to stamp a file's mtime.
    pub fn to_system_time(&self) -> SystemTime {
        SystemTime::from(self.0)
    }
}

impl FromStr for Timestamp {
    type Err = ParseTimestampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| Self(dt.with_timezone(&Utc)))
            .map_err(|e| ParseTimestampError {
                input: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Nanos, true))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({self})")
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TimestampVisitor;

        impl Visitor<'_> for TimestampVisitor {
            type Value = Timestamp;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an RFC 3339 timestamp string or epoch nanoseconds")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Timestamp, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Timestamp, E> {
                Ok(Timestamp::from_epoch_nanos(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Timestamp, E> {
                let nanos = i64::try_from(v).map_err(E::custom)?;
                Ok(Timestamp::from_epoch_nanos(nanos))
            }
        }

        deserializer.deserialize_any(TimestampVisitor)
    }
}
