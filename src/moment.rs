use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    str::FromStr,
};

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone};

use crate::error::Error;

/// An instant in time, either zone-naive or zone-aware.
///
/// The core never interprets timestamp strings itself: [`FromStr`] delegates
/// to chrono, which keeps any embedded offset and otherwise yields a naive
/// wall-clock time. What a naive moment *means* is up to the market rule set
/// that localizes it, see [`crate::period::Market::localize`].
#[derive(Clone, Copy, serde::Deserialize, serde::Serialize)]
#[serde(into = "String", try_from = "String")]
pub enum Moment {
    Naive(NaiveDateTime),
    Zoned(DateTime<FixedOffset>),
}

impl Moment {
    /// Position on a single timeline.
    ///
    /// Naive moments are placed at their wall-clock reading in UTC, so
    /// homogeneously naive and homogeneously zoned collections order exactly
    /// as their readings do.
    fn timeline(self) -> NaiveDateTime {
        match self {
            Self::Naive(naive) => naive,
            Self::Zoned(zoned) => zoned.naive_utc(),
        }
    }

    #[must_use]
    pub fn signed_duration_since(self, earlier: Self) -> TimeDelta {
        self.timeline() - earlier.timeline()
    }

    #[must_use]
    pub const fn is_zoned(self) -> bool {
        matches!(self, Self::Zoned(_))
    }
}

impl From<NaiveDateTime> for Moment {
    fn from(naive: NaiveDateTime) -> Self {
        Self::Naive(naive)
    }
}

impl From<NaiveDate> for Moment {
    fn from(date: NaiveDate) -> Self {
        Self::Naive(date.and_time(NaiveTime::MIN))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Moment {
    fn from(zoned: DateTime<Tz>) -> Self {
        Self::Zoned(zoned.fixed_offset())
    }
}

impl FromStr for Moment {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if let Ok(zoned) = DateTime::parse_from_rfc3339(input) {
            return Ok(Self::Zoned(zoned));
        }
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(input, format) {
                return Ok(Self::Naive(naive));
            }
        }
        Ok(NaiveDate::parse_from_str(input, "%Y-%m-%d")?.into())
    }
}

impl TryFrom<String> for Moment {
    type Error = Error;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl From<Moment> for String {
    fn from(moment: Moment) -> Self {
        moment.to_string()
    }
}

/// The canonical, lossless string form: RFC 3339 with the embedded offset
/// for zoned moments, plain ISO 8601 for naive ones.
impl Display for Moment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Naive(naive) => write!(f, "{}", naive.format("%Y-%m-%dT%H:%M:%S%.f")),
            Self::Zoned(zoned) => f.write_str(&zoned.to_rfc3339()),
        }
    }
}

impl Debug for Moment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl PartialEq for Moment {
    fn eq(&self, other: &Self) -> bool {
        self.timeline() == other.timeline()
    }
}

impl Eq for Moment {}

impl PartialOrd for Moment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Moment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timeline().cmp(&other.timeline())
    }
}
