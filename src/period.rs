pub mod dispatch;
pub mod settlement;

pub use self::{
    dispatch::{NemDispatch, NemDispatchPeriod},
    settlement::{NemSettlement, NemSettlementPeriod},
};

use std::{
    cmp::Ordering,
    fmt::{Debug, Display, Formatter},
    hash::{Hash, Hasher},
    marker::PhantomData,
    str::FromStr,
};

use chrono::{DateTime, DurationRound, FixedOffset, NaiveDate, TimeDelta, Timelike};

use crate::{error::Error, moment::Moment};

/// Australian Eastern Standard Time.
///
/// The NEM settles on standard time year round, so the fixed +10:00 offset is
/// exact even while daylight saving is in force in member states.
pub(crate) const AEST: FixedOffset = match FixedOffset::east_opt(10 * 60 * 60) {
    Some(offset) => offset,
    None => unreachable!(),
};

/// A market rule set: how long a settlement period is, which wall clock it is
/// defined against, and how periods are numbered within the market day.
///
/// Implementations are zero-sized markers; a rule set that cannot supply the
/// required behavior does not compile.
pub trait Market {
    /// Period length.
    fn frequency() -> TimeDelta;

    /// The canonical zone the market settles in.
    fn time_zone() -> FixedOffset;

    /// Number of the period beginning at `start` within the market day.
    fn period_id(start: DateTime<FixedOffset>) -> u32;

    /// Truncate a zone-matched moment down to the period boundary at or
    /// below it, zeroing sub-minute components.
    ///
    /// The canonical offset must be a whole multiple of the frequency, so
    /// that truncating the UTC timeline also truncates local wall clock.
    fn round_down(moment: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        moment.duration_trunc(Self::frequency()).unwrap()
    }

    /// Match an arbitrary moment to the market's canonical zone.
    ///
    /// A naive moment is taken to already read wall clock in the canonical
    /// zone; a zoned moment is converted into it. This is the single point
    /// where cross-zone correctness is decided.
    fn localize(moment: impl Into<Moment>) -> DateTime<FixedOffset> {
        let time_zone = Self::time_zone();
        match moment.into() {
            Moment::Naive(naive) => DateTime::from_naive_utc_and_offset(naive - time_zone, time_zone),
            Moment::Zoned(zoned) => zoned.with_timezone(&time_zone),
        }
    }
}

/// One settlement period of market `M`.
///
/// `start`, `end` and `period_id` are fixed at construction. The
/// instantiating moment is kept for provenance only: identity is the
/// computed `start` alone, so two periods built from moments anywhere in the
/// same window are equal. Construction is cheap; treat instances as
/// disposable projections rather than cached objects.
pub struct Period<M> {
    moment: Moment,
    start: DateTime<FixedOffset>,
    period_id: u32,
    market: PhantomData<M>,
}

impl<M: Market> Period<M> {
    pub fn new(moment: impl Into<Moment>) -> Self {
        let moment = moment.into();
        let start = M::round_down(M::localize(moment));
        Self { moment, start, period_id: M::period_id(start), market: PhantomData }
    }

    /// The moment this period was instantiated from.
    #[must_use]
    pub const fn moment(&self) -> Moment {
        self.moment
    }

    /// Period-aligned start in the market's canonical zone.
    #[must_use]
    pub const fn start(&self) -> DateTime<FixedOffset> {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> DateTime<FixedOffset> {
        self.start + M::frequency()
    }

    #[must_use]
    pub const fn period_id(&self) -> u32 {
        self.period_id
    }

    #[must_use]
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDate {
        self.end().date_naive()
    }

    #[must_use]
    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }

    #[must_use]
    pub fn end_hour(&self) -> u32 {
        self.end().hour()
    }

    /// Zone-match a moment against this period's market.
    #[must_use]
    pub fn localize(&self, moment: impl Into<Moment>) -> DateTime<FixedOffset> {
        M::localize(moment)
    }

    /// Whether the half-open range `[start, end)` covers the moment.
    #[must_use]
    pub fn contains(&self, moment: impl Into<Moment>) -> bool {
        let moment = M::localize(moment);
        self.start <= moment && moment < self.end()
    }
}

impl<M> Clone for Period<M> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<M> Copy for Period<M> {}

impl<M> PartialEq for Period<M> {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
    }
}

impl<M> Eq for Period<M> {}

impl<M> PartialOrd for Period<M> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<M> Ord for Period<M> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.start.cmp(&other.start)
    }
}

impl<M> Hash for Period<M> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start.hash(state);
    }
}

impl<M: Market> Debug for Period<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?} #{}", self.start, self.end(), self.period_id)
    }
}

/// The canonical grouping key: RFC 3339 of `start` with its explicit offset.
impl<M> Display for Period<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.start.to_rfc3339())
    }
}

impl<M: Market> FromStr for Period<M> {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(input.parse::<Moment>()?))
    }
}

impl<M> serde::Serialize for Period<M> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de, M: Market> serde::Deserialize<'de> for Period<M> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer)?.parse().map_err(serde::de::Error::custom)
    }
}
