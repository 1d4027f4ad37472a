use std::cmp::Ordering;

use crate::{
    moment::Moment,
    period::{Market, Period},
    quantity::power::{Kilowatts, Megawatts, Watts},
};

/// A power reading: watts drawn at a specific moment.
///
/// The reading is taken as-is: negative watts (feed-in, export) pass
/// through unchanged.
#[derive(Clone, Copy, Debug, serde::Deserialize, serde::Serialize)]
pub struct PowerSample {
    pub watts: Watts,
    pub moment: Moment,
}

impl PowerSample {
    pub fn new(watts: impl Into<Watts>, moment: impl Into<Moment>) -> Self {
        Self { watts: watts.into(), moment: moment.into() }
    }

    #[must_use]
    pub fn kilowatts(&self) -> Kilowatts {
        self.watts.kilowatts()
    }

    #[must_use]
    pub fn megawatts(&self) -> Megawatts {
        self.watts.megawatts()
    }

    /// The period of market `M` this sample was taken within.
    pub fn settlement_period<M: Market>(&self) -> Period<M> {
        Period::new(self.moment)
    }

    /// Constant extrapolation: the same reading pinned to another moment.
    ///
    /// Used to pin period edges, never to interpolate slope.
    pub fn extrapolate_to(self, moment: impl Into<Moment>) -> Self {
        Self { moment: moment.into(), ..self }
    }
}

/// Samples rank by magnitude, not recency: the moment is excluded.
impl PartialEq for PowerSample {
    fn eq(&self, other: &Self) -> bool {
        self.watts == other.watts
    }
}

impl Eq for PowerSample {}

impl PartialOrd for PowerSample {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PowerSample {
    fn cmp(&self, other: &Self) -> Ordering {
        self.watts.cmp(&other.watts)
    }
}
