use std::{
    fmt::{Debug, Display, Formatter},
    ops::Div,
};

use chrono::TimeDelta;
use ordered_float::OrderedFloat;

use crate::quantity::power::Kilowatts;

/// An amount of electrical energy in kilowatt-hours.
#[derive(
    Clone,
    Copy,
    Eq,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
    derive_more::Add,
    derive_more::AddAssign,
    derive_more::From,
    derive_more::FromStr,
    derive_more::Neg,
    derive_more::Sub,
    derive_more::SubAssign,
    derive_more::Sum,
)]
#[from(f64, OrderedFloat<f64>)]
#[must_use]
pub struct KilowattHours(pub OrderedFloat<f64>);

impl KilowattHours {
    pub const ZERO: Self = Self(OrderedFloat(0.0));

    pub const fn get(self) -> f64 {
        self.0.0
    }
}

impl Display for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3} kWh", self.0)
    }
}

impl Debug for KilowattHours {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}kWh", self.0.0)
    }
}

impl Div<f64> for KilowattHours {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

/// Energy over the time span it was used in is mean power.
impl Div<TimeDelta> for KilowattHours {
    type Output = Kilowatts;

    fn div(self, rhs: TimeDelta) -> Self::Output {
        let hours = rhs.as_seconds_f64() / 3600.0;
        Kilowatts(self.0 / hours)
    }
}
