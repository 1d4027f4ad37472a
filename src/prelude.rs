//! Convenience re-exports for consumers of the crate.

#![allow(unused_imports)]

pub use crate::{
    energy::ElectricalEnergy,
    error::{Error, Result},
    moment::Moment,
    period::{
        Market,
        NemDispatch,
        NemDispatchPeriod,
        NemSettlement,
        NemSettlementPeriod,
        Period,
    },
    quantity::{
        energy::KilowattHours,
        power::{Kilowatts, Megawatts, Watts},
    },
    sample::PowerSample,
};
