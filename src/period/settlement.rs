use chrono::{DateTime, FixedOffset, TimeDelta, Timelike};

use crate::period::{AEST, Market, Period};

/// The 30-minute NEM settlement period rule set.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NemSettlement;

pub type NemSettlementPeriod = Period<NemSettlement>;

impl Market for NemSettlement {
    fn frequency() -> TimeDelta {
        TimeDelta::minutes(30)
    }

    fn time_zone() -> FixedOffset {
        AEST
    }

    /// 1 through 48, resetting at local midnight.
    fn period_id(start: DateTime<FixedOffset>) -> u32 {
        let period_id = start.hour() * 2 + 1;
        if start.minute() >= 30 { period_id + 1 } else { period_id }
    }
}
