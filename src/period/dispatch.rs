use chrono::{DateTime, Days, FixedOffset, TimeDelta, Timelike};

use crate::period::{AEST, Market, Period};

/// The 5-minute NEM dispatch period rule set.
///
/// Dispatch periods share the settlement clock but are numbered on a day
/// that begins at 04:00 market time.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NemDispatch;

pub type NemDispatchPeriod = Period<NemDispatch>;

impl Market for NemDispatch {
    fn frequency() -> TimeDelta {
        TimeDelta::minutes(5)
    }

    fn time_zone() -> FixedOffset {
        AEST
    }

    /// 1 through 288, resetting at 04:00 market time.
    fn period_id(start: DateTime<FixedOffset>) -> u32 {
        // Hours before 04:00 continue the previous dispatch day past hour 20.
        let hour = if start.hour() < 4 { start.hour() + 20 } else { start.hour() - 4 };
        12 * hour + start.minute() / 5 + 1
    }
}

impl NemDispatchPeriod {
    /// The AEMO `DISPATCHINTERVAL` key: the dispatch day's date followed by
    /// the zero-padded period id.
    ///
    /// Before 04:00 the interval still belongs to the previous dispatch day,
    /// so the date rolls back, except for the first period of a new day.
    #[must_use]
    pub fn dispatch_interval(&self) -> String {
        let mut date = self.start_date();
        if self.start().hour() < 4 && self.period_id() != 1 {
            date = date - Days::new(1);
        }
        format!("{}{:03}", date.format("%Y%m%d"), self.period_id())
    }
}
