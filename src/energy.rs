use std::collections::BTreeMap;

use itertools::Itertools;
use tracing::debug;

use crate::{
    error::{Error, Result},
    moment::Moment,
    period::{Market, Period},
    quantity::energy::KilowattHours,
    sample::PowerSample,
};

/// Electrical energy used within a span of time.
///
/// Either stated outright (`kwh` over `start..end`, no samples) or derived
/// from power samples by trapezoidal integration, in which case the sorted
/// samples are carried along and `start`/`end` are the first and last
/// sample's moment. Never mutated after construction.
#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct ElectricalEnergy {
    kwh: KilowattHours,
    start: Moment,
    end: Moment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    samples: Option<Vec<PowerSample>>,
}

impl ElectricalEnergy {
    /// State an energy total directly. `start > end` is not rejected.
    pub fn new(
        kwh: impl Into<KilowattHours>,
        start: impl Into<Moment>,
        end: impl Into<Moment>,
    ) -> Self {
        Self { kwh: kwh.into(), start: start.into(), end: end.into(), samples: None }
    }

    /// Integrate power samples into an energy total.
    ///
    /// Consecutive samples form trapezoids: the mean of the two readings is
    /// held for the time between them. Needs at least two samples.
    pub fn from_power_samples(samples: impl IntoIterator<Item = PowerSample>) -> Result<Self> {
        let mut samples = samples.into_iter().collect_vec();
        if samples.len() < 2 {
            return Err(Error::TooFewSamples(samples.len()));
        }
        samples.sort_by_key(|sample| sample.moment);
        let kwh = integrate(&samples);
        let (start, end) = (samples[0].moment, samples[samples.len() - 1].moment);
        Ok(Self { kwh, start, end, samples: Some(samples) })
    }

    #[must_use]
    pub const fn kwh(&self) -> KilowattHours {
        self.kwh
    }

    #[must_use]
    pub const fn start(&self) -> Moment {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> Moment {
        self.end
    }

    /// The sorted samples this energy was integrated from, if any.
    #[must_use]
    pub fn samples(&self) -> Option<&[PowerSample]> {
        self.samples.as_deref()
    }

    /// Elapsed seconds between `end` and `start`, keeping only the
    /// time-of-day remainder: whole days do not contribute, so a 25-hour
    /// span reports 3600.
    #[must_use]
    pub fn time(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_seconds().rem_euclid(86_400)
    }

    /// A `(kwh, start)` row for tabular consumers.
    #[must_use]
    pub const fn row(&self) -> (KilowattHours, Moment) {
        (self.kwh, self.start)
    }

    /// The ordered run of `M` periods covering `start..end`.
    ///
    /// Walks forward from the period containing `start`, instantiating each
    /// next period from the previous period's end, until the zone-matched
    /// `end` is covered. Never empty: `start == end` still yields one period.
    pub fn settlement_periods<M: Market>(&self) -> Vec<Period<M>> {
        let mut period = Period::<M>::new(self.start);
        let mut periods = vec![period];
        let end = M::localize(self.end);
        while period.end() < end {
            period = Period::new(period.end());
            periods.push(period);
        }
        periods
    }

    /// Split this energy into one aggregate per settlement period touched.
    ///
    /// With samples, each period is re-integrated from the samples taken
    /// within it, pinning uncovered period edges by constant extrapolation;
    /// a reading that straddles a boundary contributes its trapezoid to one
    /// period only, so the per-period total may drift from `kwh` by the
    /// extrapolation error. Without samples the total is split into equal
    /// shares.
    pub fn by_period<M: Market>(&self) -> Result<Vec<Self>> {
        match &self.samples {
            None => Ok(self.spread_uniformly::<M>()),
            Some(samples) => Self::integrate_by_period::<M>(samples),
        }
    }

    fn spread_uniformly<M: Market>(&self) -> Vec<Self> {
        let periods = self.settlement_periods::<M>();
        #[allow(clippy::cast_precision_loss)]
        let share = self.kwh / periods.len() as f64;
        debug!(n_periods = periods.len(), ?share, "spreading the total uniformly");
        periods.into_iter().map(|period| Self::new(share, period.start(), period.end())).collect()
    }

    fn integrate_by_period<M: Market>(samples: &[PowerSample]) -> Result<Vec<Self>> {
        let mut groups: BTreeMap<Period<M>, Vec<PowerSample>> = BTreeMap::new();
        for sample in samples {
            let period = sample.settlement_period::<M>();
            // Group zone-matched copies so edge comparisons are offset-free.
            let sample = PowerSample::new(sample.watts, period.localize(sample.moment));
            groups.entry(period).or_default().push(sample);
        }
        debug!(n_periods = groups.len(), "integrating each period independently");
        groups
            .into_iter()
            .map(|(period, mut group)| {
                group.sort_by_key(|sample| sample.moment);
                let (first, last) = (group[0], group[group.len() - 1]);
                if period.localize(first.moment) > period.start() {
                    group.insert(0, first.extrapolate_to(period.start()));
                }
                if period.localize(last.moment) < period.end() {
                    group.push(last.extrapolate_to(period.end()));
                }
                Self::from_power_samples(group)
            })
            .collect()
    }
}

/// Samples are provenance: equality is `(kwh, start, end)` alone.
impl PartialEq for ElectricalEnergy {
    fn eq(&self, other: &Self) -> bool {
        (self.kwh, self.start, self.end) == (other.kwh, other.start, other.end)
    }
}

impl Eq for ElectricalEnergy {}

fn integrate(samples: &[PowerSample]) -> KilowattHours {
    samples
        .iter()
        .tuple_windows()
        .map(|(left, right)| {
            let mean_power = ((left.watts + right.watts) / 2.0).kilowatts();
            mean_power * right.moment.signed_duration_since(left.moment)
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::period::{NemSettlement, NemSettlementPeriod};

    fn moment(input: &str) -> Moment {
        input.parse().unwrap()
    }

    fn sample(watts: f64, input: &str) -> PowerSample {
        PowerSample::new(watts, moment(input))
    }

    #[test]
    fn test_simple_create() {
        let energy =
            ElectricalEnergy::new(2.0, moment("2019-11-01T13:30:00"), moment("2019-11-01T13:35:00"));
        assert_eq!(energy.kwh(), KilowattHours::from(2.0));
        assert_eq!(energy.time(), 5 * 60);
        assert!(energy.samples().is_none());
    }

    #[test]
    fn test_time_discards_whole_days() {
        let energy =
            ElectricalEnergy::new(2.0, moment("2019-11-01T13:30:00"), moment("2019-11-02T14:30:00"));
        assert_eq!(energy.time(), 3600);
    }

    #[test]
    fn test_from_two_power_samples() {
        let sample_1 = sample(1000.0, "2019-11-01T13:30:00");
        let sample_2 = sample(10000.0, "2019-11-01T13:00:00");

        let energy = ElectricalEnergy::from_power_samples([sample_1, sample_2]).unwrap();

        assert_eq!(energy.start(), sample_2.moment);
        assert_eq!(energy.end(), sample_1.moment);
        assert_eq!(energy.kwh(), KilowattHours::from(2.75));

        let samples = energy.samples().unwrap();
        assert_eq!(samples[0].moment, sample_2.moment);
        assert_eq!(samples[1].moment, sample_1.moment);

        // The same as an energy stated outright over the same span.
        assert_eq!(
            energy,
            ElectricalEnergy::new(2.75, moment("2019-11-01T13:00:00"), moment("2019-11-01T13:30:00")),
        );
    }

    #[test]
    fn test_from_multiple_power_samples() {
        let samples = [
            sample(30000.0, "2019-11-01T13:00:00"),
            sample(60000.0, "2019-11-01T13:20:00"),
            sample(72000.0, "2019-11-01T13:30:00"),
        ];
        let energy = ElectricalEnergy::from_power_samples(samples).unwrap();
        assert_eq!(energy.samples().unwrap().len(), 3);
        assert_eq!(energy.kwh(), KilowattHours::from(26.0));
    }

    #[test]
    fn test_too_few_samples() {
        assert!(matches!(
            ElectricalEnergy::from_power_samples([]),
            Err(Error::TooFewSamples(0)),
        ));
        assert!(matches!(
            ElectricalEnergy::from_power_samples([sample(1000.0, "2019-11-01T13:00:00")]),
            Err(Error::TooFewSamples(1)),
        ));
    }

    #[test]
    fn test_settlement_periods() {
        let energy =
            ElectricalEnergy::new(1.0, moment("2019-11-01T09:00:00"), moment("2019-11-01T11:30:00"));
        // 09:00, 09:30, 10:00, 10:30, 11:00.
        assert_eq!(energy.settlement_periods::<NemSettlement>().len(), 5);
    }

    #[test]
    fn test_settlement_periods_tables() {
        let cases: [(&str, &str, &[&str]); 4] = [
            ("2019-11-01T13:30:00", "2019-11-01T13:35:00", &["2019-11-01T13:30:00"]),
            (
                "2019-11-01T13:30:00",
                "2019-11-01T14:25:00",
                &["2019-11-01T13:30:00", "2019-11-01T14:00:00"],
            ),
            (
                "2019-11-01T13:00:00",
                "2019-11-01T14:35:00",
                &[
                    "2019-11-01T13:00:00",
                    "2019-11-01T13:30:00",
                    "2019-11-01T14:00:00",
                    "2019-11-01T14:30:00",
                ],
            ),
            // A zero-length span still touches one period.
            ("2019-11-01T13:30:00", "2019-11-01T13:30:00", &["2019-11-01T13:30:00"]),
        ];
        for (start, end, expected) in cases {
            let energy = ElectricalEnergy::new(2.0, moment(start), moment(end));
            let expected: Vec<NemSettlementPeriod> =
                expected.iter().map(|input| input.parse().unwrap()).collect();
            assert_eq!(energy.settlement_periods::<NemSettlement>(), expected, "{start}..{end}");
        }
    }

    #[test]
    fn test_by_period_spreads_a_stated_total() {
        let energy =
            ElectricalEnergy::new(10.0, moment("2019-11-01T09:00:00"), moment("2019-11-01T11:30:00"));
        let split = energy.by_period::<NemSettlement>().unwrap();
        assert_eq!(split.len(), 5);
        for part in &split {
            assert_eq!(part.kwh(), KilowattHours::from(2.0));
            assert!(part.samples().is_none());
        }
        // Each share sits on its own period's bounds.
        assert_eq!(split[0].start(), moment("2019-11-01T09:00:00+10:00"));
        assert_eq!(split[0].end(), moment("2019-11-01T09:30:00+10:00"));
        assert_eq!(split[4].start(), moment("2019-11-01T11:00:00+10:00"));
    }

    #[test]
    fn test_by_period_integrates_sample_groups() {
        // Power between 13:00 and 14:15:
        //   30 min constant 10 kW,
        //   15 min rising 10 -> 20 kW,
        //   20 min falling 20 -> 10 kW,
        //   10 min rising 10 -> 30 kW.
        let samples = [
            sample(10000.0, "2019-11-01T13:00:00"),
            sample(10000.0, "2019-11-01T13:30:00"),
            sample(20000.0, "2019-11-01T13:45:00"),
            sample(10000.0, "2019-11-01T14:05:00"),
            sample(30000.0, "2019-11-01T14:15:00"),
        ];
        let energy = ElectricalEnergy::from_power_samples(samples).unwrap();
        assert_eq!(
            energy.kwh(),
            KilowattHours::from(5.0 + 3.75 + 5.0 + 20.0 * (10.0 / 60.0)),
        );
        assert_eq!(energy.time(), 75 * 60);

        let split = energy.by_period::<NemSettlement>().unwrap();
        assert_eq!(split.len(), 3);

        // 13:00..13:30: constant 10 kW, measured only at the start.
        let first = &split[0];
        assert_eq!(
            first.settlement_periods::<NemSettlement>(),
            vec!["2019-11-01T13:00:00".parse::<NemSettlementPeriod>().unwrap()],
        );
        assert_eq!(first.kwh(), KilowattHours::from(5.0));
        assert_eq!(first.samples().unwrap().len(), 2);

        // 13:30..14:00: rises 10 -> 20 kW, then implied constant 20 kW.
        let second = &split[1];
        assert_eq!(
            second.settlement_periods::<NemSettlement>(),
            vec!["2019-11-01T13:30:00".parse::<NemSettlementPeriod>().unwrap()],
        );
        assert_eq!(
            second.kwh(),
            KilowattHours::from(15.0 * (15.0 / 60.0) + 20.0 * (15.0 / 60.0)),
        );
        assert_eq!(second.samples().unwrap().len(), 3);

        // 14:00..14:30: implied 10 kW, rises 10 -> 30 kW, implied 30 kW.
        let third = &split[2];
        assert_eq!(
            third.settlement_periods::<NemSettlement>(),
            vec!["2019-11-01T14:00:00".parse::<NemSettlementPeriod>().unwrap()],
        );
        assert_eq!(
            third.kwh(),
            KilowattHours::from(10.0 * (5.0 / 60.0) + 20.0 * (10.0 / 60.0) + 30.0 * (15.0 / 60.0)),
        );
        assert_eq!(third.samples().unwrap().len(), 4);
    }

    #[test]
    fn test_by_period_pins_edges_not_proportional_split() {
        // One trapezoid straddles 13:30. Each period only sees its own
        // reading held constant to the edge, never a share of the
        // straddling 1 -> 5 kW ramp.
        let samples =
            [sample(1000.0, "2019-11-01T13:15:00"), sample(5000.0, "2019-11-01T13:40:00")];
        let energy = ElectricalEnergy::from_power_samples(samples).unwrap();
        assert_eq!(energy.kwh(), KilowattHours::from(3.0 * (25.0 / 60.0)));

        let split = energy.by_period::<NemSettlement>().unwrap();
        assert_eq!(split.len(), 2);
        // 13:00..13:30: constant 1 kW across the whole period.
        assert_eq!(
            split[0].kwh(),
            KilowattHours::from(1.0 * (15.0 / 60.0) + 1.0 * (15.0 / 60.0)),
        );
        // 13:30..14:00: constant 5 kW across the whole period.
        assert_eq!(
            split[1].kwh(),
            KilowattHours::from(5.0 * (10.0 / 60.0) + 5.0 * (20.0 / 60.0)),
        );
        // The parts add back to the constant-extrapolated 3.0 kWh, not to
        // the 1.25 kWh of the original trapezoid.
        let total: KilowattHours = split.iter().map(ElectricalEnergy::kwh).sum();
        assert_abs_diff_eq!(total.get(), 3.0, epsilon = 1e-12);
        assert_ne!(total, energy.kwh());
    }

    #[test]
    fn test_row() {
        let energy =
            ElectricalEnergy::new(2.0, moment("2019-11-01T13:30:00"), moment("2019-11-01T13:35:00"));
        assert_eq!(energy.row(), (KilowattHours::from(2.0), moment("2019-11-01T13:30:00")));
    }
}
