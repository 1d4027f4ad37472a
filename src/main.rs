mod cli;
mod tables;

use std::fs::File;

use clap::{Parser, crate_version};
use tracing::info;
use wattle::prelude::*;

use crate::cli::{Args, ByPeriodArgs, Command, MarketKind, PeriodArgs};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    match Args::parse().command {
        Command::Period(args) => period(&args),
        Command::ByPeriod(args) => by_period(&args),
    }
}

fn period(args: &PeriodArgs) -> anyhow::Result<()> {
    let moment: Moment = args.moment.parse()?;
    match args.market {
        MarketKind::NemSettlement => {
            let period = NemSettlementPeriod::new(moment);
            println!("{}", tables::period_table(&period, None));
        }
        MarketKind::NemDispatch => {
            let period = NemDispatchPeriod::new(moment);
            let dispatch_interval = period.dispatch_interval();
            println!("{}", tables::period_table(&period, Some(dispatch_interval)));
        }
    }
    Ok(())
}

fn by_period(args: &ByPeriodArgs) -> anyhow::Result<()> {
    let samples: Vec<PowerSample> = serde_json::from_reader(File::open(&args.samples)?)?;
    info!(n_samples = samples.len(), path = %args.samples.display(), "loaded power samples");

    let energy = ElectricalEnergy::from_power_samples(samples)?;
    info!(kwh = %energy.kwh(), elapsed_seconds = energy.time(), "integrated");

    match args.market {
        MarketKind::NemSettlement => print_split::<NemSettlement>(&energy),
        MarketKind::NemDispatch => print_split::<NemDispatch>(&energy),
    }
}

fn print_split<M: Market>(energy: &ElectricalEnergy) -> anyhow::Result<()> {
    let split = energy.by_period::<M>()?;
    info!(n_periods = split.len(), "split per settlement period");
    println!("{}", tables::energy_table::<M>(&split));
    Ok(())
}
