use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(version, about, propagate_version = true)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show the settlement period a moment falls within.
    #[clap(name = "period")]
    Period(PeriodArgs),

    /// Integrate a file of power samples and split the energy per period.
    #[clap(name = "by-period")]
    ByPeriod(ByPeriodArgs),
}

#[derive(Parser)]
pub struct PeriodArgs {
    /// Moment to look up, ISO 8601. Naive times read as market wall clock.
    pub moment: String,

    #[clap(long, value_enum, default_value = "nem-settlement", env = "WATTLE_MARKET")]
    pub market: MarketKind,
}

#[derive(Parser)]
pub struct ByPeriodArgs {
    /// JSON array of `{"watts": …, "moment": …}` samples.
    pub samples: PathBuf,

    #[clap(long, value_enum, default_value = "nem-settlement", env = "WATTLE_MARKET")]
    pub market: MarketKind,
}

/// Runtime selector over the built-in market rule sets.
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum MarketKind {
    /// 30-minute NEM settlement periods.
    NemSettlement,

    /// 5-minute NEM dispatch periods.
    NemDispatch,
}
