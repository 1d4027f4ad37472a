use comfy_table::{Cell, CellAlignment, Table, modifiers, presets};
use wattle::prelude::*;

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table
}

pub fn period_table<M: Market>(period: &Period<M>, dispatch_interval: Option<String>) -> Table {
    let mut table = new_table();
    table.add_row(vec![Cell::new("Start"), Cell::new(period.start().to_rfc3339())]);
    table.add_row(vec![Cell::new("End"), Cell::new(period.end().to_rfc3339())]);
    table.add_row(vec![Cell::new("Period"), Cell::new(period.period_id())]);
    table.add_row(vec![Cell::new("Date"), Cell::new(period.start_date())]);
    if let Some(dispatch_interval) = dispatch_interval {
        table.add_row(vec![Cell::new("Dispatch interval"), Cell::new(dispatch_interval)]);
    }
    table
}

pub fn energy_table<M: Market>(split: &[ElectricalEnergy]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Period", "Start", "End", "Energy"]);
    for energy in split {
        let period = Period::<M>::new(energy.start());
        table.add_row(vec![
            Cell::new(period.period_id()),
            Cell::new(energy.start()),
            Cell::new(energy.end()),
            Cell::new(energy.kwh()).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}
