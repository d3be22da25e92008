//! `parkwatch show <ID>` — on-demand facility drill-down.

use std::fmt::Write as _;

use tabled::{Table, Tabled, settings::Style};

use parkwatch_core::{Facility, FacilityId};

use crate::cli::{GlobalOpts, ShowArgs};
use crate::error::CliError;
use crate::output;

use super::{build_engine, resolve_config};

#[derive(Tabled)]
struct SpotRow {
    #[tabled(rename = "Spot")]
    number: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Confidence")]
    confidence: String,
    #[tabled(rename = "Observed")]
    observed: String,
}

fn detail(facility: &Facility) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} (#{})", facility.name, facility.id);
    let _ = writeln!(out, "  {}", facility.address);
    let _ = writeln!(
        out,
        "  {} · {}/{} free · {} · ${:.2}/h · {:.1} away",
        facility.category,
        facility.available_spots,
        facility.total_spots,
        output::tier_cell(facility.availability_tier()),
        facility.price_per_hour,
        facility.distance,
    );
    if facility.degraded {
        let _ = writeln!(out, "  (some fields were substituted during decode)");
    }

    if !facility.spots.is_empty() {
        let rows: Vec<SpotRow> = facility
            .spots
            .iter()
            .map(|s| SpotRow {
                number: s.number.clone(),
                state: if s.occupied { "occupied" } else { "free" }.into(),
                confidence: format!("{:.0}%", s.confidence * 100.0),
                observed: s.observed_at.format("%H:%M:%S").to_string(),
            })
            .collect();
        let _ = writeln!(out, "{}", Table::new(rows).with(Style::rounded()));
    }
    out.trim_end().to_owned()
}

pub async fn handle(args: ShowArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = resolve_config(global)?;
    let engine = build_engine(&config, config.engine()?)?;

    let facility = engine.fetch_details(FacilityId(args.id)).await?;

    let out = output::render_single(&global.output, &facility, detail, |f| f.id.to_string());
    output::print_output(&out, global.quiet);
    Ok(())
}
