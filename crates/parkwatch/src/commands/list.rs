//! `parkwatch list` — one refresh, query, render.

use std::collections::HashSet;
use std::sync::Arc;

use tabled::Tabled;

use parkwatch_core::{Facility, Snapshot, SyncPhase, query};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

use super::{build_engine, resolve_config};

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
pub(crate) struct FacilityRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Free")]
    free: String,
    #[tabled(rename = "Tier")]
    tier: String,
    #[tabled(rename = "$/h")]
    price: String,
    #[tabled(rename = "Dist")]
    distance: String,
}

impl From<&Arc<Facility>> for FacilityRow {
    fn from(f: &Arc<Facility>) -> Self {
        Self {
            id: f.id.to_string(),
            name: f.name.clone(),
            category: f.category.to_string(),
            free: format!("{}/{}", f.available_spots, f.total_spots),
            tier: output::tier_cell(f.availability_tier()),
            price: format!("{:.2}", f.price_per_hour),
            distance: format!("{:.1}", f.distance),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: ListArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let config = resolve_config(global)?;
    let engine = build_engine(&config, config.engine()?)?;

    engine.refresh_now().await;
    let state = engine.current();

    if state.phase == SyncPhase::Failed {
        if let Some(error) = state.error {
            return Err(error.into());
        }
    }

    let snapshot = state
        .snapshot
        .map_or_else(|| Snapshot::empty(chrono::Utc::now()), |s| (*s).clone());

    let text = args.search.as_deref().unwrap_or_default();
    let categories: HashSet<_> = args.category.iter().copied().collect();
    let result = query(&snapshot, text, &categories);

    if result.dropped_records > 0 && !global.quiet {
        eprintln!(
            "warning: {} facility record(s) could not be decoded and were skipped",
            result.dropped_records
        );
    }

    let out = output::render_list(
        &global.output,
        &result.facilities,
        |f| FacilityRow::from(f),
        |f| f.id.to_string(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
