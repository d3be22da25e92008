//! `parkwatch watch` — periodic sync with live transition output.

use std::collections::HashSet;

use parkwatch_core::{SyncPhase, SyncState, query};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

use super::{build_engine, resolve_config};

pub async fn handle(args: WatchArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = resolve_config(global)?;
    if let Some(interval) = args.interval {
        config.sync_interval_secs = interval;
    }

    let engine = build_engine(&config, config.engine()?)?;
    let mut observer = engine.subscribe();

    // Immediate initial load, then the fixed cadence.
    engine.refresh_now().await;
    engine.start_periodic().await;

    if !global.quiet {
        eprintln!(
            "watching (every {}s), Ctrl-C to stop",
            config.sync_interval_secs
        );
    }
    print_state(&observer.latest(), &args, global);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            state = observer.changed() => {
                match state {
                    Some(state) => print_state(&state, &args, global),
                    None => break,
                }
            }
        }
    }

    engine.stop().await;
    Ok(())
}

fn print_state(state: &SyncState, args: &WatchArgs, global: &GlobalOpts) {
    match state.phase {
        SyncPhase::Idle | SyncPhase::Fetching => {}
        SyncPhase::Succeeded => {
            let Some(ref snapshot) = state.snapshot else {
                return;
            };
            let text = args.filter.search.as_deref().unwrap_or_default();
            let categories: HashSet<_> = args.filter.category.iter().copied().collect();
            let result = query(snapshot, text, &categories);

            let out = output::render_list(
                &global.output,
                &result.facilities,
                |f| super::list::FacilityRow::from(f),
                |f| f.id.to_string(),
            );
            if !global.quiet {
                println!("[{}]", snapshot.fetched_at.format("%H:%M:%S"));
            }
            output::print_output(&out, global.quiet);
        }
        SyncPhase::Failed => {
            if let Some(ref error) = state.error {
                eprintln!("sync failed: {} (keeping last view)", error.user_message());
            }
        }
    }
}
